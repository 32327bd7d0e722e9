//! SQL pane: multi-line statement editor with soft wrap.

use nosql_core::utils::input::layout_editor;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::{Component, pane_block, scrollbar, styles};
use crate::app::state::SqlState;
use crate::layout::PANE_BORDER;

pub struct SqlPane<'a> {
    pub state: &'a SqlState,
}

impl SqlPane<'_> {
    /// Visible lines for a `width` x `height` content area.
    ///
    /// The cursor cell is only drawn when the pane has focus.
    pub fn lines(&self, width: usize, height: usize, focused: bool) -> Vec<Line<'static>> {
        let chars: Vec<char> = self.state.buffer.chars().collect();
        let layout = layout_editor(&self.state.buffer, width, self.state.cursor);

        layout
            .lines
            .iter()
            .enumerate()
            .skip(self.state.scroll_offset)
            .take(height)
            .map(|(row, line)| {
                let text: String = chars[line.start..line.end].iter().collect();
                if !focused || row != layout.cursor_row {
                    return Line::from(Span::styled(text, styles::input_text_style()));
                }
                let split = self.state.cursor.clamp(line.start, line.end) - line.start;
                let before: String = text.chars().take(split).collect();
                let mut rest = text.chars().skip(split);
                let under = rest.next().map(String::from).unwrap_or_else(|| " ".to_string());
                let after: String = rest.collect();
                Line::from(vec![
                    Span::styled(before, styles::input_text_style()),
                    Span::styled(under, styles::cursor_style()),
                    Span::styled(after, styles::input_text_style()),
                ])
            })
            .collect()
    }
}

impl Component for SqlPane<'_> {
    fn draw(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let title = if self.state.custom_sql {
            " SQL [custom] ".to_string()
        } else {
            " SQL ".to_string()
        };
        let width = area.width.saturating_sub(PANE_BORDER) as usize;
        let height = area.height.saturating_sub(PANE_BORDER) as usize;
        let paragraph =
            Paragraph::new(self.lines(width, height, focused)).block(pane_block(title, focused));
        frame.render_widget(paragraph, area);

        let total = layout_editor(&self.state.buffer, width, self.state.cursor)
            .lines
            .len();
        scrollbar::draw_vertical(
            frame.buffer_mut(),
            area,
            total,
            height,
            self.state.scroll_offset,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(lines: &[Line]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    fn state(buffer: &str, cursor: usize) -> SqlState {
        SqlState {
            buffer: buffer.to_string(),
            cursor,
            ..Default::default()
        }
    }

    #[test]
    fn test_soft_wrap() {
        let state = state("SELECT * FROM users", 0);
        let pane = SqlPane { state: &state };
        assert_eq!(
            texts(&pane.lines(10, 5, false)),
            vec!["SELECT * F", "ROM users"]
        );
    }

    #[test]
    fn test_cursor_cell_when_focused() {
        let state = state("abc", 1);
        let pane = SqlPane { state: &state };
        let lines = pane.lines(10, 5, true);
        assert_eq!(lines[0].spans[1].content.as_ref(), "b");
        assert_eq!(lines[0].spans[1].style, styles::cursor_style());
    }

    #[test]
    fn test_cursor_at_end_draws_blank_cell() {
        let state = state("abc", 3);
        let pane = SqlPane { state: &state };
        let lines = pane.lines(10, 5, true);
        assert_eq!(lines[0].spans[1].content.as_ref(), " ");
    }

    #[test]
    fn test_scroll_offset_skips_rows() {
        let mut state = state("one\ntwo\nthree", 0);
        state.scroll_offset = 1;
        let pane = SqlPane { state: &state };
        assert_eq!(texts(&pane.lines(10, 1, false)), vec!["two"]);
    }
}
