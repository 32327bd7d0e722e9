//! Record detail dialog.
//!
//! Lists every field of one row as `column: value`, values wrapped to the
//! dialog width, with vertical scrolling.

use nosql_core::utils::text::{display_width, wrap_text};
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};

use super::grid::cell_text;
use super::{scrollbar, styles};
use crate::app::state::RecordDetailState;

/// Percent of the screen the dialog covers.
const WIDTH_PERCENT: u16 = 70;
const HEIGHT_PERCENT: u16 = 80;
/// Rows inside the border used by the hint line and the blank above it.
const FOOTER_ROWS: u16 = 2;
/// Column names wider than this are not used for alignment.
const MAX_NAME_WIDTH: usize = 24;

pub struct RecordDetailView<'a> {
    pub state: &'a RecordDetailState,
}

/// Dialog rectangle within a screen of `area`.
pub fn popup_area(area: Rect) -> Rect {
    let width = (u32::from(area.width) * u32::from(WIDTH_PERCENT) / 100) as u16;
    let height = (u32::from(area.height) * u32::from(HEIGHT_PERCENT) / 100) as u16;
    super::centered_rect(width, height, area)
}

/// `(width, height)` of the scrollable body for a screen of `area`.
pub fn body_size(area: Rect) -> (usize, usize) {
    let popup = popup_area(area);
    let width = popup.width.saturating_sub(2) as usize;
    let height = popup.height.saturating_sub(2 + FOOTER_ROWS) as usize;
    (width, height)
}

/// Every body line for a body `width` columns wide.
pub fn content_lines(state: &RecordDetailState, width: usize) -> Vec<Line<'static>> {
    let name_width = state
        .fields
        .iter()
        .map(|(name, _)| display_width(name))
        .max()
        .unwrap_or(0)
        .min(MAX_NAME_WIDTH);
    let indent = name_width + 2;
    let value_width = width.saturating_sub(indent).max(10);
    let name_style = styles::field_name_style();

    let mut lines = Vec::new();
    for (name, value) in &state.fields {
        let padding = name_width.saturating_sub(display_width(name));
        let value_style = if value.is_null() {
            styles::TEXT_DIM
        } else {
            Style::default()
        };
        for (i, chunk) in wrap_text(&cell_text(Some(value)), value_width)
            .into_iter()
            .enumerate()
        {
            let head = if i == 0 {
                Span::styled(format!("{}{}: ", name, " ".repeat(padding)), name_style)
            } else {
                Span::raw(" ".repeat(indent))
            };
            lines.push(Line::from(vec![head, Span::styled(chunk, value_style)]));
        }
    }
    lines
}

/// Largest scroll offset for a screen of `area`.
pub fn max_scroll(state: &RecordDetailState, area: Rect) -> usize {
    let (width, height) = body_size(area);
    content_lines(state, width).len().saturating_sub(height)
}

impl RecordDetailView<'_> {
    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        let popup = popup_area(area);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(styles::BORDER_FOCUSED)
            .title(Span::styled(
                format!(" Record: {} ", self.state.table),
                styles::modal_title_style(),
            ))
            .title_alignment(Alignment::Center);
        let (width, height) = body_size(area);
        let all = content_lines(self.state, width);
        let total = all.len();

        let mut lines: Vec<Line> = all.into_iter().skip(self.state.scroll).take(height).collect();
        lines.resize(height, Line::default());
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            " ↑↓ scroll · PgUp/PgDn page · Home/End · c copy · Esc close",
            styles::TEXT_DIM,
        )));
        frame.render_widget(Paragraph::new(lines).block(block), popup);

        let body = Rect::new(
            popup.x,
            popup.y,
            popup.width,
            popup.height.saturating_sub(FOOTER_ROWS),
        );
        scrollbar::draw_vertical(frame.buffer_mut(), body, total, height, self.state.scroll);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nosql_core::api::{FieldValue, Row};

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn state(fields: Vec<(&str, FieldValue)>) -> RecordDetailState {
        RecordDetailState {
            table: "users".to_string(),
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            row: Row::new(),
            scroll: 0,
        }
    }

    #[test]
    fn test_content_lines_align_names() {
        let state = state(vec![
            ("id", FieldValue::Integer(1)),
            ("email", FieldValue::Null),
        ]);
        let lines: Vec<String> = content_lines(&state, 40).iter().map(text).collect();
        assert_eq!(lines, vec!["id   : 1", "email: NULL"]);
    }

    #[test]
    fn test_long_values_wrap_under_value_column() {
        let state = state(vec![(
            "bio",
            FieldValue::String("one two three four".to_string()),
        )]);
        let lines: Vec<String> = content_lines(&state, 15).iter().map(text).collect();
        assert_eq!(lines, vec!["bio: one two", "     three four"]);
    }

    #[test]
    fn test_max_scroll() {
        let fields: Vec<(&str, FieldValue)> = (0..40)
            .map(|i| ("n", FieldValue::Integer(i)))
            .collect();
        let state = state(fields);
        // 100x30 screen: popup 70x24, body 20 rows.
        assert_eq!(max_scroll(&state, Rect::new(0, 0, 100, 30)), 20);
    }

    #[test]
    fn test_popup_area_on_wide_screen() {
        let popup = popup_area(Rect::new(0, 0, 1000, 50));
        assert_eq!((popup.width, popup.height), (700, 40));
        assert_eq!((popup.x, popup.y), (150, 5));
    }

    #[test]
    fn test_field_names_are_highlighted() {
        let state = state(vec![("id", FieldValue::Integer(1))]);
        let lines = content_lines(&state, 40);
        assert_eq!(lines[0].spans[0].style, styles::field_name_style());
    }
}
