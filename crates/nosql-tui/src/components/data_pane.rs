//! Data pane: the shown table's rows as a scrollable grid.

use nosql_core::utils::text::wrap_text;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::grid::{GridView, column_widths, total_content_width};
use super::{Component, pane_block, scrollbar, styles};
use crate::app::state::{DataState, TableData};
use crate::layout::PANE_BORDER;

pub struct DataPane<'a> {
    pub table: Option<&'a str>,
    pub entry: Option<&'a TableData>,
    pub columns: &'a [String],
    pub numeric: &'a [bool],
    pub state: &'a DataState,
    pub custom: bool,
}

impl DataPane<'_> {
    fn title(&self) -> String {
        let Some(table) = self.table else {
            return " Data ".to_string();
        };
        let mut title = format!(" Data: {}", table);
        if self.custom {
            title.push_str(" [custom]");
        }
        if let Some(entry) = self.entry.filter(|e| !e.rows.is_empty()) {
            let more = if entry.has_more { "+" } else { "" };
            title.push_str(&format!(
                "  {}/{}{}",
                self.state.selected_row + 1,
                entry.rows.len(),
                more
            ));
        }
        title.push(' ');
        title
    }

    /// Placeholder or error text when there is no grid to draw.
    fn message_lines(&self, width: usize) -> Option<Vec<Line<'static>>> {
        if self.table.is_none() {
            return Some(vec![Line::from(Span::styled(
                "Select a table and press Enter",
                styles::TEXT_DIM,
            ))]);
        }
        if let Some(error) = &self.state.error {
            let mut lines: Vec<Line> = wrap_text(error, width)
                .into_iter()
                .map(|l| Line::from(Span::styled(l, styles::TEXT_ERROR)))
                .collect();
            if let Some(entry) = self.entry.filter(|e| !e.current_sql.is_empty()) {
                lines.push(Line::default());
                lines.extend(
                    wrap_text(&entry.current_sql, width)
                        .into_iter()
                        .map(|l| Line::from(Span::styled(l, styles::TEXT_DIM))),
                );
            }
            return Some(lines);
        }
        match self.entry {
            Some(entry) if !entry.rows.is_empty() => None,
            _ if self.state.loading => {
                Some(vec![Line::from(Span::styled("Loading…", styles::TEXT_DIM))])
            }
            _ => Some(vec![Line::from(Span::styled("No rows", styles::TEXT_DIM))]),
        }
    }
}

impl Component for DataPane<'_> {
    fn draw(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let block = pane_block(self.title(), focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let width = inner.width as usize;
        if let Some(lines) = self.message_lines(width) {
            frame.render_widget(Paragraph::new(lines), inner);
            return;
        }
        let Some(entry) = self.entry else {
            return;
        };

        let output = GridView {
            columns: self.columns,
            numeric: self.numeric,
            rows: &entry.rows,
            selected_row: self.state.selected_row,
            viewport_offset: self.state.viewport_offset,
            horizontal_offset: self.state.horizontal_offset,
            width,
            height: inner.height as usize,
            focused,
            loading_tail: entry.has_more && self.state.loading,
        }
        .render();
        frame.render_widget(Paragraph::new(output.lines), inner);

        let viewport_rows = area.height.saturating_sub(PANE_BORDER + 2) as usize;
        let buf = frame.buffer_mut();
        scrollbar::draw_horizontal(
            buf,
            area,
            output.total_content_width,
            width,
            self.state.horizontal_offset,
        );
        scrollbar::draw_vertical(
            buf,
            area,
            entry.rows.len(),
            viewport_rows,
            self.state.viewport_offset,
        );
    }
}

/// Width of the grid's content for `columns` over `entry`.
pub fn content_width(columns: &[String], entry: &TableData) -> usize {
    total_content_width(&column_widths(columns, &entry.rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nosql_core::api::{FieldValue, Row};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn entry(n: usize) -> TableData {
        let rows = (0..n)
            .map(|i| {
                let mut row = Row::new();
                row.insert("id".to_string(), FieldValue::Integer(i as i64));
                row
            })
            .collect();
        TableData {
            rows,
            current_sql: "SELECT * FROM users".to_string(),
            has_more: true,
            ..Default::default()
        }
    }

    fn render(pane: &DataPane) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(30, 8)).unwrap();
        terminal
            .draw(|frame| pane.draw(frame, frame.area(), true))
            .unwrap();
        let buffer = terminal.backend().buffer().clone();
        (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer[(x, y)].symbol().to_string())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_title_shows_position() {
        let data = entry(3);
        let state = DataState {
            selected_row: 1,
            ..Default::default()
        };
        let pane = DataPane {
            table: Some("users"),
            entry: Some(&data),
            columns: &[],
            numeric: &[],
            state: &state,
            custom: true,
        };
        assert_eq!(pane.title(), " Data: users [custom]  2/3+ ");
    }

    #[test]
    fn test_renders_grid_rows() {
        let data = entry(3);
        let state = DataState::default();
        let columns = vec!["id".to_string()];
        let pane = DataPane {
            table: Some("users"),
            entry: Some(&data),
            columns: &columns,
            numeric: &[true],
            state: &state,
            custom: false,
        };
        let screen = render(&pane);
        assert!(screen[1].contains("id"));
        assert!(screen[3].contains("  0"));
        assert!(screen[5].contains("  2"));
    }

    #[test]
    fn test_error_replaces_grid() {
        let data = entry(3);
        let state = DataState {
            error: Some("syntax error".to_string()),
            ..Default::default()
        };
        let pane = DataPane {
            table: Some("users"),
            entry: Some(&data),
            columns: &[],
            numeric: &[],
            state: &state,
            custom: false,
        };
        let screen = render(&pane);
        assert!(screen[1].contains("syntax error"));
        assert!(screen[3].contains("SELECT * FROM users"));
    }

    #[test]
    fn test_placeholders() {
        let state = DataState {
            loading: true,
            ..Default::default()
        };
        let pane = DataPane {
            table: Some("users"),
            entry: None,
            columns: &[],
            numeric: &[],
            state: &state,
            custom: false,
        };
        assert!(render(&pane)[1].contains("Loading…"));

        let pane = DataPane {
            table: None,
            ..pane
        };
        assert!(render(&pane)[1].contains("Select a table"));
    }
}
