//! Tables pane: the catalog as an indented parent/child tree.

use nosql_core::core::tables::{leaf_name, table_depth};
use nosql_core::utils::text::{pad_to_width, truncate_with_ellipsis};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::{Component, pane_block, styles};
use crate::app::state::TablesState;
use crate::layout::PANE_BORDER;

const SELECTED_MARKER: &str = "* ";
const NO_MARKER: &str = "  ";

pub struct TablesPane<'a> {
    pub state: &'a TablesState,
    pub connected: bool,
    /// Hide the `*` marker while a custom statement targets an uncatalogued table.
    pub hide_marker: bool,
}

/// Tree label: two spaces per nesting level, then the leaf name.
pub fn table_label(name: &str) -> String {
    format!("{}{}", "  ".repeat(table_depth(name)), leaf_name(name))
}

impl TablesPane<'_> {
    pub fn lines(&self, width: usize, height: usize, focused: bool) -> Vec<Line<'static>> {
        if !self.connected {
            return vec![Line::from(Span::styled("Not connected", styles::TEXT_DIM))];
        }
        if self.state.loading {
            return vec![Line::from(Span::styled("Loading…", styles::TEXT_DIM))];
        }
        if self.state.tables.is_empty() {
            return vec![Line::from(Span::styled("No tables", styles::TEXT_DIM))];
        }

        self.state
            .tables
            .iter()
            .enumerate()
            .skip(self.state.scroll_offset)
            .take(height)
            .map(|(index, name)| {
                let marker = if self.state.selected == Some(index) && !self.hide_marker {
                    SELECTED_MARKER
                } else {
                    NO_MARKER
                };
                let text = pad_to_width(
                    &truncate_with_ellipsis(&format!("{}{}", marker, table_label(name)), width),
                    width,
                );
                let style = if index == self.state.cursor {
                    styles::cursor_row_style(focused)
                } else {
                    Style::default()
                };
                Line::from(Span::styled(text, style))
            })
            .collect()
    }
}

impl Component for TablesPane<'_> {
    fn draw(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let title = if self.state.tables.is_empty() {
            " Tables ".to_string()
        } else {
            format!(" Tables ({}) ", self.state.tables.len())
        };
        let width = area.width.saturating_sub(PANE_BORDER) as usize;
        let height = area.height.saturating_sub(PANE_BORDER) as usize;
        let paragraph =
            Paragraph::new(self.lines(width, height, focused)).block(pane_block(title, focused));
        frame.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn state() -> TablesState {
        TablesState {
            tables: vec![
                "users".to_string(),
                "users.orders".to_string(),
                "users.orders.items".to_string(),
            ],
            selected: Some(1),
            ..Default::default()
        }
    }

    #[test]
    fn test_table_label_indents_children() {
        assert_eq!(table_label("users"), "users");
        assert_eq!(table_label("users.orders.items"), "    items");
    }

    #[test]
    fn test_lines_mark_selected_table() {
        let state = state();
        let pane = TablesPane {
            state: &state,
            connected: true,
            hide_marker: false,
        };
        let lines: Vec<String> = pane.lines(20, 10, true).iter().map(line_text).collect();
        assert_eq!(lines[0].trim_end(), "  users");
        assert_eq!(lines[1].trim_end(), "*   orders");
        assert_eq!(lines[2].trim_end(), "      items");
    }

    #[test]
    fn test_marker_hidden_for_uncatalogued_target() {
        let state = state();
        let pane = TablesPane {
            state: &state,
            connected: true,
            hide_marker: true,
        };
        assert!(!pane.lines(20, 10, true).iter().any(|l| line_text(l).starts_with('*')));
    }

    #[test]
    fn test_lines_respect_scroll_offset() {
        let mut state = state();
        state.scroll_offset = 1;
        let pane = TablesPane {
            state: &state,
            connected: true,
            hide_marker: false,
        };
        let lines = pane.lines(20, 1, false);
        assert_eq!(lines.len(), 1);
        assert_eq!(line_text(&lines[0]).trim_end(), "*   orders");
    }

    #[test]
    fn test_placeholders() {
        let state = TablesState::default();
        let pane = TablesPane {
            state: &state,
            connected: false,
            hide_marker: false,
        };
        assert_eq!(line_text(&pane.lines(20, 5, false)[0]), "Not connected");
        let pane = TablesPane {
            state: &state,
            connected: true,
            hide_marker: false,
        };
        assert_eq!(line_text(&pane.lines(20, 5, false)[0]), "No tables");
    }
}
