//! Schema pane: columns and indexes of the shown table.

use nosql_core::api::TableDetails;
use nosql_core::core::ddl::{TableSchema, inherited_key_columns};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::{Component, pane_block, styles};
use crate::layout::PANE_BORDER;

pub struct SchemaPane<'a> {
    pub table: Option<&'a str>,
    pub details: Option<&'a TableDetails>,
    pub loading: bool,
    pub error: Option<&'a str>,
    pub scroll: usize,
}

/// Lines describing `details`, separator drawn `width` columns wide.
pub fn schema_lines(details: &TableDetails, width: usize) -> Vec<Line<'static>> {
    let schema = TableSchema::parse(&details.ddl);
    let mut lines = vec![Line::from(Span::styled("Columns:", styles::header_style()))];

    for column in inherited_key_columns(&details.ancestor_ddls, &schema) {
        lines.push(Line::from(vec![
            Span::raw(format!("  {}  {} [PK]", column.name, column.type_name)),
            Span::styled(" (inherited)", styles::TEXT_DIM),
        ]));
    }
    for column in &schema.columns {
        let key = if column.is_primary_key { " [PK]" } else { "" };
        lines.push(Line::from(format!(
            "  {}  {}{}",
            column.name, column.type_name, key
        )));
    }

    lines.push(Line::from(Span::styled("─".repeat(width), styles::TEXT_DIM)));
    lines.push(Line::from(Span::styled("Indexes:", styles::header_style())));
    if details.indexes.is_empty() {
        lines.push(Line::from(Span::styled("  (none)", styles::TEXT_DIM)));
    }
    for index in &details.indexes {
        lines.push(Line::from(format!(
            "  {} ({})",
            index.name,
            index.field_names.join(", ")
        )));
    }
    lines
}

impl SchemaPane<'_> {
    /// Everything the pane shows, before scrolling.
    pub fn lines(&self, width: usize) -> Vec<Line<'static>> {
        if self.table.is_none() {
            return vec![Line::from(Span::styled("No schema", styles::TEXT_DIM))];
        }
        if let Some(details) = self.details {
            return schema_lines(details, width);
        }
        if let Some(error) = self.error {
            return vec![Line::from(Span::styled(error.to_string(), styles::TEXT_ERROR))];
        }
        if self.loading {
            return vec![Line::from(Span::styled("Loading…", styles::TEXT_DIM))];
        }
        vec![Line::from(Span::styled("No schema", styles::TEXT_DIM))]
    }

    pub fn line_count(&self, width: usize) -> usize {
        self.lines(width).len()
    }
}

impl Component for SchemaPane<'_> {
    fn draw(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let width = area.width.saturating_sub(PANE_BORDER) as usize;
        let lines: Vec<Line> = self.lines(width).into_iter().skip(self.scroll).collect();
        let paragraph = Paragraph::new(lines).block(pane_block(" Schema ".to_string(), focused));
        frame.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nosql_core::api::IndexInfo;

    fn texts(lines: &[Line]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    fn pane<'a>(details: Option<&'a TableDetails>, loading: bool, error: Option<&'a str>) -> SchemaPane<'a> {
        SchemaPane {
            table: Some("users"),
            details,
            loading,
            error,
            scroll: 0,
        }
    }

    #[test]
    fn test_schema_lines() {
        let details = TableDetails {
            ddl: "CREATE TABLE users (id INTEGER, name STRING, PRIMARY KEY(id))".to_string(),
            indexes: vec![IndexInfo {
                name: "idx_name".to_string(),
                field_names: vec!["name".to_string(), "id".to_string()],
            }],
            ancestor_ddls: Vec::new(),
        };
        assert_eq!(
            texts(&schema_lines(&details, 4)),
            vec![
                "Columns:",
                "  id  INTEGER [PK]",
                "  name  STRING",
                "────",
                "Indexes:",
                "  idx_name (name, id)",
            ]
        );
    }

    #[test]
    fn test_inherited_keys_come_first() {
        let details = TableDetails {
            ddl: "CREATE TABLE users.orders (order_id LONG, PRIMARY KEY(order_id))".to_string(),
            indexes: Vec::new(),
            ancestor_ddls: vec![(
                "users".to_string(),
                "CREATE TABLE users (id INTEGER, PRIMARY KEY(id))".to_string(),
            )],
        };
        let lines = texts(&schema_lines(&details, 2));
        assert_eq!(lines[1], "  id  INTEGER [PK] (inherited)");
        assert_eq!(lines[2], "  order_id  LONG [PK]");
        assert_eq!(lines.last().map(String::as_str), Some("  (none)"));
    }

    #[test]
    fn test_display_priority() {
        let details = TableDetails::default();
        assert_eq!(
            texts(&pane(Some(&details), true, Some("boom")).lines(10))[0],
            "Columns:"
        );
        assert_eq!(texts(&pane(None, true, Some("boom")).lines(10))[0], "boom");
        assert_eq!(texts(&pane(None, true, None).lines(10))[0], "Loading…");
        assert_eq!(texts(&pane(None, false, Some("boom")).lines(10))[0], "boom");
        assert_eq!(texts(&pane(None, false, None).lines(10))[0], "No schema");
    }
}
