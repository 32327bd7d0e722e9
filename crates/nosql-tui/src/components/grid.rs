//! Fixed-width, horizontally scrollable row grid.
//!
//! Rendering is a pure function of the inputs: column widths are derived
//! from the header and a sample of rows, each line is composed unstyled at
//! full width, then cut to the viewport and styled per segment so NULL
//! cells keep their dim look inside a highlighted row.

use nosql_core::api::{FieldValue, Row};
use nosql_core::utils::text::{
    display_width, pad_left_to_width, pad_to_width, slice_columns, truncate_with_ellipsis,
};
use ratatui::style::Style;
use ratatui::text::{Line, Span};

use super::styles;

pub const MIN_COLUMN_WIDTH: usize = 3;
pub const MAX_COLUMN_WIDTH: usize = 50;

/// Rows scanned when measuring column widths.
pub const WIDTH_SAMPLE_ROWS: usize = 100;

/// Header row plus separator row.
pub const GRID_HEADER_ROWS: usize = 2;

const SEPARATOR_CHAR: &str = "─";

/// Text shown for a cell value. Line breaks and tabs become spaces.
pub fn cell_text(value: Option<&FieldValue>) -> String {
    match value {
        None => String::new(),
        Some(v) => v
            .to_string()
            .chars()
            .map(|c| if c.is_control() { ' ' } else { c })
            .collect(),
    }
}

/// Width of each column: header or widest sampled cell, within `[3, 50]`.
pub fn column_widths(columns: &[String], rows: &[Row]) -> Vec<usize> {
    columns
        .iter()
        .map(|name| {
            let header = display_width(name).max(MIN_COLUMN_WIDTH);
            let widest = rows
                .iter()
                .take(WIDTH_SAMPLE_ROWS)
                .map(|row| display_width(&cell_text(row.get(name))))
                .max()
                .unwrap_or(0);
            header.max(widest).min(MAX_COLUMN_WIDTH)
        })
        .collect()
}

/// Unscrolled line width: column widths plus one space between columns.
pub fn total_content_width(widths: &[usize]) -> usize {
    widths.iter().sum::<usize>() + widths.len().saturating_sub(1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SegmentKind {
    Plain,
    Null,
}

/// One styled run of a composed line, before horizontal scrolling.
#[derive(Debug, Clone)]
struct Segment {
    text: String,
    kind: SegmentKind,
}

/// Inputs for rendering the grid viewport.
#[derive(Debug, Clone)]
pub struct GridView<'a> {
    pub columns: &'a [String],
    /// Right-align flag per column.
    pub numeric: &'a [bool],
    pub rows: &'a [Row],
    pub selected_row: usize,
    pub viewport_offset: usize,
    pub horizontal_offset: usize,
    /// Viewport width in columns.
    pub width: usize,
    /// Viewport height in rows, header and separator included.
    pub height: usize,
    pub focused: bool,
    /// Draw a "Loading…" row under the last row when space allows.
    pub loading_tail: bool,
}

/// Rendered grid plus the geometry the scrollbars need.
#[derive(Debug, Clone)]
pub struct GridOutput {
    pub lines: Vec<Line<'static>>,
    pub total_content_width: usize,
}

impl GridView<'_> {
    pub fn render(&self) -> GridOutput {
        let widths = column_widths(self.columns, self.rows);
        let total = total_content_width(&widths);
        let mut lines = Vec::with_capacity(self.height);

        if self.height == 0 {
            return GridOutput {
                lines,
                total_content_width: total,
            };
        }

        let header: Vec<String> = self
            .columns
            .iter()
            .zip(&widths)
            .map(|(name, w)| pad_to_width(&truncate_with_ellipsis(name, *w), *w))
            .collect();
        lines.push(Line::from(Span::styled(
            slice_columns(&header.join(" "), self.horizontal_offset, self.width),
            styles::header_style(),
        )));

        if self.height > 1 {
            let separator: Vec<String> = widths.iter().map(|w| SEPARATOR_CHAR.repeat(*w)).collect();
            lines.push(Line::from(Span::styled(
                slice_columns(&separator.join(" "), self.horizontal_offset, self.width),
                styles::TEXT_DIM,
            )));
        }

        let body_rows = self.height.saturating_sub(GRID_HEADER_ROWS);
        let end = (self.viewport_offset + body_rows).min(self.rows.len());
        let start = self.viewport_offset.min(end);
        for index in start..end {
            let segments = self.compose_row(&self.rows[index], &widths);
            lines.push(self.style_row(segments, index == self.selected_row));
        }

        let used = end - start;
        if self.loading_tail && used < body_rows {
            lines.push(Line::from(Span::styled("Loading…", styles::TEXT_DIM)));
        }

        GridOutput {
            lines,
            total_content_width: total,
        }
    }

    fn compose_row(&self, row: &Row, widths: &[usize]) -> Vec<Segment> {
        let mut segments = Vec::with_capacity(self.columns.len() * 2);
        for (i, (name, width)) in self.columns.iter().zip(widths).enumerate() {
            if i > 0 {
                segments.push(Segment {
                    text: " ".to_string(),
                    kind: SegmentKind::Plain,
                });
            }
            let value = row.get(name);
            let text = truncate_with_ellipsis(&cell_text(value), *width);
            let numeric = self.numeric.get(i).copied().unwrap_or(false);
            let text = if numeric {
                pad_left_to_width(&text, *width)
            } else {
                pad_to_width(&text, *width)
            };
            let kind = match value {
                Some(v) if v.is_null() => SegmentKind::Null,
                _ => SegmentKind::Plain,
            };
            segments.push(Segment { text, kind });
        }
        segments
    }

    /// Apply the horizontal offset, pad to the viewport width and style.
    fn style_row(&self, segments: Vec<Segment>, selected: bool) -> Line<'static> {
        let window_start = self.horizontal_offset;
        let window_end = self.horizontal_offset + self.width;
        let base = if selected {
            styles::row_highlight_style(self.focused)
        } else {
            Style::default()
        };
        let null = if selected {
            styles::null_selected_style(self.focused)
        } else {
            styles::TEXT_DIM
        };

        let mut spans = Vec::new();
        let mut col = 0;
        let mut emitted = 0;
        for segment in segments {
            let seg_width = display_width(&segment.text);
            let seg_start = col;
            let seg_end = col + seg_width;
            col = seg_end;
            if seg_end <= window_start || seg_start >= window_end {
                continue;
            }
            let from = window_start.saturating_sub(seg_start);
            let visible = seg_end.min(window_end) - seg_start.max(window_start);
            let text = slice_columns(&segment.text, from, visible);
            let style = match segment.kind {
                SegmentKind::Null => null,
                SegmentKind::Plain => base,
            };
            emitted += visible;
            spans.push(Span::styled(text, style));
        }
        if emitted < self.width {
            spans.push(Span::styled(" ".repeat(self.width - emitted), base));
        }
        Line::from(spans)
    }
}
