//! Pane layout engine.
//!
//! The left column stacks Connection, Tables, Schema and SQL; the Data pane
//! fills the right column; a one-line footer spans the bottom row. Tables,
//! Schema and SQL share the rows left under the Connection pane in a 2:2:1
//! ratio.

use ratatui::layout::Rect;

/// Footer height in rows.
pub const FOOTER_HEIGHT: u16 = 1;

/// Border rows of the Tables, Schema and SQL panes combined.
pub const LOWER_PANE_BORDERS: u16 = 6;

/// Border rows (or columns) of a single pane.
pub const PANE_BORDER: u16 = 2;

pub const MIN_TABLES_HEIGHT: u16 = 3;
pub const MIN_SCHEMA_HEIGHT: u16 = 3;
pub const MIN_SQL_HEIGHT: u16 = 2;

/// Terminal rows below which only a message is drawn.
pub const MIN_TERMINAL_HEIGHT: u16 = 20;

/// Columns the right column needs beyond the left column.
pub const MIN_RIGHT_WIDTH: u16 = 10;

/// Content heights (borders excluded) of the three lower left panes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaneHeights {
    pub tables: u16,
    pub schema: u16,
    pub sql: u16,
}

impl PaneHeights {
    pub fn total(&self) -> u16 {
        self.tables + self.schema + self.sql
    }

    fn minimum() -> Self {
        Self {
            tables: MIN_TABLES_HEIGHT,
            schema: MIN_SCHEMA_HEIGHT,
            sql: MIN_SQL_HEIGHT,
        }
    }

    fn slot(&mut self, index: usize) -> &mut u16 {
        match index % 3 {
            0 => &mut self.tables,
            1 => &mut self.schema,
            _ => &mut self.sql,
        }
    }
}

/// Rows available to the lower panes: `H - footer - C - borders`.
pub fn available_rows(height: u16, connection_height: u16) -> u16 {
    height
        .saturating_sub(FOOTER_HEIGHT)
        .saturating_sub(connection_height)
        .saturating_sub(LOWER_PANE_BORDERS)
}

/// Split `available` rows 2:2:1 between Tables, Schema and SQL.
///
/// Integer remainders go one row at a time to Tables, Schema, SQL. Minimums
/// are applied afterwards; if they push the total past `available`, rows are
/// taken back from the tallest pane that is still above its minimum.
pub fn pane_heights(available: u16) -> PaneHeights {
    let unit = available / 5;
    let mut heights = PaneHeights {
        tables: unit * 2,
        schema: unit * 2,
        sql: unit,
    };
    distribute(&mut heights, available - unit * 5);

    let min = PaneHeights::minimum();
    heights.tables = heights.tables.max(min.tables);
    heights.schema = heights.schema.max(min.schema);
    heights.sql = heights.sql.max(min.sql);

    while heights.total() > available {
        let over = [
            heights.tables - min.tables,
            heights.schema - min.schema,
            heights.sql - min.sql,
        ];
        let Some((index, _)) = over
            .iter()
            .enumerate()
            .filter(|(_, o)| **o > 0)
            .max_by_key(|(i, o)| (**o, std::cmp::Reverse(*i)))
        else {
            break;
        };
        *heights.slot(index) -= 1;
    }

    if heights.total() < available {
        let extra = available - heights.total();
        distribute(&mut heights, extra);
    }
    heights
}

fn distribute(heights: &mut PaneHeights, rows: u16) {
    for i in 0..rows as usize {
        *heights.slot(i) += 1;
    }
}

/// Why the frame cannot hold the panes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Degraded {
    /// No size reported yet.
    Loading,
    TooNarrow,
    TooShort,
}

impl Degraded {
    pub fn message(self) -> &'static str {
        match self {
            Degraded::Loading => "Loading…",
            Degraded::TooNarrow => "Window too narrow",
            Degraded::TooShort => "Window too short",
        }
    }
}

/// Screen regions for one frame. Every pane rect includes its borders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub connection: Rect,
    pub tables: Rect,
    pub schema: Rect,
    pub sql: Rect,
    pub data: Rect,
    pub footer: Rect,
    pub heights: PaneHeights,
}

impl ScreenLayout {
    /// Lay out a `width` x `height` screen.
    ///
    /// `connection_height` is the rendered Connection pane height including
    /// its borders; `left_width` is the left column width.
    pub fn compute(
        width: u16,
        height: u16,
        connection_height: u16,
        left_width: u16,
    ) -> Result<Self, Degraded> {
        if width == 0 {
            return Err(Degraded::Loading);
        }
        if width < left_width + MIN_RIGHT_WIDTH {
            return Err(Degraded::TooNarrow);
        }
        if height < MIN_TERMINAL_HEIGHT {
            return Err(Degraded::TooShort);
        }
        let available = available_rows(height, connection_height);
        let heights = pane_heights(available);
        if heights.total() > available {
            return Err(Degraded::TooShort);
        }

        let connection = Rect::new(0, 0, left_width, connection_height);
        let tables = Rect::new(0, connection.bottom(), left_width, heights.tables + PANE_BORDER);
        let schema = Rect::new(0, tables.bottom(), left_width, heights.schema + PANE_BORDER);
        let sql = Rect::new(0, schema.bottom(), left_width, heights.sql + PANE_BORDER);
        let body_height = height - FOOTER_HEIGHT;
        let data = Rect::new(left_width, 0, width - left_width, body_height);
        let footer = Rect::new(0, body_height, width, FOOTER_HEIGHT);

        Ok(Self {
            connection,
            tables,
            schema,
            sql,
            data,
            footer,
            heights,
        })
    }

    /// Content rows of the Data pane (borders, header and separator excluded).
    pub fn data_viewport_rows(&self) -> usize {
        self.data.height.saturating_sub(PANE_BORDER + 2) as usize
    }

    /// Content columns of the Data pane.
    pub fn data_viewport_width(&self) -> usize {
        self.data.width.saturating_sub(PANE_BORDER) as usize
    }
}
