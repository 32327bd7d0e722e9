//! Session state owned by [`super::App`].
//!
//! Everything here is plain data; the handlers in the sibling modules are
//! the only code that mutates it.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use nosql_core::api::{ConnectMode, FieldValue, NoSqlClient, Row, TableDetails};

use crate::layout::PaneHeights;

/// Focusable panes, in Tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusPane {
    #[default]
    Connection,
    Tables,
    Schema,
    Sql,
    Data,
}

impl FocusPane {
    const ORDER: [FocusPane; 5] = [
        FocusPane::Connection,
        FocusPane::Tables,
        FocusPane::Schema,
        FocusPane::Sql,
        FocusPane::Data,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|p| *p == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    pub fn previous(self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

/// Terminal size and the derived lower-pane heights.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowState {
    pub width: u16,
    pub height: u16,
    pub panes: PaneHeights,
}

/// Connection status for display
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    /// Connect command in flight for this `host:port`
    Connecting(String),
    Connected(String),
    /// Last attempt failed
    Error(String),
}

#[derive(Debug, Clone)]
pub struct ConnectionState {
    pub status: ConnectionStatus,
    /// Present exactly while connected.
    pub client: Option<Arc<dyn NoSqlClient>>,
    /// Last dialog values, used to prefill the next dialog.
    pub last_endpoint: String,
    pub last_port: String,
    pub last_mode: ConnectMode,
}

impl ConnectionState {
    pub fn new(endpoint: String, port: String) -> Self {
        Self {
            status: ConnectionStatus::Disconnected,
            client: None,
            last_endpoint: endpoint,
            last_port: port,
            last_mode: ConnectMode::OnPremise,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.client.is_some()
    }
}

#[derive(Debug, Clone, Default)]
pub struct TablesState {
    /// Tree-ordered table names.
    pub tables: Vec<String>,
    pub cursor: usize,
    /// Table committed with Enter.
    pub selected: Option<usize>,
    pub scroll_offset: usize,
    pub loading: bool,
}

impl TablesState {
    pub fn selected_name(&self) -> Option<&str> {
        self.selected
            .and_then(|i| self.tables.get(i))
            .map(String::as_str)
    }

    /// Catalog index of `name`, compared case-insensitively.
    pub fn find(&self, name: &str) -> Option<usize> {
        self.tables.iter().position(|t| t.eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Clone, Default)]
pub struct SchemaState {
    pub cache: HashMap<String, TableDetails>,
    /// Tables whose details fetch is in flight.
    pub pending: HashSet<String>,
    /// Details-fetch error of the shown table; kept until the next success.
    pub error: Option<String>,
    pub scroll_offset: usize,
}

/// Cached rows of one table and how to continue fetching them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableData {
    pub rows: Vec<Row>,
    /// Primary-key tuple of the last row; the next cursor.
    pub last_pk_values: Option<Vec<FieldValue>>,
    /// Keys the cursor is built from (standard queries).
    pub primary_keys: Vec<String>,
    pub has_more: bool,
    pub is_custom_sql: bool,
    /// SELECT-list order; empty for `SELECT *`.
    pub column_order: Vec<String>,
    /// Statement without LIMIT, as shown to the user.
    pub current_sql: String,
    /// Next OFFSET for OFFSET pagination.
    pub offset: usize,
}

#[derive(Debug, Clone, Default)]
pub struct DataState {
    pub cache: HashMap<String, TableData>,
    pub loading: bool,
    pub error: Option<String>,
    /// Absolute index of the highlighted row.
    pub selected_row: usize,
    /// First row shown in the viewport.
    pub viewport_offset: usize,
    pub horizontal_offset: usize,
    /// Id of the most recent data request.
    pub request_id: u64,
    /// Table whose first fetch waits for its details (the ORDER BY needs the keys).
    pub awaiting_details: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SqlState {
    pub buffer: String,
    /// Rune index into `buffer`.
    pub cursor: usize,
    pub custom_sql: bool,
    pub column_order: Vec<String>,
    pub scroll_offset: usize,
    /// Selection to return to when leaving custom SQL mode.
    pub previous_selected: Option<usize>,
    pub selection_saved: bool,
    /// Custom statement target that is not in the catalog.
    pub custom_target: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionField {
    #[default]
    Endpoint,
    Port,
    Mode,
}

impl ConnectionField {
    pub fn next(self) -> Self {
        match self {
            ConnectionField::Endpoint => ConnectionField::Port,
            ConnectionField::Port => ConnectionField::Mode,
            ConnectionField::Mode => ConnectionField::Endpoint,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            ConnectionField::Endpoint => ConnectionField::Mode,
            ConnectionField::Port => ConnectionField::Endpoint,
            ConnectionField::Mode => ConnectionField::Port,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionDialogState {
    pub endpoint: String,
    pub port: String,
    pub mode: ConnectMode,
    pub field: ConnectionField,
    /// Rune cursor within the active text field.
    pub cursor: usize,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordDetailState {
    pub table: String,
    /// `(column, value)` in display order.
    pub fields: Vec<(String, FieldValue)>,
    /// Full row for copying.
    pub row: Row,
    pub scroll: usize,
}

/// The modal currently covering the panes. One at most.
#[derive(Debug, Clone, PartialEq)]
pub enum Dialog {
    Connection(ConnectionDialogState),
    RecordDetail(RecordDetailState),
}

#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub copy_message: Option<String>,
    pub copy_failed: bool,
    /// Bumped on every copy so an older clear timer leaves a newer message alone.
    pub copy_generation: u64,
    pub confirm_quit: bool,
}
