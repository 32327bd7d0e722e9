//! Commands and their results.
//!
//! Handlers never perform I/O. They return [`Command`]s describing the work;
//! the runtime runs each command off the event loop and feeds exactly one
//! [`AppAction`] back into it:
//! Key → handler → Command → worker → AppAction → dispatcher → state

use std::sync::Arc;

use nosql_core::api::{ConnectOptions, NoSqlClient, Row, TableDetails};

/// How a data fetch continues after its first batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pagination {
    /// Composite primary-key cursor over `primary_keys`.
    Cursor { primary_keys: Vec<String> },
    /// `LIMIT n OFFSET m` appended to the base statement; `offset` is this batch's offset.
    Offset { offset: usize },
    /// The statement limits itself; nothing more is fetched.
    Disabled,
}

/// One data fetch: what is sent and how its result is cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataRequest {
    pub table: String,
    pub request_id: u64,
    /// Statement as sent, LIMIT included.
    pub query: String,
    /// Statement shown to the user and reused for OFFSET continuation.
    pub base_sql: String,
    pub pagination: Pagination,
    /// Rows expected for a full batch.
    pub limit: usize,
    pub custom_sql: bool,
    /// SELECT-list column order for custom statements.
    pub column_order: Vec<String>,
    /// Append to the cached rows instead of replacing them.
    pub append: bool,
}

/// Work for the runtime. Each command produces exactly one [`AppAction`].
#[derive(Debug, Clone)]
pub enum Command {
    Connect(ConnectOptions),
    FetchTables,
    /// DDL and indexes of `table`, plus the DDL of each ancestor table.
    FetchTableDetails(String),
    FetchTableData(DataRequest),
    FetchMoreTableData(DataRequest),
    ExecuteCustomSql(DataRequest),
    FetchMoreCustomSql(DataRequest),
    /// Release a client handle that is no longer referenced by the session.
    CloseClient(Arc<dyn NoSqlClient>),
    CopyToClipboard(String),
    /// Clear the copy confirmation if it is still generation `generation`.
    ClearCopyMessageAfter { generation: u64, delay_ms: u64 },
}

impl Command {
    /// The data request carried by a fetch command.
    pub fn data_request(&self) -> Option<&DataRequest> {
        match self {
            Command::FetchTableData(r)
            | Command::FetchMoreTableData(r)
            | Command::ExecuteCustomSql(r)
            | Command::FetchMoreCustomSql(r) => Some(r),
            _ => None,
        }
    }
}

/// Results re-entering the event loop.
#[derive(Debug, Clone)]
pub enum AppAction {
    /// `endpoint` is the `host:port` shown in the Connection pane.
    Connected {
        endpoint: String,
        result: Result<Arc<dyn NoSqlClient>, String>,
    },
    TablesLoaded(Result<Vec<String>, String>),
    TableDetailsLoaded {
        table: String,
        result: Result<TableDetails, String>,
    },
    TableDataLoaded {
        request: DataRequest,
        result: Result<Vec<Row>, String>,
    },
    ClientClosed,
    Copied(Result<(), String>),
    ClearCopyMessage(u64),
}
