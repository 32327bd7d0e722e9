//! Data loading: what to fetch, and how a command is carried out.
//!
//! The planning half runs on the event loop and only builds [`Command`]s.
//! [`run_command`] is the worker half, executed in a spawned task.

use std::sync::Arc;

use nosql_core::api::{Connector, NoSqlClient, TableDetails, execute};
use nosql_core::core::ddl::{TableSchema, inherited_key_columns};
use nosql_core::core::query::{
    cursor_where, default_sql, extract_select_columns, fetch_query, has_limit_clause,
    offset_query, same_statement, strip_terminator, target_table,
};
use nosql_core::core::tables::ancestors;
use nosql_core::error::ClientError;

use super::App;
use super::state::FocusPane;
use crate::action::{AppAction, Command, DataRequest, Pagination};
use crate::components::clipboard::copy_to_clipboard;

impl App {
    pub(super) fn next_request_id(&mut self) -> u64 {
        self.data.request_id += 1;
        self.data.request_id
    }

    /// Full row key of `table` when its details are cached: inherited
    /// ancestor keys first, then the table's own.
    pub(super) fn cached_primary_keys(&self, table: &str) -> Option<Vec<String>> {
        let details = self.schema.cache.get(table)?;
        let schema = TableSchema::parse(&details.ddl);
        let mut keys: Vec<String> = inherited_key_columns(&details.ancestor_ddls, &schema)
            .into_iter()
            .map(|column| column.name)
            .collect();
        keys.extend(schema.primary_keys);
        Some(keys)
    }

    pub(super) fn set_sql_buffer(&mut self, sql: String) {
        self.sql.cursor = sql.chars().count();
        self.sql.buffer = sql;
        self.sql.scroll_offset = 0;
    }

    /// Back to the first row and column, error cleared.
    pub(super) fn reset_data_view(&mut self) {
        self.data.selected_row = 0;
        self.data.viewport_offset = 0;
        self.data.horizontal_offset = 0;
        self.data.error = None;
    }

    pub(super) fn clear_custom_sql(&mut self) {
        self.sql.custom_sql = false;
        self.sql.column_order.clear();
        self.sql.custom_target = None;
        self.sql.previous_selected = None;
        self.sql.selection_saved = false;
    }

    /// Details fetch for `table`, unless cached or already in flight.
    pub(super) fn request_details(&mut self, table: &str) -> Option<Command> {
        if self.schema.cache.contains_key(table) || self.schema.pending.contains(table) {
            return None;
        }
        self.schema.pending.insert(table.to_string());
        Some(Command::FetchTableDetails(table.to_string()))
    }

    /// Commit the table at catalog `index` (Enter in the Tables pane).
    pub(super) fn open_table(&mut self, index: usize) -> Vec<Command> {
        let Some(table) = self.tables.tables.get(index).cloned() else {
            return Vec::new();
        };
        self.tables.selected = Some(index);
        self.focus = FocusPane::Data;
        self.clear_custom_sql();
        self.reset_data_view();
        self.schema.scroll_offset = 0;
        self.schema.error = None;
        self.load_default(&table)
    }

    /// Load `table` with its default statement.
    ///
    /// The ORDER BY needs the primary keys, so unknown details are fetched
    /// first and the data fetch follows when they arrive.
    pub(super) fn load_default(&mut self, table: &str) -> Vec<Command> {
        self.data.loading = true;
        match self.cached_primary_keys(table) {
            Some(primary_keys) => {
                self.data.awaiting_details = None;
                self.set_sql_buffer(default_sql(table, &primary_keys));
                vec![self.standard_fetch(table, primary_keys)]
            }
            None => {
                // Results still in flight for this table are stale now.
                self.next_request_id();
                self.data.awaiting_details = Some(table.to_string());
                self.set_sql_buffer(default_sql(table, &[]));
                self.request_details(table).into_iter().collect()
            }
        }
    }

    /// First batch of the default statement.
    ///
    /// Without primary keys there is no cursor, so the batch continues by OFFSET.
    pub(super) fn standard_fetch(&mut self, table: &str, primary_keys: Vec<String>) -> Command {
        let limit = self.config.data.fetch_size;
        let base_sql = default_sql(table, &primary_keys);
        let (query, pagination) = if primary_keys.is_empty() {
            (
                offset_query(&base_sql, limit, 0),
                Pagination::Offset { offset: 0 },
            )
        } else {
            (
                fetch_query(table, &primary_keys, None, limit),
                Pagination::Cursor { primary_keys },
            )
        };
        self.data.loading = true;
        Command::FetchTableData(DataRequest {
            table: table.to_string(),
            request_id: self.next_request_id(),
            query,
            base_sql,
            pagination,
            limit,
            custom_sql: false,
            column_order: Vec::new(),
            append: false,
        })
    }

    /// First batch of a user statement. A statement with its own LIMIT or
    /// OFFSET runs verbatim and is never continued.
    fn custom_fetch(&mut self, table: &str, sql: &str) -> Command {
        let limit = self.config.data.fetch_size;
        let base_sql = strip_terminator(sql).to_string();
        let (query, pagination) = if has_limit_clause(&base_sql) {
            (base_sql.clone(), Pagination::Disabled)
        } else {
            (
                offset_query(&base_sql, limit, 0),
                Pagination::Offset { offset: 0 },
            )
        };
        self.data.loading = true;
        Command::ExecuteCustomSql(DataRequest {
            table: table.to_string(),
            request_id: self.next_request_id(),
            query,
            base_sql,
            pagination,
            limit,
            custom_sql: true,
            column_order: self.sql.column_order.clone(),
            append: false,
        })
    }

    /// Run the SQL pane's statement (Ctrl+R).
    pub(super) fn execute_sql(&mut self) -> Vec<Command> {
        if !self.connection.is_connected() {
            return Vec::new();
        }
        let sql = self.sql.buffer.trim().to_string();
        let table = match target_table(&sql) {
            Ok(table) => table,
            Err(e) => {
                log::debug!("statement not executed: {}", e);
                return Vec::new();
            }
        };
        let catalog_index = self.tables.find(&table);
        let table = match catalog_index {
            Some(index) => self.tables.tables[index].clone(),
            None => table,
        };

        self.focus = FocusPane::Data;
        self.reset_data_view();
        self.schema.scroll_offset = 0;
        self.schema.error = None;
        self.data.awaiting_details = None;

        if let Some(index) = catalog_index {
            let primary_keys = self.cached_primary_keys(&table).unwrap_or_default();
            if same_statement(&sql, &default_sql(&table, &primary_keys)) {
                self.clear_custom_sql();
                self.tables.selected = Some(index);
                return self.load_default(&table);
            }
        }

        if !self.sql.selection_saved {
            self.sql.previous_selected = self.tables.selected;
            self.sql.selection_saved = true;
        }
        match catalog_index {
            Some(index) => {
                self.tables.selected = Some(index);
                self.sql.custom_target = None;
            }
            None => self.sql.custom_target = Some(table.clone()),
        }
        self.sql.custom_sql = true;
        self.sql.column_order = extract_select_columns(&sql);
        log::info!("executing custom statement against {}", table);

        let mut commands: Vec<Command> = self.request_details(&table).into_iter().collect();
        commands.push(self.custom_fetch(&table, &sql));
        commands
    }

    /// Leave custom SQL mode and reload the default statement (Esc in the Data pane).
    pub(super) fn revert_custom_sql(&mut self) -> Vec<Command> {
        if !self.sql.custom_sql {
            return Vec::new();
        }
        if self.sql.custom_target.is_some() && self.sql.selection_saved {
            self.tables.selected = self.sql.previous_selected;
        }
        self.clear_custom_sql();
        self.reset_data_view();
        self.schema.scroll_offset = 0;
        self.schema.error = None;

        match self.tables.selected_name().map(str::to_string) {
            Some(table) => self.load_default(&table),
            None => {
                self.next_request_id();
                self.data.loading = false;
                self.set_sql_buffer(String::new());
                Vec::new()
            }
        }
    }

    /// Re-run the shown table's current statement (`r`).
    pub(super) fn refresh_data(&mut self) -> Vec<Command> {
        let Some(table) = self.shown_table().map(str::to_string) else {
            return Vec::new();
        };
        self.reset_data_view();
        if !self.sql.custom_sql {
            return self.load_default(&table);
        }
        let sql = self
            .data
            .cache
            .get(&table)
            .map(|entry| entry.current_sql.clone())
            .filter(|sql| !sql.is_empty())
            .unwrap_or_else(|| self.sql.buffer.clone());
        vec![self.custom_fetch(&table, &sql)]
    }

    /// Fetch the next batch when fewer than the threshold rows remain below
    /// the cursor. At most one data fetch is in flight.
    pub(super) fn maybe_fetch_more(&mut self) -> Vec<Command> {
        if self.data.loading {
            return Vec::new();
        }
        let Some(table) = self.shown_table().map(str::to_string) else {
            return Vec::new();
        };
        let Some(entry) = self.data.cache.get(&table) else {
            return Vec::new();
        };
        if !entry.has_more || entry.rows.is_empty() {
            return Vec::new();
        }
        let remaining = entry.rows.len().saturating_sub(self.data.selected_row + 1);
        if remaining >= self.config.data.fetch_more_threshold {
            return Vec::new();
        }

        let limit = self.config.data.fetch_size;
        let (wrap, query, pagination): (fn(DataRequest) -> Command, String, Pagination) =
            if entry.is_custom_sql {
                (
                    Command::FetchMoreCustomSql,
                    offset_query(&entry.current_sql, limit, entry.offset),
                    Pagination::Offset {
                        offset: entry.offset,
                    },
                )
            } else if entry.primary_keys.is_empty() {
                (
                    Command::FetchMoreTableData,
                    offset_query(&entry.current_sql, limit, entry.offset),
                    Pagination::Offset {
                        offset: entry.offset,
                    },
                )
            } else {
                let Some(predicate) = entry
                    .last_pk_values
                    .as_deref()
                    .and_then(|last| cursor_where(&entry.primary_keys, last))
                else {
                    log::warn!("no cursor for {}; not fetching more", table);
                    return Vec::new();
                };
                (
                    Command::FetchMoreTableData,
                    fetch_query(&table, &entry.primary_keys, Some(&predicate), limit),
                    Pagination::Cursor {
                        primary_keys: entry.primary_keys.clone(),
                    },
                )
            };
        let base_sql = entry.current_sql.clone();
        let custom_sql = entry.is_custom_sql;
        let column_order = entry.column_order.clone();

        self.data.loading = true;
        let request = DataRequest {
            table,
            request_id: self.next_request_id(),
            query,
            base_sql,
            pagination,
            limit,
            custom_sql,
            column_order,
            append: true,
        };
        log::debug!("fetching more rows: {}", request.query);
        vec![wrap(request)]
    }
}

fn not_connected() -> String {
    ClientError::Closed.to_string()
}

/// DDL and indexes of `table`, plus the DDL of each ancestor.
///
/// Only the table's own DDL is required; index and ancestor failures are
/// logged and leave those parts empty.
async fn fetch_table_details(
    client: &dyn NoSqlClient,
    table: &str,
) -> Result<TableDetails, ClientError> {
    let ddl = client.get_table(table).await?;
    let indexes = match client.get_indexes(table).await {
        Ok(indexes) => indexes,
        Err(e) => {
            log::warn!("failed to load indexes of {}: {}", table, e);
            Vec::new()
        }
    };

    let mut ancestor_ddls = Vec::new();
    for ancestor in ancestors(table) {
        match client.get_table(&ancestor).await {
            Ok(ddl) => ancestor_ddls.push((ancestor, ddl)),
            Err(e) => log::warn!("failed to load DDL of ancestor {}: {}", ancestor, e),
        }
    }

    Ok(TableDetails {
        ddl,
        indexes,
        ancestor_ddls,
    })
}

/// Carry out `command` and describe the outcome.
///
/// `client` is the session's client at the time the command was issued.
pub async fn run_command(
    command: Command,
    client: Option<Arc<dyn NoSqlClient>>,
    connector: &dyn Connector,
) -> AppAction {
    match command {
        Command::Connect(options) => {
            let endpoint = options.display_endpoint();
            let result = connector.connect(options).await.map_err(|e| {
                log::error!("connection to {} failed: {}", endpoint, e);
                e.to_string()
            });
            AppAction::Connected { endpoint, result }
        }
        Command::FetchTables => {
            let result = match client {
                Some(client) => client.list_tables().await.map_err(|e| e.to_string()),
                None => Err(not_connected()),
            };
            AppAction::TablesLoaded(result)
        }
        Command::FetchTableDetails(table) => {
            let result = match client {
                Some(client) => fetch_table_details(client.as_ref(), &table)
                    .await
                    .map_err(|e| e.to_string()),
                None => Err(not_connected()),
            };
            AppAction::TableDetailsLoaded { table, result }
        }
        Command::FetchTableData(request)
        | Command::FetchMoreTableData(request)
        | Command::ExecuteCustomSql(request)
        | Command::FetchMoreCustomSql(request) => {
            let result = match client {
                Some(client) => execute(client.as_ref(), &request.query)
                    .await
                    .map_err(|e| e.to_string()),
                None => Err(not_connected()),
            };
            AppAction::TableDataLoaded { request, result }
        }
        Command::CloseClient(client) => {
            client.close().await;
            AppAction::ClientClosed
        }
        Command::CopyToClipboard(text) => {
            let result =
                tokio::task::spawn_blocking(move || copy_to_clipboard(&text).map_err(|e| e.to_string()))
                    .await
                    .unwrap_or_else(|e| Err(format!("Clipboard task failed: {}", e)));
            AppAction::Copied(result)
        }
        Command::ClearCopyMessageAfter {
            generation,
            delay_ms,
        } => {
            tokio::time::sleep(std::time::Duration::from_millis(delay_ms)).await;
            AppAction::ClearCopyMessage(generation)
        }
    }
}
