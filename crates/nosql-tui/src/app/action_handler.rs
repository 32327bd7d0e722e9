//! Result dispatch.
//!
//! Every spawned command answers with one [`AppAction`]; this is where the
//! answer is folded back into the session.

use nosql_core::api::{NoSqlClient, Row, TableDetails};
use nosql_core::core::query::{default_sql, primary_key_values};
use nosql_core::core::tables::sort_table_tree;
use std::sync::Arc;

use super::App;
use super::state::{ConnectionStatus, DataState, SchemaState, SqlState, TableData, TablesState};
use crate::action::{AppAction, Command, DataRequest, Pagination};

const COPIED_MESSAGE: &str = "Copied to clipboard";

impl App {
    /// Apply a command result.
    pub fn handle_action(&mut self, action: AppAction) -> Vec<Command> {
        let commands = match action {
            AppAction::Connected { endpoint, result } => self.on_connected(endpoint, result),
            AppAction::TablesLoaded(result) => self.on_tables_loaded(result),
            AppAction::TableDetailsLoaded { table, result } => {
                self.on_details_loaded(table, result)
            }
            AppAction::TableDataLoaded { request, result } => self.on_data_loaded(request, result),
            AppAction::ClientClosed => {
                log::debug!("client closed");
                Vec::new()
            }
            AppAction::Copied(result) => self.on_copied(result),
            AppAction::ClearCopyMessage(generation) => {
                if generation == self.ui.copy_generation {
                    self.ui.copy_message = None;
                    self.ui.copy_failed = false;
                }
                Vec::new()
            }
        };
        // The Connection pane height, and so the left column, may have changed.
        self.refresh_layout();
        commands
    }

    /// Forget everything learned from the database.
    pub(super) fn reset_session(&mut self) {
        self.tables = TablesState::default();
        self.schema = SchemaState::default();
        // Request ids stay monotonic so late results can never match.
        let request_id = self.data.request_id;
        self.data = DataState {
            request_id,
            ..Default::default()
        };
        self.sql = SqlState::default();
    }

    fn on_connected(
        &mut self,
        endpoint: String,
        result: Result<Arc<dyn NoSqlClient>, String>,
    ) -> Vec<Command> {
        let expected =
            matches!(&self.connection.status, ConnectionStatus::Connecting(e) if *e == endpoint);
        match result {
            Ok(client) if !expected => {
                log::info!("dropping superseded connection to {}", endpoint);
                vec![Command::CloseClient(client)]
            }
            Ok(client) => {
                log::info!("connected to {}", endpoint);
                let mut commands = Vec::new();
                if let Some(old) = self.connection.client.replace(client) {
                    commands.push(Command::CloseClient(old));
                }
                self.reset_session();
                self.connection.status = ConnectionStatus::Connected(endpoint);
                self.tables.loading = true;
                commands.push(Command::FetchTables);
                commands
            }
            Err(_) if !expected => Vec::new(),
            Err(message) => {
                self.connection.status = ConnectionStatus::Error(message);
                Vec::new()
            }
        }
    }

    fn on_tables_loaded(&mut self, result: Result<Vec<String>, String>) -> Vec<Command> {
        if !self.connection.is_connected() {
            return Vec::new();
        }
        match result {
            Ok(names) => {
                let tables = sort_table_tree(names);
                log::info!("loaded {} tables", tables.len());
                self.tables = TablesState {
                    tables,
                    ..Default::default()
                };
            }
            Err(message) => {
                log::error!("failed to list tables: {}", message);
                self.tables = TablesState::default();
            }
        }
        Vec::new()
    }

    fn on_details_loaded(
        &mut self,
        table: String,
        result: Result<TableDetails, String>,
    ) -> Vec<Command> {
        self.schema.pending.remove(&table);
        if !self.connection.is_connected() {
            return Vec::new();
        }

        let shown = self.shown_table() == Some(table.as_str());
        match result {
            Ok(details) => {
                self.schema.cache.insert(table.clone(), details);
                if shown {
                    self.schema.error = None;
                }
            }
            Err(message) => {
                log::warn!("failed to load details of {}: {}", table, message);
                if shown {
                    self.schema.error = Some(message);
                }
            }
        }

        // The first data fetch of a just-opened table waits for its keys.
        if self.data.awaiting_details.as_deref() != Some(table.as_str()) {
            return Vec::new();
        }
        self.data.awaiting_details = None;
        if self.sql.custom_sql || self.tables.selected_name() != Some(table.as_str()) {
            return Vec::new();
        }
        let primary_keys = self.cached_primary_keys(&table).unwrap_or_default();
        self.set_sql_buffer(default_sql(&table, &primary_keys));
        vec![self.standard_fetch(&table, primary_keys)]
    }

    fn on_data_loaded(
        &mut self,
        request: DataRequest,
        result: Result<Vec<Row>, String>,
    ) -> Vec<Command> {
        let latest = request.request_id == self.data.request_id;
        if latest {
            self.data.loading = false;
        }
        if !self.connection.is_connected() {
            return Vec::new();
        }
        let shown = self.shown_table() == Some(request.table.as_str());
        if shown && !latest {
            log::debug!(
                "discarding stale result #{} for {}",
                request.request_id,
                request.table
            );
            return Vec::new();
        }

        let rows = match result {
            Ok(rows) => rows,
            Err(message) => {
                log::error!("query failed ({}): {}", request.query, message);
                if request.append {
                    // Keep what was loaded; stop continuing.
                    if let Some(entry) = self.data.cache.get_mut(&request.table) {
                        entry.has_more = false;
                    }
                } else {
                    self.data.cache.insert(
                        request.table.clone(),
                        TableData {
                            is_custom_sql: request.custom_sql,
                            column_order: request.column_order,
                            current_sql: request.base_sql,
                            ..Default::default()
                        },
                    );
                    if shown {
                        self.data.error = Some(message);
                    }
                }
                return Vec::new();
            }
        };

        let count = rows.len();
        let has_more = request.pagination != Pagination::Disabled && count == request.limit;
        let next_offset = match &request.pagination {
            Pagination::Offset { offset } => offset + count,
            _ => 0,
        };
        log::debug!(
            "{} rows for {} (more: {})",
            count,
            request.table,
            has_more
        );

        if request.append {
            let Some(entry) = self.data.cache.get_mut(&request.table) else {
                return Vec::new();
            };
            if let Some(last) = rows.last() {
                entry.last_pk_values = primary_key_values(last, &entry.primary_keys);
            }
            entry.rows.extend(rows);
            entry.has_more = has_more;
            entry.offset = next_offset;
        } else {
            let primary_keys = match request.pagination {
                Pagination::Cursor { primary_keys } => primary_keys,
                _ => Vec::new(),
            };
            let last_pk_values = rows
                .last()
                .and_then(|last| primary_key_values(last, &primary_keys));
            self.data.cache.insert(
                request.table.clone(),
                TableData {
                    rows,
                    last_pk_values,
                    primary_keys,
                    has_more,
                    is_custom_sql: request.custom_sql,
                    column_order: request.column_order,
                    current_sql: request.base_sql,
                    offset: next_offset,
                },
            );
        }

        if shown {
            self.data.error = None;
            self.clamp_viewports();
        }
        Vec::new()
    }

    fn on_copied(&mut self, result: Result<(), String>) -> Vec<Command> {
        let (message, failed) = match result {
            Ok(()) => (COPIED_MESSAGE.to_string(), false),
            Err(message) => {
                log::warn!("copy failed: {}", message);
                (message, true)
            }
        };
        self.ui.copy_message = Some(message);
        self.ui.copy_failed = failed;
        self.ui.copy_generation += 1;
        vec![Command::ClearCopyMessageAfter {
            generation: self.ui.copy_generation,
            delay_ms: self.config.ui.copy_message_ms,
        }]
    }
}
