//! Application state and the main run loop.
//!
//! ## Module Structure
//! - `mod.rs`: App struct, run loop, command spawning and the view composer
//! - `state.rs`: plain session state
//! - `input_handler.rs`: key and mouse routing
//! - `data_handler.rs`: fetch planning and command execution
//! - `action_handler.rs`: result dispatch
//!
//! Handlers are synchronous and never touch the network. They return
//! [`Command`]s, which [`App::run_async`] spawns; every command answers with
//! exactly one [`AppAction`] on the action channel.

mod action_handler;
mod data_handler;
mod input_handler;
pub mod state;


use std::collections::HashMap;
use std::sync::Arc;

use nosql_core::api::{Connector, FieldValue, is_numeric_type};
use nosql_core::core::ddl::{TableSchema, inherited_key_columns};
use nosql_core::storage::config::Config;
use ratatui::layout::{Alignment, Rect};
use ratatui::widgets::Paragraph;
use ratatui::{Frame, Terminal, backend::Backend};
use tokio::sync::mpsc;

use crate::action::{AppAction, Command};
use crate::components::{
    Component, ConnectionDialog, ConnectionPane, DataPane, Footer, RecordDetailView, SchemaPane,
    SqlPane, TablesPane, styles,
};
use crate::error::TuiResult;
use crate::event::{Event, EventHandler};
use crate::layout::{Degraded, PANE_BORDER, ScreenLayout};

pub use data_handler::run_command;
use state::{
    ConnectionState, DataState, Dialog, FocusPane, SchemaState, SqlState, TablesState, UiState,
    WindowState,
};

const TICK_RATE_MS: u64 = 250;

/// The main application state.
pub struct App {
    /// Whether the application should quit
    pub should_quit: bool,
    pub(crate) config: Config,
    pub(crate) focus: FocusPane,
    pub(crate) window: WindowState,
    pub(crate) connection: ConnectionState,
    pub(crate) tables: TablesState,
    pub(crate) schema: SchemaState,
    pub(crate) data: DataState,
    pub(crate) sql: SqlState,
    /// Connection or record-detail dialog, never both.
    pub(crate) dialog: Option<Dialog>,
    pub(crate) ui: UiState,
    connector: Arc<dyn Connector>,
    /// Action sender handed to spawned commands
    action_tx: mpsc::UnboundedSender<AppAction>,
    action_rx: mpsc::UnboundedReceiver<AppAction>,
}

impl App {
    pub fn new(config: Config, connector: Arc<dyn Connector>) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let connection = ConnectionState::new(
            config.connection.endpoint.clone(),
            config.connection.port.clone(),
        );

        Self {
            should_quit: false,
            config,
            focus: FocusPane::Connection,
            window: WindowState::default(),
            connection,
            tables: TablesState::default(),
            schema: SchemaState::default(),
            data: DataState::default(),
            sql: SqlState::default(),
            dialog: None,
            ui: UiState::default(),
            connector,
            action_tx,
            action_rx,
        }
    }

    /// Run the main application loop until the user quits.
    pub async fn run_async<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> TuiResult<()> {
        let mut events = EventHandler::new(TICK_RATE_MS);
        let size = terminal.size()?;
        self.on_resize(size.width, size.height);

        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;

            let commands = tokio::select! {
                event = events.next() => match event {
                    Some(Ok(event)) => self.handle_event(event),
                    Some(Err(e)) => return Err(e.into()),
                    None => break,
                },
                Some(action) = self.action_rx.recv() => self.handle_action(action),
            };
            for command in commands {
                self.spawn_command(command);
            }
        }

        self.shutdown().await;
        Ok(())
    }

    /// Route one terminal event.
    pub fn handle_event(&mut self, event: Event) -> Vec<Command> {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(width, height) => {
                self.on_resize(width, height);
                Vec::new()
            }
            Event::Tick => Vec::new(),
        }
    }

    /// Run `command` off the event loop; its result comes back on the action channel.
    fn spawn_command(&self, command: Command) {
        let tx = self.action_tx.clone();
        let client = self.connection.client.clone();
        let connector = Arc::clone(&self.connector);
        tokio::spawn(async move {
            let action = run_command(command, client, connector.as_ref()).await;
            let _ = tx.send(action);
        });
    }

    /// Release the client on the way out.
    async fn shutdown(&mut self) {
        if let Some(client) = self.connection.client.take() {
            client.close().await;
        }
    }

    pub(crate) fn on_resize(&mut self, width: u16, height: u16) {
        self.window.width = width;
        self.window.height = height;
        self.refresh_layout();
        self.clamp_viewports();
    }

    // === Layout ===

    /// Rendered Connection pane height, borders included.
    pub(crate) fn connection_height(&self) -> u16 {
        let width = self
            .config
            .layout
            .left_pane_width
            .saturating_sub(PANE_BORDER) as usize;
        ConnectionPane {
            state: &self.connection,
        }
        .height(width)
    }

    pub(crate) fn screen_layout(&self) -> Option<ScreenLayout> {
        ScreenLayout::compute(
            self.window.width,
            self.window.height,
            self.connection_height(),
            self.config.layout.left_pane_width,
        )
        .ok()
    }

    /// Recompute the lower-pane heights after anything that changes the layout.
    pub(crate) fn refresh_layout(&mut self) {
        if let Some(layout) = self.screen_layout() {
            self.window.panes = layout.heights;
        }
    }

    // === Derived views ===

    /// Table whose schema and rows are on screen.
    pub(crate) fn shown_table(&self) -> Option<&str> {
        self.sql
            .custom_target
            .as_deref()
            .or_else(|| self.tables.selected_name())
    }

    pub(crate) fn schema_pane(&self) -> SchemaPane<'_> {
        let shown = self.shown_table();
        SchemaPane {
            table: shown,
            details: shown.and_then(|t| self.schema.cache.get(t)),
            // A custom target outside the catalog shows "No schema" until its fetch fails.
            loading: self.sql.custom_target.is_none()
                && shown.is_some_and(|t| self.schema.pending.contains(t)),
            error: self.schema.error.as_deref(),
            scroll: self.schema.scroll_offset,
        }
    }

    /// Column order for the grid, the record detail and the clipboard.
    ///
    /// A custom SELECT list wins; otherwise inherited key columns followed
    /// by the DDL columns. Row keys neither names are appended.
    pub(crate) fn display_columns(&self, table: &str) -> Vec<String> {
        let Some(entry) = self.data.cache.get(table) else {
            return Vec::new();
        };

        let mut columns: Vec<String> = if !entry.column_order.is_empty() {
            entry.column_order.clone()
        } else if let Some(details) = self.schema.cache.get(table) {
            let schema = TableSchema::parse(&details.ddl);
            inherited_key_columns(&details.ancestor_ddls, &schema)
                .into_iter()
                .map(|c| c.name)
                .chain(schema.column_order())
                .collect()
        } else {
            Vec::new()
        };

        if let Some(first) = entry.rows.first() {
            columns.retain(|c| first.contains_key(c));
            for key in first.keys() {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
        }
        columns
    }

    /// Right-align flag per column: declared numeric type, or a numeric
    /// first non-null value when the type is unknown.
    pub(crate) fn numeric_flags(&self, table: &str, columns: &[String]) -> Vec<bool> {
        let mut types: HashMap<String, String> = HashMap::new();
        if let Some(details) = self.schema.cache.get(table) {
            let schema = TableSchema::parse(&details.ddl);
            for column in inherited_key_columns(&details.ancestor_ddls, &schema)
                .into_iter()
                .chain(schema.columns)
            {
                types.insert(column.name.to_ascii_lowercase(), column.type_name);
            }
        }
        let rows = self
            .data
            .cache
            .get(table)
            .map(|e| e.rows.as_slice())
            .unwrap_or_default();

        columns
            .iter()
            .map(|column| match types.get(&column.to_ascii_lowercase()) {
                Some(type_name) => is_numeric_type(type_name),
                None => rows
                    .iter()
                    .filter_map(|row| row.get(column))
                    .find(|v| !v.is_null())
                    .is_some_and(|v| matches!(v, FieldValue::Integer(_) | FieldValue::Float(_))),
            })
            .collect()
    }

    // === View composer ===

    pub fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let layout = match ScreenLayout::compute(
            area.width,
            area.height,
            self.connection_height(),
            self.config.layout.left_pane_width,
        ) {
            Ok(layout) => layout,
            Err(degraded) => {
                draw_degraded(frame, area, degraded);
                return;
            }
        };

        match &self.dialog {
            Some(Dialog::Connection(state)) => {
                ConnectionDialog { state }.draw(frame, area);
                return;
            }
            Some(Dialog::RecordDetail(state)) => {
                RecordDetailView { state }.draw(frame, area);
                return;
            }
            None => {}
        }

        let connected = self.connection.is_connected();
        let shown = self.shown_table();

        ConnectionPane {
            state: &self.connection,
        }
        .draw(frame, layout.connection, self.focus == FocusPane::Connection);

        TablesPane {
            state: &self.tables,
            connected,
            hide_marker: self.sql.custom_target.is_some(),
        }
        .draw(frame, layout.tables, self.focus == FocusPane::Tables);

        self.schema_pane()
            .draw(frame, layout.schema, self.focus == FocusPane::Schema);

        SqlPane { state: &self.sql }.draw(frame, layout.sql, self.focus == FocusPane::Sql);

        let columns = shown.map(|t| self.display_columns(t)).unwrap_or_default();
        let numeric = shown
            .map(|t| self.numeric_flags(t, &columns))
            .unwrap_or_default();
        DataPane {
            table: shown,
            entry: shown.and_then(|t| self.data.cache.get(t)),
            columns: &columns,
            numeric: &numeric,
            state: &self.data,
            custom: self.sql.custom_sql,
        }
        .draw(frame, layout.data, self.focus == FocusPane::Data);

        Footer {
            focus: self.focus,
            connected,
            custom_sql: self.sql.custom_sql,
            message: self.ui.copy_message.as_deref(),
            message_is_error: self.ui.copy_failed,
            confirm_quit: self.ui.confirm_quit,
        }
        .draw(frame, layout.footer);
    }
}

/// Centered notice shown instead of the panes.
fn draw_degraded(frame: &mut Frame, area: Rect, degraded: Degraded) {
    if area.height == 0 {
        return;
    }
    let row = Rect::new(area.x, area.y + area.height / 2, area.width, 1);
    let paragraph = Paragraph::new(degraded.message())
        .style(styles::TEXT_WARNING)
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, row);
}
