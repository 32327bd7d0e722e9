//! Keyboard and mouse routing.
//!
//! Keys go to the first taker, in order: an open dialog, the global keys,
//! then the focused pane.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use nosql_core::api::{ConnectOptions, FieldValue};
use nosql_core::utils::input::{
    backspace, cursor_down, cursor_up, delete_at, insert_with_cursor, layout_editor, row_end,
    row_start, rune_len,
};
use ratatui::layout::{Position, Rect};

use super::App;
use super::state::{
    ConnectionDialogState, ConnectionField, ConnectionStatus, Dialog, FocusPane, RecordDetailState,
};
use crate::action::Command;
use crate::components::clipboard::format_record_json;
use crate::components::data_pane::content_width;
use crate::components::record_detail;
use crate::layout::PANE_BORDER;

/// Columns moved per Left/Right in the Data pane.
const HORIZONTAL_STEP: usize = 4;
/// Lines moved per PageUp/PageDown in the record detail dialog.
const DETAIL_PAGE: usize = 10;

fn has_ctrl(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
}

fn is_plain(key: &KeyEvent) -> bool {
    !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
}

impl App {
    /// Handle a key press and return the work it asks for.
    pub fn handle_key(&mut self, key: KeyEvent) -> Vec<Command> {
        let commands = self.route_key(key);
        self.refresh_layout();
        commands
    }

    fn route_key(&mut self, key: KeyEvent) -> Vec<Command> {
        // Ctrl+C quits from anywhere, dialogs included.
        if has_ctrl(&key) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return Vec::new();
        }

        match self.dialog {
            Some(Dialog::Connection(_)) => return self.handle_connection_dialog_key(key),
            Some(Dialog::RecordDetail(_)) => return self.handle_record_detail_key(key),
            None => {}
        }

        // `q` twice quits everywhere except in the editor.
        let confirming = std::mem::take(&mut self.ui.confirm_quit);
        if key.code == KeyCode::Char('q') && is_plain(&key) && self.focus != FocusPane::Sql {
            if confirming {
                self.should_quit = true;
            } else {
                self.ui.confirm_quit = true;
            }
            return Vec::new();
        }

        match key.code {
            KeyCode::Tab => {
                if self.connection.is_connected() {
                    self.focus = self.focus.next();
                }
                return Vec::new();
            }
            KeyCode::BackTab => {
                if self.connection.is_connected() {
                    self.focus = self.focus.previous();
                }
                return Vec::new();
            }
            _ => {}
        }

        match self.focus {
            FocusPane::Connection => self.handle_connection_key(key),
            FocusPane::Tables => self.handle_tables_key(key),
            FocusPane::Schema => self.handle_schema_key(key),
            FocusPane::Sql => self.handle_sql_key(key),
            FocusPane::Data => self.handle_data_key(key),
        }
    }

    // === Connection ===

    fn handle_connection_key(&mut self, key: KeyEvent) -> Vec<Command> {
        match key.code {
            KeyCode::Enter => {
                self.open_connection_dialog();
                Vec::new()
            }
            KeyCode::Char('d') if has_ctrl(&key) => self.disconnect(),
            _ => Vec::new(),
        }
    }

    fn open_connection_dialog(&mut self) {
        let endpoint = self.connection.last_endpoint.clone();
        self.dialog = Some(Dialog::Connection(ConnectionDialogState {
            cursor: rune_len(&endpoint),
            endpoint,
            port: self.connection.last_port.clone(),
            mode: self.connection.last_mode,
            field: ConnectionField::Endpoint,
            error: None,
        }));
    }

    /// Drop the connection and everything loaded through it.
    pub(super) fn disconnect(&mut self) -> Vec<Command> {
        let client = self.connection.client.take();
        if client.is_some() {
            log::info!("disconnected");
        }
        self.connection.status = ConnectionStatus::Disconnected;
        self.reset_session();
        self.focus = FocusPane::Connection;
        client.map(Command::CloseClient).into_iter().collect()
    }

    fn handle_connection_dialog_key(&mut self, key: KeyEvent) -> Vec<Command> {
        let Some(Dialog::Connection(state)) = self.dialog.as_mut() else {
            return Vec::new();
        };
        match key.code {
            KeyCode::Esc => self.dialog = None,
            KeyCode::Enter => return self.submit_connection_dialog(),
            KeyCode::Tab | KeyCode::Down => {
                state.field = state.field.next();
                state.cursor = dialog_field_len(state);
            }
            KeyCode::BackTab | KeyCode::Up => {
                state.field = state.field.previous();
                state.cursor = dialog_field_len(state);
            }
            _ => edit_dialog_field(state, key),
        }
        Vec::new()
    }

    fn submit_connection_dialog(&mut self) -> Vec<Command> {
        let Some(Dialog::Connection(state)) = self.dialog.as_mut() else {
            return Vec::new();
        };
        let endpoint = state.endpoint.trim().to_string();
        let port = state.port.trim().to_string();
        if endpoint.is_empty() {
            state.error = Some("Endpoint is required".to_string());
            return Vec::new();
        }
        if port.parse::<u16>().is_err() {
            state.error = Some("Port must be a number between 0 and 65535".to_string());
            return Vec::new();
        }
        let mode = state.mode;
        self.dialog = None;

        self.connection.last_endpoint = endpoint.clone();
        self.connection.last_port = port.clone();
        self.connection.last_mode = mode;

        let mut commands = self.disconnect();
        let options = ConnectOptions {
            endpoint,
            port,
            mode,
        };
        let display = options.display_endpoint();
        log::info!("connecting to {} ({})", display, mode.label());
        self.connection.status = ConnectionStatus::Connecting(display);
        commands.push(Command::Connect(options));
        commands
    }

    // === Tables ===

    fn handle_tables_key(&mut self, key: KeyEvent) -> Vec<Command> {
        let count = self.tables.tables.len();
        let page = (self.window.panes.tables as usize).max(1);
        let last = count.saturating_sub(1);
        let cursor = self.tables.cursor;
        let moved = match key.code {
            KeyCode::Up | KeyCode::Char('k') => cursor.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => (cursor + 1).min(last),
            KeyCode::PageUp => cursor.saturating_sub(page),
            KeyCode::PageDown => (cursor + page).min(last),
            KeyCode::Home | KeyCode::Char('g') => 0,
            KeyCode::End | KeyCode::Char('G') => last,
            KeyCode::Enter if count > 0 => return self.open_table(cursor),
            KeyCode::Char('r') => return self.refresh_data(),
            _ => return Vec::new(),
        };
        self.tables.cursor = moved;
        self.keep_table_cursor_visible();
        Vec::new()
    }

    fn keep_table_cursor_visible(&mut self) {
        let visible = (self.window.panes.tables as usize).max(1);
        let tables = &mut self.tables;
        tables.cursor = tables.cursor.min(tables.tables.len().saturating_sub(1));
        if tables.cursor < tables.scroll_offset {
            tables.scroll_offset = tables.cursor;
        } else if tables.cursor >= tables.scroll_offset + visible {
            tables.scroll_offset = tables.cursor + 1 - visible;
        }
    }

    // === Schema ===

    fn schema_max_scroll(&self) -> usize {
        let width = self
            .config
            .layout
            .left_pane_width
            .saturating_sub(PANE_BORDER) as usize;
        self.schema_pane()
            .line_count(width)
            .saturating_sub(self.window.panes.schema as usize)
    }

    fn handle_schema_key(&mut self, key: KeyEvent) -> Vec<Command> {
        let max = self.schema_max_scroll();
        let page = (self.window.panes.schema as usize).max(1);
        let scroll = self.schema.scroll_offset;
        let target = match key.code {
            KeyCode::Up | KeyCode::Char('k') => scroll.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => scroll + 1,
            KeyCode::PageUp => scroll.saturating_sub(page),
            KeyCode::PageDown => scroll + page,
            KeyCode::Home | KeyCode::Char('g') => 0,
            KeyCode::End | KeyCode::Char('G') => max,
            _ => return Vec::new(),
        };
        self.schema.scroll_offset = target.min(max);
        Vec::new()
    }

    // === SQL editor ===

    fn sql_content_width(&self) -> usize {
        (self
            .config
            .layout
            .left_pane_width
            .saturating_sub(PANE_BORDER) as usize)
            .max(1)
    }

    fn handle_sql_key(&mut self, key: KeyEvent) -> Vec<Command> {
        let width = self.sql_content_width();
        let sql = &mut self.sql;
        match key.code {
            KeyCode::Char('r') if has_ctrl(&key) => return self.execute_sql(),
            KeyCode::Char(c) if is_plain(&key) => {
                let (text, cursor) = insert_with_cursor(&sql.buffer, sql.cursor, &c.to_string());
                sql.buffer = text;
                sql.cursor = cursor;
            }
            KeyCode::Enter => {
                let (text, cursor) = insert_with_cursor(&sql.buffer, sql.cursor, "\n");
                sql.buffer = text;
                sql.cursor = cursor;
            }
            KeyCode::Backspace => {
                let (text, cursor) = backspace(&sql.buffer, sql.cursor);
                sql.buffer = text;
                sql.cursor = cursor;
            }
            KeyCode::Delete => sql.buffer = delete_at(&sql.buffer, sql.cursor),
            KeyCode::Left => sql.cursor = sql.cursor.saturating_sub(1),
            KeyCode::Right => sql.cursor = (sql.cursor + 1).min(rune_len(&sql.buffer)),
            KeyCode::Up => sql.cursor = cursor_up(&sql.buffer, width, sql.cursor),
            KeyCode::Down => sql.cursor = cursor_down(&sql.buffer, width, sql.cursor),
            KeyCode::Home => sql.cursor = row_start(&sql.buffer, width, sql.cursor),
            KeyCode::End => sql.cursor = row_end(&sql.buffer, width, sql.cursor),
            _ => return Vec::new(),
        }
        self.keep_sql_cursor_visible();
        Vec::new()
    }

    fn keep_sql_cursor_visible(&mut self) {
        let width = self.sql_content_width();
        let height = (self.window.panes.sql as usize).max(1);
        let layout = layout_editor(&self.sql.buffer, width, self.sql.cursor);
        let max = layout.lines.len().saturating_sub(height);
        let sql = &mut self.sql;
        if layout.cursor_row < sql.scroll_offset {
            sql.scroll_offset = layout.cursor_row;
        } else if layout.cursor_row >= sql.scroll_offset + height {
            sql.scroll_offset = layout.cursor_row + 1 - height;
        }
        sql.scroll_offset = sql.scroll_offset.min(max);
    }

    // === Data grid ===

    pub(super) fn data_viewport_rows(&self) -> usize {
        self.screen_layout()
            .map(|layout| layout.data_viewport_rows())
            .unwrap_or(0)
    }

    fn shown_row_count(&self) -> usize {
        self.shown_table()
            .and_then(|table| self.data.cache.get(table))
            .map_or(0, |entry| entry.rows.len())
    }

    fn max_horizontal_offset(&self) -> usize {
        let Some(table) = self.shown_table() else {
            return 0;
        };
        let Some(entry) = self.data.cache.get(table) else {
            return 0;
        };
        let viewport = self
            .screen_layout()
            .map(|layout| layout.data_viewport_width())
            .unwrap_or(0);
        content_width(&self.display_columns(table), entry).saturating_sub(viewport)
    }

    /// Keep the selected row inside the data and, once past the middle of
    /// the viewport, scroll so it stays in the middle.
    fn center_data_viewport(&mut self) {
        let total = self.shown_row_count();
        if total == 0 {
            self.data.selected_row = 0;
            self.data.viewport_offset = 0;
            return;
        }
        let rows = self.data_viewport_rows().max(1);
        self.data.selected_row = self.data.selected_row.min(total - 1);
        let max_offset = total.saturating_sub(rows);
        self.data.viewport_offset = self
            .data
            .selected_row
            .saturating_sub(rows / 2)
            .min(max_offset);
    }

    fn handle_data_key(&mut self, key: KeyEvent) -> Vec<Command> {
        let Some(table) = self.shown_table().map(str::to_string) else {
            return Vec::new();
        };
        let total = self.shown_row_count();
        let last = total.saturating_sub(1);
        let page = self.data_viewport_rows().max(1);
        let selected = self.data.selected_row;

        let moved_down = match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.data.selected_row = selected.saturating_sub(1);
                false
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.data.selected_row = (selected + 1).min(last);
                true
            }
            KeyCode::PageUp => {
                self.data.selected_row = selected.saturating_sub(page);
                false
            }
            KeyCode::PageDown => {
                self.data.selected_row = (selected + page).min(last);
                true
            }
            KeyCode::Home | KeyCode::Char('g') => {
                self.data.selected_row = 0;
                false
            }
            KeyCode::End | KeyCode::Char('G') => {
                self.data.selected_row = last;
                true
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.data.horizontal_offset =
                    self.data.horizontal_offset.saturating_sub(HORIZONTAL_STEP);
                return Vec::new();
            }
            KeyCode::Right | KeyCode::Char('l') => {
                let max = self.max_horizontal_offset();
                self.data.horizontal_offset = (self.data.horizontal_offset + HORIZONTAL_STEP).min(max);
                return Vec::new();
            }
            KeyCode::Enter => {
                self.open_record_detail(&table);
                return Vec::new();
            }
            KeyCode::Char('c') => return self.copy_selected_row(&table),
            KeyCode::Char('r') => return self.refresh_data(),
            KeyCode::Esc => return self.revert_custom_sql(),
            _ => return Vec::new(),
        };

        self.center_data_viewport();
        if moved_down {
            self.maybe_fetch_more()
        } else {
            Vec::new()
        }
    }

    fn selected_row(&self, table: &str) -> Option<&nosql_core::api::Row> {
        self.data
            .cache
            .get(table)
            .and_then(|entry| entry.rows.get(self.data.selected_row))
    }

    fn open_record_detail(&mut self, table: &str) {
        let Some(row) = self.selected_row(table).cloned() else {
            return;
        };
        let fields = self
            .display_columns(table)
            .into_iter()
            .map(|column| {
                let value = row.get(&column).cloned().unwrap_or(FieldValue::Null);
                (column, value)
            })
            .collect();
        self.dialog = Some(Dialog::RecordDetail(RecordDetailState {
            table: table.to_string(),
            fields,
            row,
            scroll: 0,
        }));
    }

    fn copy_selected_row(&self, table: &str) -> Vec<Command> {
        let Some(row) = self.selected_row(table) else {
            return Vec::new();
        };
        let json = format_record_json(&self.display_columns(table), row);
        vec![Command::CopyToClipboard(json)]
    }

    fn screen_area(&self) -> Rect {
        Rect::new(0, 0, self.window.width, self.window.height)
    }

    fn handle_record_detail_key(&mut self, key: KeyEvent) -> Vec<Command> {
        let area = self.screen_area();
        let Some(Dialog::RecordDetail(state)) = self.dialog.as_mut() else {
            return Vec::new();
        };
        let max = record_detail::max_scroll(state, area);
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => self.dialog = None,
            KeyCode::Up | KeyCode::Char('k') => state.scroll = state.scroll.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => state.scroll = (state.scroll + 1).min(max),
            KeyCode::PageUp => state.scroll = state.scroll.saturating_sub(DETAIL_PAGE),
            KeyCode::PageDown => state.scroll = (state.scroll + DETAIL_PAGE).min(max),
            KeyCode::Home | KeyCode::Char('g') => state.scroll = 0,
            KeyCode::End | KeyCode::Char('G') => state.scroll = max,
            KeyCode::Char('c') => {
                let columns: Vec<String> = state.fields.iter().map(|(c, _)| c.clone()).collect();
                return vec![Command::CopyToClipboard(format_record_json(
                    &columns, &state.row,
                ))];
            }
            _ => {}
        }
        Vec::new()
    }

    /// Re-fit every scroll position after a resize or a data change.
    pub(super) fn clamp_viewports(&mut self) {
        self.center_data_viewport();
        self.data.horizontal_offset = self.data.horizontal_offset.min(self.max_horizontal_offset());
        self.keep_table_cursor_visible();
        self.keep_sql_cursor_visible();
        self.schema.scroll_offset = self.schema.scroll_offset.min(self.schema_max_scroll());

        let area = self.screen_area();
        if let Some(Dialog::RecordDetail(state)) = self.dialog.as_mut() {
            state.scroll = state.scroll.min(record_detail::max_scroll(state, area));
        }
    }

    // === Mouse ===

    /// Wheel scrolls the pane under the pointer; a left click focuses it.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> Vec<Command> {
        if self.dialog.is_some() {
            return Vec::new();
        }
        let Some(layout) = self.screen_layout() else {
            return Vec::new();
        };
        let position = Position::new(mouse.column, mouse.row);
        let Some(pane) = [
            (FocusPane::Connection, layout.connection),
            (FocusPane::Tables, layout.tables),
            (FocusPane::Schema, layout.schema),
            (FocusPane::Sql, layout.sql),
            (FocusPane::Data, layout.data),
        ]
        .into_iter()
        .find(|(_, area)| area.contains(position))
        .map(|(pane, _)| pane) else {
            return Vec::new();
        };

        let code = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if pane == FocusPane::Connection || self.connection.is_connected() {
                    self.focus = pane;
                    self.ui.confirm_quit = false;
                }
                return Vec::new();
            }
            MouseEventKind::ScrollUp => KeyCode::Up,
            MouseEventKind::ScrollDown => KeyCode::Down,
            _ => return Vec::new(),
        };

        let key = KeyEvent::new(code, KeyModifiers::NONE);
        match pane {
            FocusPane::Connection => Vec::new(),
            FocusPane::Tables => self.handle_tables_key(key),
            FocusPane::Schema => self.handle_schema_key(key),
            FocusPane::Sql => {
                self.scroll_sql(code == KeyCode::Down);
                Vec::new()
            }
            FocusPane::Data => self.handle_data_key(key),
        }
    }

    /// Scroll the editor view without moving the cursor.
    fn scroll_sql(&mut self, down: bool) {
        let width = self.sql_content_width();
        let height = (self.window.panes.sql as usize).max(1);
        let total = layout_editor(&self.sql.buffer, width, self.sql.cursor)
            .lines
            .len();
        let max = total.saturating_sub(height);
        self.sql.scroll_offset = if down {
            (self.sql.scroll_offset + 1).min(max)
        } else {
            self.sql.scroll_offset.saturating_sub(1)
        };
    }
}

fn dialog_field_len(state: &ConnectionDialogState) -> usize {
    match state.field {
        ConnectionField::Endpoint => rune_len(&state.endpoint),
        ConnectionField::Port => rune_len(&state.port),
        ConnectionField::Mode => 0,
    }
}

/// Apply an editing key to the dialog's active field.
fn edit_dialog_field(state: &mut ConnectionDialogState, key: KeyEvent) {
    if state.field == ConnectionField::Mode {
        if matches!(
            key.code,
            KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right | KeyCode::Char('h') | KeyCode::Char('l')
        ) {
            state.mode = state.mode.toggle();
        }
        return;
    }

    let text = match state.field {
        ConnectionField::Endpoint => &mut state.endpoint,
        ConnectionField::Port => &mut state.port,
        ConnectionField::Mode => return,
    };
    match key.code {
        KeyCode::Char(c) if is_plain(&key) => {
            let (updated, cursor) = insert_with_cursor(text, state.cursor, &c.to_string());
            *text = updated;
            state.cursor = cursor;
        }
        KeyCode::Backspace => {
            let (updated, cursor) = backspace(text, state.cursor);
            *text = updated;
            state.cursor = cursor;
        }
        KeyCode::Delete => *text = delete_at(text, state.cursor),
        KeyCode::Left => state.cursor = state.cursor.saturating_sub(1),
        KeyCode::Right => state.cursor = (state.cursor + 1).min(rune_len(text)),
        KeyCode::Home => state.cursor = 0,
        KeyCode::End => state.cursor = rune_len(text),
        _ => return,
    }
    state.error = None;
}
