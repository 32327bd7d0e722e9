//! UI components for nosql-tui.
//!
//! Panes implement [`Component`]; dialogs draw themselves centered over the
//! whole frame. Components only read state, they never mutate it.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Borders};

pub mod clipboard;
pub mod connection_dialog;
pub mod connection_pane;
pub mod data_pane;
pub mod grid;
pub mod record_detail;
pub mod schema_pane;
pub mod scrollbar;
pub mod sql_pane;
pub mod status_bar;
pub mod styles;
pub mod tables_pane;

pub use connection_dialog::ConnectionDialog;
pub use connection_pane::ConnectionPane;
pub use data_pane::DataPane;
pub use record_detail::RecordDetailView;
pub use schema_pane::SchemaPane;
pub use sql_pane::SqlPane;
pub use status_bar::Footer;
pub use tables_pane::TablesPane;

/// Trait for drawable panes.
pub trait Component {
    /// Draw the component into `area`.
    fn draw(&self, frame: &mut Frame, area: Rect, focused: bool);
}

/// Rounded pane frame with a focus-aware border and title.
pub fn pane_block(title: String, focused: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(styles::border_style(focused))
        .title(Span::styled(title, styles::title_style(focused)))
}

/// A `width` x `height` rectangle centered in `area`, clamped to it.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
