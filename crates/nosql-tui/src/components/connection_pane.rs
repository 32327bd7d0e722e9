//! Connection pane: status of the database connection.
//!
//! Its height depends on the status, and the lower left panes are laid out
//! under whatever it renders.

use nosql_core::utils::text::truncate_with_ellipsis;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::{Component, pane_block, styles};
use crate::app::state::{ConnectionState, ConnectionStatus};
use crate::layout::PANE_BORDER;

pub struct ConnectionPane<'a> {
    pub state: &'a ConnectionState,
}

impl ConnectionPane<'_> {
    /// Content lines for a pane `width` columns wide (borders excluded).
    pub fn lines(&self, width: usize) -> Vec<Line<'static>> {
        match &self.state.status {
            ConnectionStatus::Disconnected => vec![
                Line::from(vec![
                    Span::styled("○ ", styles::TEXT_DIM),
                    Span::raw("Not connected"),
                ]),
                Line::from(Span::styled(
                    truncate_with_ellipsis("Press Enter to connect", width),
                    styles::TEXT_DIM,
                )),
            ],
            ConnectionStatus::Connecting(endpoint) => vec![Line::from(Span::styled(
                truncate_with_ellipsis(&format!("◐ Connecting to {}…", endpoint), width),
                styles::TEXT_WARNING,
            ))],
            ConnectionStatus::Connected(endpoint) => vec![Line::from(vec![
                Span::styled("● ", styles::TEXT_SUCCESS),
                Span::raw(truncate_with_ellipsis(
                    &format!("Connected  {}", endpoint),
                    width.saturating_sub(2),
                )),
            ])],
            ConnectionStatus::Error(message) => vec![
                Line::from(Span::styled("✗ Connection failed", styles::TEXT_ERROR)),
                Line::from(Span::styled(
                    truncate_with_ellipsis(message, width),
                    styles::TEXT_ERROR,
                )),
            ],
        }
    }

    /// Rendered height including borders.
    pub fn height(&self, width: usize) -> u16 {
        self.lines(width).len() as u16 + PANE_BORDER
    }
}

impl Component for ConnectionPane<'_> {
    fn draw(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let width = area.width.saturating_sub(PANE_BORDER) as usize;
        let paragraph =
            Paragraph::new(self.lines(width)).block(pane_block(" Connection ".to_string(), focused));
        frame.render_widget(paragraph, area);
    }
}
