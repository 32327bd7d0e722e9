//! Footer line.
//!
//! Shows the keybindings of the focused pane, or a transient message, with
//! the application name right-aligned.

use nosql_core::utils::text::{display_width, truncate_with_ellipsis};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::styles;
use crate::app::state::FocusPane;

const APP_NAME: &str = "nosql-tui";

/// Key binding display item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBinding {
    pub key: &'static str,
    pub action: &'static str,
}

impl KeyBinding {
    pub const fn new(key: &'static str, action: &'static str) -> Self {
        Self { key, action }
    }
}

pub struct Footer<'a> {
    pub focus: FocusPane,
    pub connected: bool,
    pub custom_sql: bool,
    /// Copy confirmation or failure.
    pub message: Option<&'a str>,
    pub message_is_error: bool,
    pub confirm_quit: bool,
}

/// Bindings listed while `focus` has focus.
pub fn bindings(focus: FocusPane, connected: bool, custom_sql: bool) -> Vec<KeyBinding> {
    match focus {
        FocusPane::Connection if !connected => vec![
            KeyBinding::new("Enter", "Connect"),
            KeyBinding::new("q", "Quit"),
        ],
        FocusPane::Connection => vec![
            KeyBinding::new("Enter", "Reconnect"),
            KeyBinding::new("Ctrl+D", "Disconnect"),
            KeyBinding::new("Tab", "Next pane"),
            KeyBinding::new("q", "Quit"),
        ],
        FocusPane::Tables => vec![
            KeyBinding::new("↑↓", "Move"),
            KeyBinding::new("Enter", "Open"),
            KeyBinding::new("r", "Refresh"),
            KeyBinding::new("Tab", "Next pane"),
            KeyBinding::new("q", "Quit"),
        ],
        FocusPane::Schema => vec![
            KeyBinding::new("↑↓", "Scroll"),
            KeyBinding::new("Tab", "Next pane"),
            KeyBinding::new("q", "Quit"),
        ],
        FocusPane::Sql => vec![
            KeyBinding::new("Ctrl+R", "Run"),
            KeyBinding::new("Tab", "Next pane"),
            KeyBinding::new("Ctrl+C", "Quit"),
        ],
        FocusPane::Data => {
            let mut list = vec![
                KeyBinding::new("↑↓", "Rows"),
                KeyBinding::new("←→", "Scroll"),
                KeyBinding::new("Enter", "Detail"),
                KeyBinding::new("c", "Copy"),
            ];
            if custom_sql {
                list.push(KeyBinding::new("Esc", "Default SQL"));
            }
            list.push(KeyBinding::new("q", "Quit"));
            list
        }
    }
}

impl Footer<'_> {
    fn left_spans(&self) -> Vec<Span<'static>> {
        if self.confirm_quit {
            return vec![Span::styled(" Press q again to quit", styles::TEXT_WARNING)];
        }
        if let Some(message) = self.message {
            let style = if self.message_is_error {
                styles::TEXT_ERROR
            } else {
                styles::TEXT_SUCCESS
            };
            return vec![Span::styled(format!(" {}", message), style)];
        }

        let mut spans = Vec::new();
        for (i, binding) in bindings(self.focus, self.connected, self.custom_sql)
            .into_iter()
            .enumerate()
        {
            if i > 0 {
                spans.push(Span::styled(" │", styles::TEXT_DIM));
            }
            spans.push(Span::styled(
                format!(" {} ", binding.key),
                styles::KEY_HINT,
            ));
            spans.push(Span::raw(binding.action));
        }
        spans
    }

    pub fn line(&self, width: usize) -> Line<'static> {
        let name_width = APP_NAME.len() + 1;
        let mut spans = self.left_spans();
        let used: usize = spans.iter().map(|s| display_width(&s.content)).sum();

        if used + name_width > width {
            // Not enough room: keep the hints, drop the name.
            let text: String = spans.iter().map(|s| s.content.as_ref()).collect();
            let style = spans.first().map(|s| s.style).unwrap_or_default();
            return Line::from(Span::styled(truncate_with_ellipsis(&text, width), style));
        }
        let gap = width - used - name_width;
        spans.push(Span::raw(" ".repeat(gap)));
        spans.push(Span::styled(APP_NAME, styles::TEXT_ACCENT));
        spans.push(Span::raw(" "));
        Line::from(spans)
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Paragraph::new(self.line(area.width as usize)), area);
    }
}
