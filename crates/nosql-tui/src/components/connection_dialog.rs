//! Connection dialog: endpoint, port and mode entry.

use nosql_core::utils::text::{char_width, pad_to_width};
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};

use super::{centered_rect, styles};
use crate::app::state::{ConnectionDialogState, ConnectionField};

pub const DIALOG_WIDTH: u16 = 56;
pub const DIALOG_HEIGHT: u16 = 11;
const LABEL_WIDTH: usize = 11;

pub struct ConnectionDialog<'a> {
    pub state: &'a ConnectionDialogState,
}

/// Visible part of a text field, scrolled so the cursor stays in view.
fn field_spans(text: &str, cursor: usize, width: usize, active: bool) -> Vec<Span<'static>> {
    let field = Style::default().bg(Color::DarkGray).fg(Color::White);
    let chars: Vec<char> = text.chars().collect();
    let cursor = cursor.min(chars.len());

    // Leftmost char such that everything up to and including the cursor cell fits.
    let mut start = 0;
    if active {
        let mut used = 1;
        let mut i = cursor;
        while i > 0 && used + char_width(chars[i - 1]) <= width {
            used += char_width(chars[i - 1]);
            i -= 1;
        }
        start = i;
    }

    let mut spans = Vec::new();
    let mut used = 0;
    let mut pending = String::new();
    for (pos, ch) in chars.iter().enumerate().skip(start) {
        let w = char_width(*ch);
        if used + w > width {
            break;
        }
        if active && pos == cursor {
            spans.push(Span::styled(std::mem::take(&mut pending), field));
            spans.push(Span::styled(ch.to_string(), styles::cursor_style()));
        } else {
            pending.push(*ch);
        }
        used += w;
    }
    if active && cursor == chars.len() && used < width {
        spans.push(Span::styled(std::mem::take(&mut pending), field));
        spans.push(Span::styled(" ", styles::cursor_style()));
        used += 1;
    }
    pending.push_str(&" ".repeat(width.saturating_sub(used)));
    spans.push(Span::styled(pending, field));
    spans
}

impl ConnectionDialog<'_> {
    fn label(&self, text: &str, field: ConnectionField) -> Span<'static> {
        let style = if self.state.field == field {
            styles::selected_style()
        } else {
            Style::default()
        };
        Span::styled(pad_to_width(&format!(" {}", text), LABEL_WIDTH), style)
    }

    pub fn lines(&self, inner_width: usize) -> Vec<Line<'static>> {
        let field_width = inner_width.saturating_sub(LABEL_WIDTH + 2);
        let state = self.state;

        let mut endpoint = vec![self.label("Endpoint", ConnectionField::Endpoint), Span::raw(" ")];
        endpoint.extend(field_spans(
            &state.endpoint,
            state.cursor,
            field_width,
            state.field == ConnectionField::Endpoint,
        ));

        let mut port = vec![self.label("Port", ConnectionField::Port), Span::raw(" ")];
        port.extend(field_spans(
            &state.port,
            state.cursor,
            field_width,
            state.field == ConnectionField::Port,
        ));

        let mode_style = if state.field == ConnectionField::Mode {
            styles::TEXT_ACCENT
        } else {
            Style::default()
        };
        let mode = vec![
            self.label("Mode", ConnectionField::Mode),
            Span::raw(" "),
            Span::styled(format!("◀ {} ▶", state.mode.label()), mode_style),
        ];

        let error = match &state.error {
            Some(message) => Line::from(Span::styled(format!(" {}", message), styles::TEXT_ERROR)),
            None => Line::default(),
        };

        vec![
            Line::default(),
            Line::from(endpoint),
            Line::from(port),
            Line::from(mode),
            Line::default(),
            error,
            Line::default(),
            Line::from(Span::styled(
                " Enter connect · Tab next field · Esc cancel",
                styles::TEXT_DIM,
            )),
        ]
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        let popup = centered_rect(DIALOG_WIDTH, DIALOG_HEIGHT, area);
        frame.render_widget(Clear, popup);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(styles::BORDER_FOCUSED)
            .title(Span::styled(" Connect ", styles::modal_title_style()))
            .title_alignment(Alignment::Center);
        let inner_width = block.inner(popup).width as usize;
        frame.render_widget(Paragraph::new(self.lines(inner_width)).block(block), popup);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nosql_core::api::ConnectMode;

    fn text(spans: &[Span]) -> String {
        spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn state() -> ConnectionDialogState {
        ConnectionDialogState {
            endpoint: "localhost".to_string(),
            port: "8080".to_string(),
            mode: ConnectMode::OnPremise,
            field: ConnectionField::Endpoint,
            cursor: 9,
            error: Some("Port must be a number".to_string()),
        }
    }

    #[test]
    fn test_field_spans_pad_to_width() {
        let spans = field_spans("abc", 1, 6, true);
        assert_eq!(text(&spans), "abc   ");
        assert!(spans.iter().any(|s| s.content == "b" && s.style == styles::cursor_style()));
    }

    #[test]
    fn test_field_spans_scroll_to_cursor() {
        let spans = field_spans("abcdefgh", 8, 4, true);
        assert_eq!(text(&spans), "fgh ");
        let inactive = field_spans("abcdefgh", 8, 4, false);
        assert_eq!(text(&inactive), "abcd");
    }

    #[test]
    fn test_lines_show_values_and_error() {
        let state = state();
        let dialog = ConnectionDialog { state: &state };
        let lines: Vec<String> = dialog
            .lines(54)
            .iter()
            .map(|l| text(&l.spans))
            .collect();
        assert!(lines[1].starts_with(" Endpoint"));
        assert!(lines[1].contains("localhost"));
        assert!(lines[2].contains("8080"));
        assert!(lines[3].contains("◀ On-premise ▶"));
        assert_eq!(lines[5], " Port must be a number");
    }
}
