//! Shared style definitions for TUI components.
//!
//! Every pane and dialog takes its colors from here so focus, error and
//! selection states look the same everywhere.

use ratatui::style::{Color, Modifier, Style};

/// Accent color for focused borders, titles and the focused selection.
pub const PRIMARY: Color = Color::Cyan;

// === Border Styles ===

/// Border style for focused components.
pub const BORDER_FOCUSED: Style = Style::new().fg(PRIMARY);

/// Border style for unfocused components.
pub const BORDER_UNFOCUSED: Style = Style::new().fg(Color::DarkGray);

/// Get border style based on focus state.
#[inline]
pub fn border_style(focused: bool) -> Style {
    if focused {
        BORDER_FOCUSED
    } else {
        BORDER_UNFOCUSED
    }
}

/// Pane title style based on focus state.
pub fn title_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    }
}

// === Table Styles ===

/// Style for grid header text.
pub fn header_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

/// Selected grid row. The background follows the Data pane's focus.
pub fn row_highlight_style(focused: bool) -> Style {
    let bg = if focused { PRIMARY } else { Color::DarkGray };
    Style::default()
        .fg(Color::Black)
        .bg(bg)
        .add_modifier(Modifier::BOLD)
}

/// NULL cell on a selected row: dim text on the selection background.
pub fn null_selected_style(focused: bool) -> Style {
    let bg = if focused { PRIMARY } else { Color::DarkGray };
    Style::default().fg(Color::Gray).bg(bg).add_modifier(Modifier::DIM)
}

/// Tables pane cursor row.
pub fn cursor_row_style(focused: bool) -> Style {
    if focused {
        Style::default()
            .fg(Color::Black)
            .bg(PRIMARY)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::REVERSED)
    }
}

// === Text Styles ===

/// Style for dimmed/hint text and NULL cells.
pub const TEXT_DIM: Style = Style::new().fg(Color::DarkGray);

/// Style for warning/loading text.
pub const TEXT_WARNING: Style = Style::new().fg(Color::Yellow);

/// Style for error text.
pub const TEXT_ERROR: Style = Style::new().fg(Color::Red);

/// Style for success text.
pub const TEXT_SUCCESS: Style = Style::new().fg(Color::Green);

/// Accent text (app name, active dialog values).
pub const TEXT_ACCENT: Style = Style::new().fg(PRIMARY);

/// Key names in the footer hints.
pub const KEY_HINT: Style = Style::new().fg(Color::Yellow);

/// Column names in the record detail dialog.
pub fn field_name_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

// === Modal Styles ===

/// Style for modal titles.
pub fn modal_title_style() -> Style {
    Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

/// Style for the active field label in a dialog.
pub fn selected_style() -> Style {
    Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

// === Input Styles ===

/// Block cursor drawn over the character it sits on.
pub fn cursor_style() -> Style {
    Style::default().fg(Color::Black).bg(Color::White)
}

/// Style for input text.
pub fn input_text_style() -> Style {
    Style::default().fg(Color::White)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_border_style_focused() {
        assert_eq!(border_style(true).fg, Some(Color::Cyan));
        assert_eq!(border_style(false).fg, Some(Color::DarkGray));
    }

    #[test]
    fn test_row_highlight_follows_focus() {
        assert_eq!(row_highlight_style(true).bg, Some(Color::Cyan));
        assert_eq!(row_highlight_style(false).bg, Some(Color::DarkGray));
        assert_eq!(null_selected_style(true).bg, Some(Color::Cyan));
    }

    #[test]
    fn test_highlight_text_styles() {
        assert_eq!(KEY_HINT.fg, Some(Color::Yellow));
        let name = field_name_style();
        assert_eq!(name.fg, Some(Color::Yellow));
        assert!(name.add_modifier.contains(Modifier::BOLD));
    }
}
