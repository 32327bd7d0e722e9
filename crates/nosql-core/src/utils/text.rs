//! Display-width aware text helpers.
//!
//! All widths here are terminal columns: wide characters count as two,
//! combining marks as zero. Byte lengths are never used for layout.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const ELLIPSIS: char = '…';

pub fn display_width(text: &str) -> usize {
    text.width()
}

pub fn char_width(ch: char) -> usize {
    ch.width().unwrap_or(0)
}

/// Cut `text` to `max_width` columns, ending in a single `…` when shortened.
///
/// # Examples
/// ```
/// use nosql_core::utils::text::truncate_with_ellipsis;
/// assert_eq!(truncate_with_ellipsis("Hello World", 6), "Hello…");
/// assert_eq!(truncate_with_ellipsis("Hi", 6), "Hi");
/// ```
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let target = max_width - 1;
    let mut result = String::new();
    let mut current = 0;
    for ch in text.chars() {
        let w = char_width(ch);
        if current + w > target {
            break;
        }
        result.push(ch);
        current += w;
    }
    result.push(ELLIPSIS);
    result
}

/// Left-align `text` in `width` columns (no truncation).
pub fn pad_to_width(text: &str, width: usize) -> String {
    let text_width = text.width();
    if text_width >= width {
        text.to_string()
    } else {
        format!("{}{}", text, " ".repeat(width - text_width))
    }
}

/// Right-align `text` in `width` columns (no truncation).
pub fn pad_left_to_width(text: &str, width: usize) -> String {
    let text_width = text.width();
    if text_width >= width {
        text.to_string()
    } else {
        format!("{}{}", " ".repeat(width - text_width), text)
    }
}

/// The `width` columns of `text` starting at column `offset`, padded with spaces.
///
/// A wide character split by either edge is replaced with spaces so the
/// result is always exactly `width` columns.
pub fn slice_columns(text: &str, offset: usize, width: usize) -> String {
    let mut out = String::new();
    let mut col = 0;
    let mut used = 0;
    for ch in text.chars() {
        if used >= width {
            break;
        }
        let w = char_width(ch);
        let start = col;
        col += w;
        if col <= offset {
            continue;
        }
        if start < offset {
            // straddles the left edge
            let visible = (col - offset).min(width - used);
            out.push_str(&" ".repeat(visible));
            used += visible;
            continue;
        }
        if used + w > width {
            out.push_str(&" ".repeat(width - used));
            used = width;
            break;
        }
        out.push(ch);
        used += w;
    }
    if used < width {
        out.push_str(&" ".repeat(width - used));
    }
    out
}

/// Break `text` into lines of at most `max_width` columns, preferring word boundaries.
pub fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    if text.is_empty() || max_width == 0 {
        return vec![String::new()];
    }

    let mut lines = Vec::new();
    for logical in text.split('\n') {
        let mut current = String::new();
        let mut current_width = 0;
        for word in logical.split(' ') {
            let word_width = word.width();
            let sep = usize::from(!current.is_empty());
            if current_width + sep + word_width <= max_width {
                if sep == 1 {
                    current.push(' ');
                }
                current.push_str(word);
                current_width += sep + word_width;
                continue;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            // Hard-break words wider than the line.
            for ch in word.chars() {
                let w = char_width(ch);
                if current_width + w > max_width && !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                current.push(ch);
                current_width += w;
            }
        }
        lines.push(current);
    }
    lines
}
