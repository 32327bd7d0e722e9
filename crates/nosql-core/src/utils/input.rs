//! Editing primitives for single- and multi-line text inputs.
//!
//! Cursor positions are rune (char) indices, never byte offsets, and every
//! operation clamps out-of-range positions instead of failing.

use super::text::char_width;

pub fn rune_len(text: &str) -> usize {
    text.chars().count()
}

fn byte_index(text: &str, pos: usize) -> usize {
    text.char_indices()
        .nth(pos)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

/// Insert `insert` before rune `pos`.
pub fn insert_at(text: &str, pos: usize, insert: &str) -> String {
    let at = byte_index(text, pos);
    let mut out = String::with_capacity(text.len() + insert.len());
    out.push_str(&text[..at]);
    out.push_str(insert);
    out.push_str(&text[at..]);
    out
}

/// Remove the rune at `pos`. Past the end, the text is returned unchanged.
pub fn delete_at(text: &str, pos: usize) -> String {
    if pos >= rune_len(text) {
        return text.to_string();
    }
    text.chars()
        .enumerate()
        .filter(|(i, _)| *i != pos)
        .map(|(_, c)| c)
        .collect()
}

/// Remove the rune before `cursor`; returns the new text and cursor.
pub fn backspace(text: &str, cursor: usize) -> (String, usize) {
    let cursor = cursor.min(rune_len(text));
    if cursor == 0 {
        return (text.to_string(), 0);
    }
    (delete_at(text, cursor - 1), cursor - 1)
}

/// Insert at `cursor` and advance it past the inserted runes.
pub fn insert_with_cursor(text: &str, cursor: usize, insert: &str) -> (String, usize) {
    let cursor = cursor.min(rune_len(text));
    (insert_at(text, cursor, insert), cursor + rune_len(insert))
}

/// One soft-wrapped row of a multi-line input, as a rune range `[start, end)`.
///
/// `end` never includes the `\n` that terminated the logical line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisualLine {
    pub start: usize,
    pub end: usize,
}

/// Soft-wrap `text` into rows of at most `width` columns.
///
/// Explicit newlines always start a new row; an empty logical line yields
/// one empty row.
pub fn wrap_lines(text: &str, width: usize) -> Vec<VisualLine> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut start = 0;
    let mut used = 0;
    let mut pos = 0;

    for ch in text.chars() {
        if ch == '\n' {
            lines.push(VisualLine { start, end: pos });
            pos += 1;
            start = pos;
            used = 0;
            continue;
        }
        let w = char_width(ch);
        if used + w > width && pos > start {
            lines.push(VisualLine { start, end: pos });
            start = pos;
            used = 0;
        }
        used += w;
        pos += 1;
    }
    lines.push(VisualLine { start, end: pos });
    lines
}

/// Wrapped rows plus the cursor's row and visual column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorLayout {
    pub lines: Vec<VisualLine>,
    pub cursor_row: usize,
    pub cursor_col: usize,
}

fn columns_between(chars: &[char], start: usize, end: usize) -> usize {
    chars[start..end].iter().map(|c| char_width(*c)).sum()
}

/// Lay out `text` at `width` columns and locate `cursor` in it.
///
/// When the cursor sits after a row that fills the width exactly, an empty
/// row is inserted after it so the cursor has a cell to occupy.
pub fn layout_editor(text: &str, width: usize, cursor: usize) -> EditorLayout {
    let width = width.max(1);
    let chars: Vec<char> = text.chars().collect();
    let cursor = cursor.min(chars.len());
    let mut lines = wrap_lines(text, width);

    let mut row = lines.len() - 1;
    for (i, line) in lines.iter().enumerate() {
        if cursor < line.start {
            break;
        }
        if cursor <= line.end {
            row = i;
            // At a soft-wrap boundary the cursor belongs to the next row.
            let soft_wrapped = lines
                .get(i + 1)
                .is_some_and(|next| next.start == line.end && cursor == line.end);
            if !soft_wrapped {
                break;
            }
        }
    }

    let line = lines[row];
    let mut col = columns_between(&chars, line.start, cursor);
    if col >= width {
        lines.insert(
            row + 1,
            VisualLine {
                start: cursor,
                end: cursor,
            },
        );
        row += 1;
        col = 0;
    }

    EditorLayout {
        lines,
        cursor_row: row,
        cursor_col: col,
    }
}

/// Rune index in `line` closest to visual column `col` without passing it.
fn position_at_column(chars: &[char], line: VisualLine, col: usize) -> usize {
    let mut used = 0;
    for pos in line.start..line.end {
        let w = char_width(chars[pos]);
        if used + w > col {
            return pos;
        }
        used += w;
    }
    line.end
}

/// Cursor after moving one visual row up, keeping the column where possible.
pub fn cursor_up(text: &str, width: usize, cursor: usize) -> usize {
    let layout = layout_editor(text, width, cursor);
    if layout.cursor_row == 0 {
        return cursor.min(rune_len(text));
    }
    let chars: Vec<char> = text.chars().collect();
    position_at_column(&chars, layout.lines[layout.cursor_row - 1], layout.cursor_col)
}

/// Cursor after moving one visual row down, keeping the column where possible.
pub fn cursor_down(text: &str, width: usize, cursor: usize) -> usize {
    let layout = layout_editor(text, width, cursor);
    if layout.cursor_row + 1 >= layout.lines.len() {
        return cursor.min(rune_len(text));
    }
    let chars: Vec<char> = text.chars().collect();
    let target = layout.lines[layout.cursor_row + 1];
    let pos = position_at_column(&chars, target, layout.cursor_col);
    // Landing on the end of a soft-wrapped row would display on the next row.
    let next_starts_here = layout
        .lines
        .get(layout.cursor_row + 2)
        .is_some_and(|next| next.start == target.end);
    if pos == target.end && next_starts_here && target.end > target.start {
        pos - 1
    } else {
        pos
    }
}

/// Rune index of the start of the cursor's visual row.
pub fn row_start(text: &str, width: usize, cursor: usize) -> usize {
    let layout = layout_editor(text, width, cursor);
    layout.lines[layout.cursor_row].start
}

/// Rune index of the end of the cursor's visual row.
pub fn row_end(text: &str, width: usize, cursor: usize) -> usize {
    let layout = layout_editor(text, width, cursor);
    let line = layout.lines[layout.cursor_row];
    let soft_wrapped = layout
        .lines
        .get(layout.cursor_row + 1)
        .is_some_and(|next| next.start == line.end && line.end > line.start);
    if soft_wrapped { line.end - 1 } else { line.end }
}
