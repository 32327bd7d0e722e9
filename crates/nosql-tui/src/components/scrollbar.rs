//! Scrollbar thumbs embedded in pane borders.
//!
//! The track is the border line itself; the thumb is drawn over it with the
//! thick rule characters.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

pub const MIN_HORIZONTAL_THUMB: usize = 3;
pub const MIN_VERTICAL_THUMB: usize = 1;

pub const THIN_HORIZONTAL: &str = "─";
pub const THICK_HORIZONTAL: &str = "━";
pub const THIN_VERTICAL: &str = "│";
pub const THICK_VERTICAL: &str = "┃";

/// Thumb placement along a track of `length` cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thumb {
    pub start: usize,
    pub size: usize,
}

/// Thumb for `viewport` of `total` units scrolled by `offset`.
///
/// `None` when everything fits. The thumb touches the track ends exactly at
/// offset 0 and at the maximum offset.
pub fn thumb(
    total: usize,
    viewport: usize,
    offset: usize,
    length: usize,
    min_size: usize,
) -> Option<Thumb> {
    if total <= viewport || length == 0 {
        return None;
    }
    let size = (length * viewport / total).max(min_size).min(length);
    let travel = length - size;
    let max_offset = total - viewport;
    let start = if offset == 0 {
        0
    } else if offset >= max_offset {
        travel
    } else {
        offset * travel / max_offset
    };
    Some(Thumb { start, size })
}

/// Horizontal track as text, `length` cells long.
pub fn horizontal_track(total: usize, viewport: usize, offset: usize, length: usize) -> String {
    let thumb = thumb(total, viewport, offset, length, MIN_HORIZONTAL_THUMB);
    (0..length)
        .map(|i| match thumb {
            Some(t) if i >= t.start && i < t.start + t.size => THICK_HORIZONTAL,
            _ => THIN_HORIZONTAL,
        })
        .collect()
}

/// Vertical track cells, top to bottom.
pub fn vertical_track(
    total: usize,
    viewport: usize,
    offset: usize,
    length: usize,
) -> Vec<&'static str> {
    let thumb = thumb(total, viewport, offset, length, MIN_VERTICAL_THUMB);
    (0..length)
        .map(|i| match thumb {
            Some(t) if i >= t.start && i < t.start + t.size => THICK_VERTICAL,
            _ => THIN_VERTICAL,
        })
        .collect()
}

/// Overwrite the bottom border of `pane` (corners excluded) with a horizontal thumb.
pub fn draw_horizontal(buf: &mut Buffer, pane: Rect, total: usize, viewport: usize, offset: usize) {
    if pane.width < 3 || pane.height == 0 {
        return;
    }
    let y = pane.bottom() - 1;
    let length = (pane.width - 2) as usize;
    for (i, symbol) in horizontal_track(total, viewport, offset, length)
        .chars()
        .enumerate()
    {
        if let Some(cell) = buf.cell_mut((pane.x + 1 + i as u16, y)) {
            cell.set_char(symbol);
        }
    }
}

/// Overwrite the right border of `pane` (corners excluded) with a vertical thumb.
pub fn draw_vertical(buf: &mut Buffer, pane: Rect, total: usize, viewport: usize, offset: usize) {
    if pane.height < 3 || pane.width == 0 {
        return;
    }
    let x = pane.right() - 1;
    let length = (pane.height - 2) as usize;
    for (i, symbol) in vertical_track(total, viewport, offset, length)
        .into_iter()
        .enumerate()
    {
        if let Some(cell) = buf.cell_mut((x, pane.y + 1 + i as u16)) {
            cell.set_symbol(symbol);
        }
    }
}
