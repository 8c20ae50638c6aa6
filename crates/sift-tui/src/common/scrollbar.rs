//! Conversation scrollbar.
//!
//! The thumb length is computed once from the content and viewport sizes, so
//! it does not change size while the view scrolls (ratatui's built-in
//! scrollbar rounds both thumb ends separately). When messages arrived below
//! the viewport and the deferred scroll has not caught up yet, the bottom
//! track cell shows an arrow.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;

const THUMB_SYMBOL: &str = "█";
const TRACK_SYMBOL: &str = "│";
const NEW_BELOW_SYMBOL: &str = "↓";

#[derive(Debug, Clone)]
pub struct Scrollbar {
    line_count: usize,
    viewport_height: usize,
    offset: usize,
    new_below: bool,
    style: Style,
    marker_style: Style,
}

impl Scrollbar {
    pub fn new(line_count: usize, viewport_height: usize, offset: usize) -> Self {
        Self {
            line_count,
            viewport_height,
            offset,
            new_below: false,
            style: Style::default(),
            marker_style: Style::default(),
        }
    }

    #[must_use]
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Marks unseen messages below the viewport with `marker_style`.
    #[must_use]
    pub fn new_below(mut self, new_below: bool, marker_style: Style) -> Self {
        self.new_below = new_below;
        self.marker_style = marker_style;
        self
    }

    fn max_offset(&self) -> usize {
        self.line_count.saturating_sub(self.viewport_height)
    }

    /// `(start, len)` of the thumb on a track of `track_len` cells, or `None`
    /// when everything fits.
    fn thumb(&self, track_len: usize) -> Option<(usize, usize)> {
        let max_offset = self.max_offset();
        if track_len == 0 || max_offset == 0 {
            return None;
        }
        let visible = self.viewport_height.min(track_len);

        // Rounded track_len * visible / (line_count - 1 + visible).
        let denom = (self.line_count - 1 + visible) as u64;
        let len = ((track_len as u64 * visible as u64 + denom / 2) / denom) as usize;
        let len = len.clamp(1, track_len);

        let room = track_len - len;
        let start = (self.offset.min(max_offset) as u64 * room as u64 / max_offset as u64) as usize;
        Some((start, len))
    }

    /// Symbol and style for each track cell, top to bottom.
    fn cells(&self, track_len: usize) -> Vec<(&'static str, Style)> {
        let Some((start, len)) = self.thumb(track_len) else {
            return Vec::new();
        };
        let mut cells: Vec<(&'static str, Style)> = (0..track_len)
            .map(|idx| {
                let symbol = if (start..start + len).contains(&idx) {
                    THUMB_SYMBOL
                } else {
                    TRACK_SYMBOL
                };
                (symbol, self.style)
            })
            .collect();
        if self.new_below
            && start + len < track_len
            && let Some(last) = cells.last_mut()
        {
            *last = (NEW_BELOW_SYMBOL, self.marker_style);
        }
        cells
    }
}

impl Widget for Scrollbar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let x = area.x + area.width.saturating_sub(1);
        for (y, (symbol, style)) in (area.y..area.bottom()).zip(self.cells(area.height as usize)) {
            buf.set_string(x, y, symbol, style);
        }
    }
}

#[cfg(test)]
mod tests {
    use ratatui::style::Color;

    use super::*;

    fn symbols(scrollbar: &Scrollbar, track_len: usize) -> String {
        scrollbar.cells(track_len).into_iter().map(|(s, _)| s).collect()
    }

    #[test]
    fn test_hidden_when_content_fits() {
        assert!(Scrollbar::new(10, 20, 0).cells(20).is_empty());
        assert!(Scrollbar::new(20, 20, 0).cells(20).is_empty());
        assert_eq!(Scrollbar::new(100, 20, 0).cells(20).len(), 20);
    }

    #[test]
    fn test_thumb_reaches_bottom_at_max_offset() {
        let (start, len) = Scrollbar::new(100, 20, 80).thumb(20).unwrap();
        assert_eq!(start + len, 20);
    }

    #[test]
    fn test_thumb_size_is_stable() {
        let top = Scrollbar::new(100, 20, 0).thumb(20).unwrap();
        let middle = Scrollbar::new(100, 20, 37).thumb(20).unwrap();
        assert_eq!(top.0, 0);
        assert_eq!(top.1, middle.1);
    }

    #[test]
    fn test_new_below_marks_last_cell() {
        let marker = Style::default().fg(Color::Yellow);
        let scrollbar = Scrollbar::new(40, 4, 0).new_below(true, marker);
        let cells = scrollbar.cells(4);
        assert_eq!(symbols(&scrollbar, 4), "█││↓");
        assert_eq!(cells[3].1, marker);
    }

    #[test]
    fn test_new_below_hidden_once_at_bottom() {
        let scrollbar = Scrollbar::new(40, 4, 36).new_below(true, Style::default());
        assert!(!symbols(&scrollbar, 4).contains(NEW_BELOW_SYMBOL));
    }
}
