use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use super::style::{Style, StyledLine, StyledSpan};

#[derive(Clone, Copy)]
struct Cell<'a> {
    grapheme: &'a str,
    style: Style,
    width: usize,
}

impl Cell<'_> {
    fn is_space(&self) -> bool {
        self.grapheme.chars().all(char::is_whitespace)
    }
}

/// Wraps a styled line to `width` display columns.
///
/// Breaks after the last whitespace that fits and falls back to breaking
/// between graphemes when a single word is wider than the line. Whitespace
/// at the wrap point is dropped. A zero width disables wrapping.
pub fn wrap_line(line: &StyledLine, width: usize) -> Vec<StyledLine> {
    let cells: Vec<Cell<'_>> = line
        .spans
        .iter()
        .flat_map(|span| {
            span.text.graphemes(true).map(move |g| Cell {
                grapheme: g,
                style: span.style,
                width: g.width(),
            })
        })
        .collect();

    let total: usize = cells.iter().map(|c| c.width).sum();
    if width == 0 || total <= width {
        return vec![line.clone()];
    }

    let mut out: Vec<Vec<Cell<'_>>> = Vec::new();
    let mut current: Vec<Cell<'_>> = Vec::new();
    let mut current_width = 0usize;
    // Index just past the last whitespace cell in `current`.
    let mut break_at: Option<usize> = None;

    for cell in cells {
        while current_width + cell.width > width && !current.is_empty() {
            match break_at.take() {
                Some(at) if at < current.len() => {
                    let tail = current.split_off(at);
                    out.push(trim_end(current));
                    current = tail;
                    current_width = current.iter().map(|c| c.width).sum();
                }
                _ => {
                    out.push(trim_end(std::mem::take(&mut current)));
                    current_width = 0;
                }
            }
        }
        if current.is_empty() && cell.is_space() && !out.is_empty() {
            continue;
        }
        current_width += cell.width;
        current.push(cell);
        if cell.is_space() {
            break_at = Some(current.len());
        }
    }
    if !current.is_empty() || out.is_empty() {
        out.push(current);
    }

    out.into_iter().map(|cells| to_line(&cells)).collect()
}

fn trim_end(mut cells: Vec<Cell<'_>>) -> Vec<Cell<'_>> {
    while cells.last().is_some_and(Cell::is_space) {
        cells.pop();
    }
    cells
}

fn to_line(cells: &[Cell<'_>]) -> StyledLine {
    let mut spans: Vec<StyledSpan> = Vec::new();
    for cell in cells {
        match spans.last_mut() {
            Some(last) if last.style == cell.style => last.text.push_str(cell.grapheme),
            _ => spans.push(StyledSpan::new(cell.grapheme, cell.style)),
        }
    }
    StyledLine::from_spans(spans)
}
