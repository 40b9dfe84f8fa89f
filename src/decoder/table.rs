//! Box-Drawn Table Recognition
//!
//! The child renders result tables with one of two box-drawing vocabularies:
//! a heavy style (`┏┳┓ ┃ ┗┻┛`) and a light style (`┌┬┐ │ └┴┘`). Some child
//! versions mix them inside one frame (heavy header block, light body), so
//! frame completion accepts either closing corner and data rows are split on
//! whichever divider they actually contain.

use crate::error::{Error, Result};
use crate::models::TableFrame;

/// The two border-character vocabularies the child is known to emit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableStyle {
    /// Heavy box drawing: `┏┳┓ ┃ ┗┻┛`
    Heavy,
    /// Light box drawing: `┌┬┐ │ └┴┘`
    Light,
}

impl TableStyle {
    /// Detect the style of the first table opening in `text`
    pub fn detect(text: &str) -> Option<TableStyle> {
        text.chars().find_map(|c| match c {
            '┏' => Some(TableStyle::Heavy),
            '┌' => Some(TableStyle::Light),
            _ => None,
        })
    }

    /// Opening (top-left) corner character
    pub const fn open_corner(&self) -> char {
        match self {
            TableStyle::Heavy => '┏',
            TableStyle::Light => '┌',
        }
    }

    /// Vertical cell divider character
    pub const fn divider(&self) -> char {
        match self {
            TableStyle::Heavy => '┃',
            TableStyle::Light => '│',
        }
    }

    /// Render a frame back into bordered text in this style.
    ///
    /// Columns are sized to their widest cell. Mostly useful for debug
    /// display and for exercising the parser against known-good frames.
    pub fn render(&self, frame: &TableFrame) -> String {
        let (h, corners, tees) = match self {
            TableStyle::Heavy => ('━', ['┏', '┓', '┗', '┛'], ['┳', '┻', '┣', '┫', '╋']),
            TableStyle::Light => ('─', ['┌', '┐', '└', '┘'], ['┬', '┴', '├', '┤', '┼']),
        };
        let div = self.divider();

        let mut widths: Vec<usize> = frame.headers.iter().map(|s| s.chars().count()).collect();
        for row in &frame.rows {
            for (i, cell) in row.iter().enumerate() {
                let w = cell.chars().count();
                if i < widths.len() && w > widths[i] {
                    widths[i] = w;
                }
            }
        }

        let bar = |left: char, mid: char, right: char| -> String {
            let mut line = String::new();
            line.push(left);
            for (i, w) in widths.iter().enumerate() {
                for _ in 0..w + 2 {
                    line.push(h);
                }
                line.push(if i + 1 == widths.len() { right } else { mid });
            }
            line.push('\n');
            line
        };
        let cells = |row: &[String]| -> String {
            let mut line = String::new();
            line.push(div);
            for (i, w) in widths.iter().enumerate() {
                let cell = row.get(i).map(String::as_str).unwrap_or("");
                let pad = w - cell.chars().count();
                line.push(' ');
                line.push_str(cell);
                for _ in 0..pad + 1 {
                    line.push(' ');
                }
                line.push(div);
            }
            line.push('\n');
            line
        };

        let mut out = String::new();
        out.push_str(&bar(corners[0], tees[0], corners[1]));
        out.push_str(&cells(&frame.headers));
        out.push_str(&bar(tees[2], tees[4], tees[3]));
        for row in &frame.rows {
            out.push_str(&cells(row));
        }
        out.push_str(&bar(corners[2], tees[1], corners[3]));
        out
    }
}

/// Extract the next complete table frame from `text`.
///
/// Returns `None` while no frame has both its opening and closing border in
/// the buffer (partial frames wait for more data). Once a frame is complete
/// it is parsed and returned together with its byte range in `text`, so the
/// caller can order it against other findings and advance its consumed
/// position; a parse failure still yields the range.
pub fn next_frame(text: &str) -> Option<(Result<TableFrame>, std::ops::Range<usize>)> {
    let open = text
        .char_indices()
        .find(|(_, c)| *c == '┏' || *c == '┌')
        .map(|(i, _)| i)?;

    // Closing corner anywhere after the opening one. Either vocabulary is
    // accepted: rich-style frames open heavy and close light.
    let close_rel = text[open..]
        .char_indices()
        .skip(1)
        .find(|(_, c)| *c == '┗' || *c == '└')
        .map(|(i, _)| i)?;
    let close = open + close_rel;

    // Consume through the end of the closing border line when it has
    // arrived; the tail of a still-streaming border line carries no cells
    // and is ignored by later scans.
    let end = match text[close..].find('\n') {
        Some(nl) => close + nl + 1,
        None => text.len(),
    };

    Some((parse_frame(&text[open..end]), open..end))
}

/// Parse one bordered region into a frame.
///
/// The header row is the first line containing a divider character; every
/// later divider line is a data row. Border and separator lines contain no
/// divider and are skipped.
fn parse_frame(region: &str) -> Result<TableFrame> {
    let mut frame: Option<TableFrame> = None;

    for line in region.lines() {
        let div = if line.contains('┃') {
            '┃'
        } else if line.contains('│') {
            '│'
        } else {
            continue;
        };

        let cells = split_cells(line, div);
        match frame {
            None => {
                if cells.is_empty() {
                    return Err(Error::DecodeAnomaly {
                        reason: "table header row parses to zero columns".to_string(),
                    });
                }
                frame = Some(TableFrame::new(cells));
            }
            Some(ref mut f) => {
                f.push_row(cells)?;
            }
        }
    }

    frame.ok_or_else(|| Error::DecodeAnomaly {
        reason: "table frame contains no divider lines".to_string(),
    })
}

/// Split a divider line into trimmed cells, dropping the text outside the
/// outer borders
fn split_cells(line: &str, div: char) -> Vec<String> {
    let parts: Vec<&str> = line.split(div).collect();
    if parts.len() < 3 {
        return Vec::new();
    }
    parts[1..parts.len() - 1]
        .iter()
        .map(|s| s.trim().to_string())
        .collect()
}
