//! Table Frame Model
//!
//! A parsed box-drawn table from the child's output: ordered column
//! headers plus data rows, every row aligned 1:1 with the headers.
//! Row order is display order.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A parsed table: headers plus rows, cell-aligned with the headers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TableFrame {
    /// Ordered column headers
    pub headers: Vec<String>,
    /// Ordered data rows; each row has exactly `headers.len()` cells
    pub rows: Vec<Vec<String>>,
}

impl TableFrame {
    /// Create an empty frame with the given headers
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Append a data row, enforcing the cell/header alignment invariant
    pub fn push_row(&mut self, row: Vec<String>) -> Result<()> {
        if row.len() != self.headers.len() {
            return Err(Error::DecodeAnomaly {
                reason: format!(
                    "row has {} cells, expected {}",
                    row.len(),
                    self.headers.len()
                ),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Number of data rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Synthesize the local season picklist from a bare season count.
    ///
    /// The child only prints a count when a series has a season tier, so
    /// the picklist is built locally: one row per season, 1-based.
    pub fn for_seasons(count: u32) -> Self {
        let mut frame = Self::new(vec!["Index".to_string(), "Season".to_string()]);
        for i in 1..=count {
            // push_row cannot fail here: both cells are always present
            frame
                .rows
                .push(vec![i.to_string(), format!("Stagione {}", i)]);
        }
        frame
    }
}
