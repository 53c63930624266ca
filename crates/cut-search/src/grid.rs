//! Grid representation: the search state.
//!
//! A grid is an ordered, non-empty sequence of equal-length rows. Grids are
//! immutable once built; every cut produces a new grid.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::GridError;

/// A rectangular character grid
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Grid {
    rows: Vec<String>,
    cols: usize,
}

/// Validate a row sequence and return its `(row_count, col_count)`.
///
/// Column count is measured in `char`s, not bytes.
pub fn dimensions<S: AsRef<str>>(rows: &[S]) -> Result<(usize, usize), GridError> {
    let first = rows.first().ok_or(GridError::Empty)?;
    let cols = first.as_ref().chars().count();
    if cols == 0 {
        return Err(GridError::EmptyRow { row: 0 });
    }
    for (row, line) in rows.iter().enumerate().skip(1) {
        let found = line.as_ref().chars().count();
        if found == 0 {
            return Err(GridError::EmptyRow { row });
        }
        if found != cols {
            return Err(GridError::Ragged {
                row,
                expected: cols,
                found,
            });
        }
    }
    Ok((rows.len(), cols))
}

impl Grid {
    /// Build a grid, failing if the rows are empty or ragged
    pub fn new<S: Into<String>>(rows: impl IntoIterator<Item = S>) -> Result<Self, GridError> {
        let rows: Vec<String> = rows.into_iter().map(Into::into).collect();
        let (_, cols) = dimensions(&rows)?;
        Ok(Self { rows, cols })
    }

    /// Build from rows already known to be rectangular and non-empty.
    ///
    /// Only the cut generator uses this; it guarantees the shape by construction.
    pub(crate) fn from_valid_rows(rows: Vec<String>, cols: usize) -> Self {
        debug_assert!(!rows.is_empty() && cols > 0);
        debug_assert!(rows.iter().all(|r| r.chars().count() == cols));
        Self { rows, cols }
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn col_count(&self) -> usize {
        self.cols
    }

    /// `(row_count, col_count)`
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows.len(), self.cols)
    }

    /// True if this grid is at least as large as `other` along both axes.
    ///
    /// Cuts only ever shrink a grid, so a state failing this against the
    /// destination can never reach it.
    pub fn covers(&self, other: &Grid) -> bool {
        self.row_count() >= other.row_count() && self.col_count() >= other.col_count()
    }

    /// Cells as a row-major matrix of chars
    pub(crate) fn cells(&self) -> Vec<Vec<char>> {
        self.rows.iter().map(|r| r.chars().collect()).collect()
    }
}

impl TryFrom<Vec<String>> for Grid {
    type Error = GridError;

    fn try_from(rows: Vec<String>) -> Result<Self, Self::Error> {
        Grid::new(rows)
    }
}

impl From<Grid> for Vec<String> {
    fn from(grid: Grid) -> Self {
        grid.rows
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            f.write_str(row)?;
        }
        Ok(())
    }
}

/// Parse a source/destination pair from text.
///
/// The source grid comes first, then one or more blank lines, then the
/// destination grid. Trailing whitespace on each line is ignored.
pub fn parse_pair(text: &str) -> Result<(Grid, Grid), GridError> {
    let mut blocks: Vec<Vec<&str>> = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines().map(str::trim_end) {
        if line.is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }

    if blocks.len() != 2 {
        return Err(GridError::BlockCount {
            found: blocks.len(),
        });
    }
    let destination = Grid::new(blocks.pop().unwrap_or_default())?;
    let source = Grid::new(blocks.pop().unwrap_or_default())?;
    Ok((source, destination))
}
