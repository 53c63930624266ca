//! Error types.
//!
//! Only pre-flight failures are errors. Timeouts and unreachable
//! destinations are ordinary run outcomes reported through
//! [`crate::context::RunStats`].

use thiserror::Error;

use crate::solver::Strategy;

/// Why a row sequence is not a valid grid
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("grid has no rows")]
    Empty,

    #[error("row {row} is empty")]
    EmptyRow { row: usize },

    #[error("row {row} has {found} columns, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("expected a source and a destination grid separated by a blank line, found {found} block(s)")]
    BlockCount { found: usize },
}

/// Errors raised before a search starts
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("invalid {which} grid: {source}")]
    InvalidGrid {
        which: &'static str,
        source: GridError,
    },

    #[error("strategy {} requires a heuristic", .0.name())]
    HeuristicRequired(Strategy),
}

/// Result type for search operations
pub type SearchResult<T> = Result<T, SearchError>;
