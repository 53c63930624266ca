//! State-space search for cut sequences between character grids.
//!
//! A state is a rectangular grid. Each transition removes a contiguous run
//! of rows or columns at a cost. This crate searches for sequences of cuts
//! that turn a source grid into a destination grid, using one of five
//! strategies: BFS, recursive DFS, iterative DFS, IDA* and A*.

pub mod astar;
pub mod bfs;
pub mod context;
pub mod cuts;
pub mod dfs;
pub mod error;
pub mod grid;
pub mod heuristic;
pub mod ida_star;
pub mod node;
pub mod solver;

// Re-export main types
pub use context::{CancelToken, RunContext, RunStats};
pub use cuts::{apply_cut, enumerate_cuts, neighbours, Axis, CutOp};
pub use error::{GridError, SearchError, SearchResult};
pub use grid::{dimensions, parse_pair, Grid};
pub use heuristic::Heuristic;
pub use node::{Node, Path};
pub use solver::{solve, solve_all, solve_with, Problem, SolverConfig, SolverResult, Strategy};
