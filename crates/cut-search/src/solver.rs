//! Run controller: validates a problem, runs one strategy under a deadline
//! and solution cap, and collects the found paths with run statistics.

use std::time::Duration;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::context::{CancelToken, RunContext, RunStats};
use crate::error::{SearchError, SearchResult};
use crate::grid::Grid;
use crate::heuristic::Heuristic;
use crate::node::Path;
use crate::{astar, bfs, dfs, ida_star};

/// Search strategy selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Bfs,
    DfsRecursive,
    DfsIterative,
    IdaStar,
    AStar,
}

impl Strategy {
    pub const ALL: [Strategy; 5] = [
        Strategy::Bfs,
        Strategy::DfsRecursive,
        Strategy::DfsIterative,
        Strategy::IdaStar,
        Strategy::AStar,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::Bfs => "BFS",
            Strategy::DfsRecursive => "DFS (recursive)",
            Strategy::DfsIterative => "DFS (iterative)",
            Strategy::IdaStar => "IDA*",
            Strategy::AStar => "A*",
        }
    }

    /// Informed strategies need a heuristic
    pub fn is_informed(self) -> bool {
        matches!(self, Strategy::IdaStar | Strategy::AStar)
    }
}

/// Configuration for one run
#[derive(Debug, Clone)]
pub struct SolverConfig {
    pub strategy: Strategy,
    /// Ignored by uninformed strategies
    pub heuristic: Option<Heuristic>,
    /// Stop after this many solutions
    pub max_solutions: usize,
    /// Wall-clock budget; `None` runs to exhaustion
    pub timeout: Option<Duration>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Bfs,
            heuristic: None,
            max_solutions: usize::MAX,
            timeout: Some(Duration::from_secs(15)),
        }
    }
}

impl SolverConfig {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }

    pub fn with_heuristic(mut self, heuristic: Heuristic) -> Self {
        self.heuristic = Some(heuristic);
        self
    }

    pub fn with_max_solutions(mut self, max_solutions: usize) -> Self {
        self.max_solutions = max_solutions;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// A source/destination pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    pub source: Grid,
    pub destination: Grid,
}

impl Problem {
    pub fn new(source: Grid, destination: Grid) -> Self {
        Self {
            source,
            destination,
        }
    }

    /// Build from raw rows, validating both grids
    pub fn from_rows<S, D>(
        source: impl IntoIterator<Item = S>,
        destination: impl IntoIterator<Item = D>,
    ) -> SearchResult<Self>
    where
        S: Into<String>,
        D: Into<String>,
    {
        let source = Grid::new(source).map_err(|source| SearchError::InvalidGrid {
            which: "source",
            source,
        })?;
        let destination = Grid::new(destination).map_err(|source| SearchError::InvalidGrid {
            which: "destination",
            source,
        })?;
        Ok(Self::new(source, destination))
    }

    /// Cuts never grow a grid, so the source must cover the destination
    pub fn is_reachable(&self) -> bool {
        self.source.covers(&self.destination)
    }
}

/// Result of one strategy invocation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolverResult {
    pub strategy: Strategy,
    pub solutions: Vec<Path>,
    pub stats: RunStats,
}

impl SolverResult {
    /// Cheapest solution found, if any
    pub fn best(&self) -> Option<&Path> {
        self.solutions
            .iter()
            .min_by(|a, b| a.cost().total_cmp(&b.cost()))
    }
}

/// Run the configured strategy to completion, deadline or cap
pub fn solve(problem: &Problem, config: &SolverConfig) -> SearchResult<SolverResult> {
    run(problem, config, CancelToken::new(), None)
}

/// Like [`solve`], handing each solution to `on_solution` as it is found
/// and stopping early if `cancel` fires
pub fn solve_with(
    problem: &Problem,
    config: &SolverConfig,
    cancel: CancelToken,
    mut on_solution: impl FnMut(&Path),
) -> SearchResult<SolverResult> {
    run(problem, config, cancel, Some(&mut on_solution))
}

/// Run every strategy in turn with fresh counters.
///
/// Informed strategies use `config.heuristic`, falling back to
/// [`Heuristic::Admissible`].
pub fn solve_all(problem: &Problem, config: &SolverConfig) -> SearchResult<Vec<SolverResult>> {
    let heuristic = config.heuristic.unwrap_or(Heuristic::Admissible);
    Strategy::ALL
        .iter()
        .map(|&strategy| {
            let config = SolverConfig {
                strategy,
                heuristic: Some(heuristic),
                ..config.clone()
            };
            run(problem, &config, CancelToken::new(), None)
        })
        .collect()
}

fn run<'a>(
    problem: &'a Problem,
    config: &SolverConfig,
    cancel: CancelToken,
    on_solution: Option<&'a mut dyn FnMut(&Path)>,
) -> SearchResult<SolverResult> {
    let strategy = config.strategy;
    let heuristic = if strategy.is_informed() {
        Some(config.heuristic.ok_or(SearchError::HeuristicRequired(strategy))?)
    } else {
        None
    };

    let mut ctx = RunContext::new(
        &problem.destination,
        heuristic,
        config.max_solutions,
        config.timeout,
    )
    .with_cancel(cancel);
    if let Some(callback) = on_solution {
        ctx = ctx.with_callback(callback);
    }

    info!(
        "{}: {}x{} -> {}x{}{}",
        strategy.name(),
        problem.source.row_count(),
        problem.source.col_count(),
        problem.destination.row_count(),
        problem.destination.col_count(),
        heuristic.map_or(String::new(), |h| format!(" ({} heuristic)", h.name())),
    );

    if !problem.is_reachable() {
        info!("{}: destination larger than source, nothing to search", strategy.name());
    } else {
        match strategy {
            Strategy::Bfs => bfs::search(&problem.source, &mut ctx),
            Strategy::DfsRecursive => dfs::search_recursive(&problem.source, &mut ctx),
            Strategy::DfsIterative => dfs::search_iterative(&problem.source, &mut ctx),
            Strategy::IdaStar => ida_star::search(&problem.source, &mut ctx),
            Strategy::AStar => astar::search(&problem.source, &mut ctx),
        }
    }

    let (solutions, stats) = ctx.finish();
    if stats.timed_out {
        warn!(
            "{}: stopped early after {} ms with {} solution(s)",
            strategy.name(),
            stats.elapsed_ms,
            stats.solutions_found
        );
    }
    info!(
        "{}: {} solution(s), {} expansions, peak frontier {}, {} ms",
        strategy.name(),
        stats.solutions_found,
        stats.expanded_node_count,
        stats.peak_frontier_size,
        stats.elapsed_ms
    );

    Ok(SolverResult {
        strategy,
        solutions,
        stats,
    })
}
