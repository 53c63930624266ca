//! Per-run state shared by every strategy: counters, limits and cancellation.
//!
//! Strategies never poll the clock themselves. They call
//! [`RunContext::should_stop`] at each frontier pop or recursion entry and
//! unwind cleanly when it returns `true`; solutions recorded before that
//! point are kept.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::cuts::neighbours;
use crate::grid::Grid;
use crate::heuristic::Heuristic;
use crate::node::{Node, Path};

/// Cloneable handle for cancelling a run from another thread
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Statistics reported for one strategy invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStats {
    pub solutions_found: usize,
    /// Largest number of paths resident in the frontier at once
    pub peak_frontier_size: usize,
    /// Number of neighbour expansions performed
    pub expanded_node_count: u64,
    /// True if the run was cut off by its deadline or a cancel
    pub timed_out: bool,
    pub elapsed_ms: u64,
}

/// Mutable state of a single run
pub struct RunContext<'a> {
    destination: &'a Grid,
    heuristic: Option<Heuristic>,
    max_solutions: usize,
    started: Instant,
    deadline: Option<Instant>,
    cancel: CancelToken,
    expanded: u64,
    peak_frontier: usize,
    timed_out: bool,
    solutions: Vec<Path>,
    on_solution: Option<&'a mut dyn FnMut(&Path)>,
}

impl<'a> RunContext<'a> {
    /// Fresh counters, with the elapsed-time origin set to now
    pub fn new(
        destination: &'a Grid,
        heuristic: Option<Heuristic>,
        max_solutions: usize,
        timeout: Option<Duration>,
    ) -> Self {
        let started = Instant::now();
        Self {
            destination,
            heuristic,
            max_solutions,
            started,
            deadline: timeout.map(|t| started + t),
            cancel: CancelToken::new(),
            expanded: 0,
            peak_frontier: 0,
            timed_out: false,
            solutions: Vec::new(),
            on_solution: None,
        }
    }

    /// Observe `token` in addition to the deadline
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// Call `callback` with each solution as soon as it is recorded
    pub fn with_callback(mut self, callback: &'a mut dyn FnMut(&Path)) -> Self {
        self.on_solution = Some(callback);
        self
    }

    pub fn destination(&self) -> &'a Grid {
        self.destination
    }

    pub fn heuristic(&self) -> Option<Heuristic> {
        self.heuristic
    }

    /// True if `node` is the destination state
    pub fn is_goal(&self, node: &Node) -> bool {
        node.is_state(self.destination)
    }

    /// Source node for this run, with `h` attached when a heuristic is set
    pub fn root(&self, source: &Grid) -> Node {
        let node = Node::root(source.clone());
        match self.heuristic {
            Some(h) => node.with_h(h.estimate(source, self.destination)),
            None => node,
        }
    }

    /// Children of `node`, counted as one expansion
    pub fn expand(&mut self, node: &Node) -> Vec<Node> {
        self.expanded += 1;
        let destination = self.destination;
        let children = neighbours(node, self.heuristic.map(|h| h.bind(destination)));
        trace!(
            "expansion {}: {}x{} state, {} children",
            self.expanded,
            node.state.row_count(),
            node.state.col_count(),
            children.len()
        );
        children
    }

    /// Record a frontier size; keeps the maximum seen
    pub fn observe_frontier(&mut self, size: usize) {
        self.peak_frontier = self.peak_frontier.max(size);
    }

    /// Record a solution path and hand it to the callback
    pub fn record(&mut self, path: Path) {
        debug!(
            "solution {} found: {} cuts, cost {}",
            self.solutions.len() + 1,
            path.cut_count(),
            path.cost()
        );
        if let Some(callback) = self.on_solution.as_deref_mut() {
            callback(&path);
        }
        self.solutions.push(path);
    }

    /// True once the solution cap is reached
    pub fn is_saturated(&self) -> bool {
        self.solutions.len() >= self.max_solutions
    }

    /// Cooperative check point.
    ///
    /// Returns `true` when the run must stop: the solution cap is reached,
    /// the deadline has passed, or the cancel token fired. The latter two
    /// mark the run as timed out.
    pub fn should_stop(&mut self) -> bool {
        if self.timed_out || self.is_saturated() {
            return true;
        }
        let expired = self.deadline.is_some_and(|d| Instant::now() > d);
        if expired || self.cancel.is_cancelled() {
            self.timed_out = true;
        }
        self.timed_out
    }

    pub fn timed_out(&self) -> bool {
        self.timed_out
    }

    pub fn solutions(&self) -> &[Path] {
        &self.solutions
    }

    /// Consume the context, returning found paths and final statistics
    pub fn finish(self) -> (Vec<Path>, RunStats) {
        let stats = RunStats {
            solutions_found: self.solutions.len(),
            peak_frontier_size: self.peak_frontier,
            expanded_node_count: self.expanded,
            timed_out: self.timed_out,
            elapsed_ms: self.started.elapsed().as_millis() as u64,
        };
        (self.solutions, stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&str]) -> Grid {
        Grid::new(rows.iter().copied()).unwrap()
    }

    #[test]
    fn test_expand_counts_once_per_call() {
        let dest = grid(&["a"]);
        let mut ctx = RunContext::new(&dest, None, usize::MAX, None);
        let root = ctx.root(&grid(&["ab", "cd"]));
        let children = ctx.expand(&root);
        assert_eq!(children.len(), 4);
        ctx.expand(&children[0]);

        let (_, stats) = ctx.finish();
        assert_eq!(stats.expanded_node_count, 2);
    }

    #[test]
    fn test_root_carries_heuristic() {
        let dest = grid(&["a"]);
        let ctx = RunContext::new(&dest, Some(Heuristic::NonAdmissible), usize::MAX, None);
        let root = ctx.root(&grid(&["ab"]));
        assert_eq!(root.h, Some(1.0));
        assert_eq!(root.g, 0.0);
    }

    #[test]
    fn test_solution_cap_stops_run() {
        let dest = grid(&["a"]);
        let mut ctx = RunContext::new(&dest, None, 1, None);
        assert!(!ctx.should_stop());
        ctx.record(Path::new(Node::root(dest.clone())));
        assert!(ctx.should_stop());
        assert!(!ctx.timed_out());
    }

    #[test]
    fn test_cancel_marks_timed_out() {
        let dest = grid(&["a"]);
        let token = CancelToken::new();
        let mut ctx = RunContext::new(&dest, None, usize::MAX, None).with_cancel(token.clone());
        assert!(!ctx.should_stop());
        token.cancel();
        assert!(ctx.should_stop());
        assert!(ctx.finish().1.timed_out);
    }

    #[test]
    fn test_zero_timeout_expires() {
        let dest = grid(&["a"]);
        let mut ctx = RunContext::new(&dest, None, usize::MAX, Some(Duration::ZERO));
        std::thread::sleep(Duration::from_millis(2));
        assert!(ctx.should_stop());
        assert!(ctx.timed_out());
    }

    #[test]
    fn test_callback_sees_each_solution() {
        let dest = grid(&["a"]);
        let mut seen = Vec::new();
        let mut callback = |p: &Path| seen.push(p.cost());
        {
            let mut ctx =
                RunContext::new(&dest, None, usize::MAX, None).with_callback(&mut callback);
            ctx.record(Path::new(Node::root(dest.clone())));
            ctx.observe_frontier(3);
            ctx.observe_frontier(1);
            let (paths, stats) = ctx.finish();
            assert_eq!(paths.len(), 1);
            assert_eq!(stats.peak_frontier_size, 3);
        }
        assert_eq!(seen, vec![0.0]);
    }
}
