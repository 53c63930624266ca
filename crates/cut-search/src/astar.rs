//! A* over cut sequences.
//!
//! Paths are popped in ascending `f` of their last node, ties broken by
//! insertion order. The search does not stop at the first destination: it
//! keeps popping until the frontier is empty or the solution cap is hit.
//! With an admissible heuristic the first solution is least-cost.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::context::RunContext;
use crate::grid::Grid;
use crate::node::Path;

/// Ordering key: lowest `f` first, then earliest insertion
#[derive(Debug, Clone, Copy)]
struct FrontierKey {
    f: f64,
    seq: u64,
}

impl PartialEq for FrontierKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierKey {}

impl PartialOrd for FrontierKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f
            .total_cmp(&other.f)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// `BinaryHeap` is a max-heap, so the key is wrapped in `Reverse`
struct FrontierEntry {
    key: Reverse<FrontierKey>,
    path: Path,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

/// Priority frontier with stable tie-breaking
#[derive(Default)]
struct Frontier {
    heap: BinaryHeap<FrontierEntry>,
    next_seq: u64,
}

impl Frontier {
    fn push(&mut self, path: Path) {
        let key = FrontierKey {
            f: path.last().f(),
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.heap.push(FrontierEntry {
            key: Reverse(key),
            path,
        });
    }

    fn pop(&mut self) -> Option<Path> {
        self.heap.pop().map(|entry| entry.path)
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}

pub fn search(source: &Grid, ctx: &mut RunContext<'_>) {
    let mut frontier = Frontier::default();
    frontier.push(Path::new(ctx.root(source)));
    ctx.observe_frontier(frontier.len());

    while let Some(path) = frontier.pop() {
        if ctx.should_stop() {
            return;
        }

        let node = path.last();
        if ctx.is_goal(node) {
            ctx.record(path);
            continue;
        }
        if !node.state.covers(ctx.destination()) {
            continue;
        }

        for child in ctx.expand(node) {
            if child.f().is_finite() && !path.contains(&child) {
                frontier.push(path.extended(child));
            }
        }
        ctx.observe_frontier(frontier.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristic::Heuristic;
    use crate::node::Node;

    fn grid(rows: &[&str]) -> Grid {
        Grid::new(rows.iter().copied()).unwrap()
    }

    #[test]
    fn test_frontier_pops_lowest_f_then_oldest() {
        let mut frontier = Frontier::default();
        let mk = |g: f64, label: &str| {
            Path::new(Node::child(grid(&["a"]), g, None, label.to_string()))
        };
        frontier.push(mk(2.0, "late"));
        frontier.push(mk(1.0, "first"));
        frontier.push(mk(1.0, "second"));

        let order: Vec<String> = std::iter::from_fn(|| frontier.pop())
            .map(|p| p.last().via.clone().unwrap_or_default())
            .collect();
        assert_eq!(order, vec!["first", "second", "late"]);
    }

    #[test]
    fn test_first_solution_is_cheapest() {
        let source = grid(&["abc", "abd", "xyz"]);
        let dest = grid(&["ab"]);
        let mut ctx = RunContext::new(&dest, Some(Heuristic::Admissible), usize::MAX, None);
        search(&source, &mut ctx);
        let (paths, stats) = ctx.finish();

        assert!(paths.len() > 1);
        let best = paths.iter().map(Path::cost).fold(f64::INFINITY, f64::min);
        assert_eq!(paths[0].cost(), best);
        assert!(stats.peak_frontier_size >= 1);
    }

    #[test]
    fn test_respects_solution_cap() {
        let source = grid(&["abc", "abd", "xyz"]);
        let dest = grid(&["ab"]);
        let mut ctx = RunContext::new(&dest, Some(Heuristic::NonAdmissible), 1, None);
        search(&source, &mut ctx);
        assert_eq!(ctx.finish().0.len(), 1);
    }
}
