//! Breadth-first search over cut sequences.
//!
//! Paths leave the queue in non-decreasing cut count, so the first solution
//! uses the fewest cuts (not necessarily the lowest cost).

use std::collections::VecDeque;

use crate::context::RunContext;
use crate::grid::Grid;
use crate::node::Path;

pub fn search(source: &Grid, ctx: &mut RunContext<'_>) {
    let mut queue: VecDeque<Path> = VecDeque::new();
    queue.push_back(Path::new(ctx.root(source)));
    ctx.observe_frontier(queue.len());

    while let Some(path) = queue.pop_front() {
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
            if !path.contains(&child) {
                queue.push_back(path.extended(child));
            }
        }
        ctx.observe_frontier(queue.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&str]) -> Grid {
        Grid::new(rows.iter().copied()).unwrap()
    }

    #[test]
    fn test_finds_single_cut() {
        let dest = grid(&["a", "a"]);
        let mut ctx = RunContext::new(&dest, None, 1, None);
        search(&grid(&["ab", "ab"]), &mut ctx);

        let (paths, stats) = ctx.finish();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].steps(), vec!["Eliminated columns: 1"]);
        assert_eq!(paths[0].cost(), 1.0);
        assert!(!stats.timed_out);
    }

    #[test]
    fn test_solutions_in_cut_count_order() {
        let dest = grid(&["a"]);
        let mut ctx = RunContext::new(&dest, None, usize::MAX, None);
        search(&grid(&["ab", "cd"]), &mut ctx);

        let (paths, _) = ctx.finish();
        assert!(!paths.is_empty());
        let counts: Vec<usize> = paths.iter().map(Path::cut_count).collect();
        let mut sorted = counts.clone();
        sorted.sort_unstable();
        assert_eq!(counts, sorted);
        assert_eq!(counts[0], 2);
    }
}
