//! Iterative-deepening A*.
//!
//! Each iteration is a depth-first probe that prunes nodes whose `f`
//! exceeds the current bound. The next bound is the smallest `f` that was
//! pruned. A destination is recorded only when its `f` equals the bound,
//! so each solution is reported in exactly one iteration.

use log::debug;

use crate::context::RunContext;
use crate::grid::Grid;
use crate::node::{Node, Path};

pub fn search(source: &Grid, ctx: &mut RunContext<'_>) {
    let root = Path::new(ctx.root(source));
    let mut bound = root.last().f();
    let mut iteration = 0usize;

    loop {
        iteration += 1;
        debug!("IDA* iteration {iteration}: bound {bound}");

        let next = probe(&root, bound, ctx);
        if next.is_infinite() || ctx.should_stop() {
            break;
        }
        bound = next;
    }
}

/// Returns the smallest pruned `f` below `path`, or infinity if nothing
/// was pruned.
fn probe(path: &Path, bound: f64, ctx: &mut RunContext<'_>) -> f64 {
    if ctx.should_stop() {
        return f64::INFINITY;
    }
    ctx.observe_frontier(path.len());

    let node = path.last();
    let f = node.f();
    if f > bound {
        return f;
    }
    if ctx.is_goal(node) {
        if f == bound {
            ctx.record(path.clone());
        }
        return f64::INFINITY;
    }
    if !node.state.covers(ctx.destination()) {
        return f64::INFINITY;
    }

    let mut children: Vec<Node> = ctx
        .expand(node)
        .into_iter()
        .filter(|child| child.f().is_finite() && !path.contains(child))
        .collect();
    // Stable: equal f keeps generation order.
    children.sort_by(|a, b| a.f().total_cmp(&b.f()));

    let mut min = f64::INFINITY;
    for child in children {
        min = min.min(probe(&path.extended(child), bound, ctx));
        if ctx.should_stop() {
            break;
        }
    }
    min
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristic::Heuristic;

    fn grid(rows: &[&str]) -> Grid {
        Grid::new(rows.iter().copied()).unwrap()
    }

    fn run(source: &Grid, dest: &Grid, heuristic: Heuristic) -> Vec<Path> {
        let mut ctx = RunContext::new(dest, Some(heuristic), usize::MAX, None);
        search(source, &mut ctx);
        ctx.finish().0
    }

    #[test]
    fn test_solutions_in_cost_order() {
        let source = grid(&["abc", "abd", "xyz"]);
        let dest = grid(&["ab"]);
        let paths = run(&source, &dest, Heuristic::Admissible);

        assert!(!paths.is_empty());
        let costs: Vec<f64> = paths.iter().map(Path::cost).collect();
        assert!(costs.windows(2).all(|w| w[0] <= w[1]), "{costs:?}");
    }

    #[test]
    fn test_trivial_heuristic_reaches_same_optimum() {
        let source = grid(&["abc", "abd", "xyz"]);
        let dest = grid(&["ab"]);
        let admissible = run(&source, &dest, Heuristic::Admissible);
        let trivial = run(&source, &dest, Heuristic::Trivial);
        assert_eq!(admissible[0].cost(), trivial[0].cost());
    }

    #[test]
    fn test_source_is_destination() {
        let g = grid(&["ab", "cd"]);
        let mut ctx = RunContext::new(&g, Some(Heuristic::Admissible), usize::MAX, None);
        search(&g, &mut ctx);
        let (paths, stats) = ctx.finish();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].cost(), 0.0);
        assert_eq!(stats.expanded_node_count, 0);
    }
}
