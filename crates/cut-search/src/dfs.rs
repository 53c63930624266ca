//! Depth-first search, in recursive and explicit-stack forms.
//!
//! Both visit children in generation order and explore every branch until
//! the solution cap is hit, so they discover the same solutions in the same
//! order. Recursion depth is bounded by `rows + cols` of the source.

use crate::context::RunContext;
use crate::grid::Grid;
use crate::node::Path;

/// Recursive depth-first search
pub fn search_recursive(source: &Grid, ctx: &mut RunContext<'_>) {
    let path = Path::new(ctx.root(source));
    visit(&path, ctx);
}

fn visit(path: &Path, ctx: &mut RunContext<'_>) {
    if ctx.should_stop() {
        return;
    }
    ctx.observe_frontier(path.len());

    let node = path.last();
    if ctx.is_goal(node) {
        ctx.record(path.clone());
        return;
    }
    if !node.state.covers(ctx.destination()) {
        return;
    }

    for child in ctx.expand(node) {
        if path.contains(&child) {
            continue;
        }
        visit(&path.extended(child), ctx);
        if ctx.should_stop() {
            return;
        }
    }
}

/// Depth-first search with an explicit stack of paths
pub fn search_iterative(source: &Grid, ctx: &mut RunContext<'_>) {
    let mut stack: Vec<Path> = vec![Path::new(ctx.root(source))];
    ctx.observe_frontier(stack.len());

    while let Some(path) = stack.pop() {
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

        // Reversed so the first child is popped first.
        let children = ctx.expand(node);
        for child in children.into_iter().rev() {
            if !path.contains(&child) {
                stack.push(path.extended(child));
            }
        }
        ctx.observe_frontier(stack.len());
    }
}
