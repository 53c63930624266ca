//! Estimators of the remaining cut cost to the destination.
//!
//! Every heuristic returns `0.0` exactly at the destination and
//! `f64::INFINITY` when the destination can no longer be reached. Cuts only
//! shrink a grid, so a state smaller than the destination on either axis,
//! or of equal size but different content, is a dead end.

use serde::{Deserialize, Serialize};

use crate::grid::Grid;

/// Positive stand-in for "not there yet" when no real guidance is wanted
pub const TRIVIAL_ESTIMATE: f64 = 1e-9;

/// Smallest estimate the non-admissible heuristic returns off-target
pub const NON_ADMISSIBLE_FLOOR: f64 = 0.5;

/// Heuristic selector for informed strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Heuristic {
    /// No guidance: zero at the destination, an infinitesimal elsewhere
    Trivial,
    /// Lower bound on the remaining cost
    Admissible,
    /// Cheap surplus count that may overstate the remaining cost
    NonAdmissible,
}

impl Heuristic {
    pub const ALL: [Heuristic; 3] = [
        Heuristic::Trivial,
        Heuristic::Admissible,
        Heuristic::NonAdmissible,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Heuristic::Trivial => "trivial",
            Heuristic::Admissible => "admissible",
            Heuristic::NonAdmissible => "non-admissible",
        }
    }

    /// Estimate the cost of turning `state` into `destination`
    pub fn estimate(self, state: &Grid, destination: &Grid) -> f64 {
        match self {
            Heuristic::Trivial => trivial(state, destination),
            Heuristic::Admissible => admissible(state, destination),
            Heuristic::NonAdmissible => non_admissible(state, destination),
        }
    }

    /// Estimator closure bound to a destination
    pub fn bind(self, destination: &Grid) -> impl Fn(&Grid) -> f64 + '_ {
        move |state: &Grid| self.estimate(state, destination)
    }
}

/// Row and column surplus of `state` over `destination`, or `None` when the
/// destination is unreachable from `state`.
fn surplus(state: &Grid, destination: &Grid) -> Option<(usize, usize)> {
    if !state.covers(destination) {
        return None;
    }
    let rows = state.row_count() - destination.row_count();
    let cols = state.col_count() - destination.col_count();
    if rows == 0 && cols == 0 && state != destination {
        return None;
    }
    Some((rows, cols))
}

fn trivial(state: &Grid, destination: &Grid) -> f64 {
    if state == destination {
        0.0
    } else {
        TRIVIAL_ESTIMATE
    }
}

fn admissible(state: &Grid, destination: &Grid) -> f64 {
    let Some((rows, cols)) = surplus(state, destination) else {
        return f64::INFINITY;
    };
    if rows == 0 && cols == 0 {
        return 0.0;
    }

    // Removing `rows` rows costs at least width/rows, and width never drops
    // below the destination's. Any column cut costs at least 1.
    let mut estimate = 0.0;
    if rows > 0 {
        estimate += destination.col_count() as f64 / rows as f64;
    }
    if cols > 0 {
        estimate += 1.0;
    }
    estimate
}

fn non_admissible(state: &Grid, destination: &Grid) -> f64 {
    let Some((rows, cols)) = surplus(state, destination) else {
        return f64::INFINITY;
    };
    if rows == 0 && cols == 0 {
        return 0.0;
    }
    ((rows + cols) as f64).max(NON_ADMISSIBLE_FLOOR)
}
