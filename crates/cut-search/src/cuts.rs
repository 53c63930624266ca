//! Cut generation: the transition model of the search.
//!
//! A cut removes a contiguous run of rows or columns. Every legal cut on a
//! grid yields one child state and an incremental cost.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::grid::Grid;
use crate::node::Node;

/// Which axis a cut removes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Rows,
    Columns,
}

impl Axis {
    /// Length of this axis on `grid`
    pub fn len_of(self, grid: &Grid) -> usize {
        match self {
            Axis::Rows => grid.row_count(),
            Axis::Columns => grid.col_count(),
        }
    }

    fn label(self) -> &'static str {
        match self {
            Axis::Rows => "rows",
            Axis::Columns => "columns",
        }
    }
}

/// A closed index range `[lo, hi]` naming the rows or columns to remove
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CutOp {
    pub lo: usize,
    pub hi: usize,
}

impl CutOp {
    pub fn new(lo: usize, hi: usize) -> Self {
        assert!(lo <= hi, "cut range [{lo}, {hi}] is inverted");
        Self { lo, hi }
    }

    /// Number of removed indices
    pub fn width(&self) -> usize {
        self.hi - self.lo + 1
    }

    pub fn contains(&self, index: usize) -> bool {
        (self.lo..=self.hi).contains(&index)
    }

    /// Indices that survive the cut on an axis of length `len`, in order
    pub fn complement(&self, len: usize) -> impl Iterator<Item = usize> + '_ {
        (0..len).filter(move |&i| !self.contains(i))
    }

    /// Human-readable provenance label, e.g. `Eliminated rows: 2, 3`
    pub fn describe(&self, axis: Axis) -> String {
        let indices: SmallVec<[String; 8]> = (self.lo..=self.hi).map(|i| i.to_string()).collect();
        format!("Eliminated {}: {}", axis.label(), indices.join(", "))
    }
}

impl fmt::Display for CutOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lo, self.hi)
    }
}

/// All legal cuts on an axis of length `n`.
///
/// Every contiguous range except the full axis, ordered by increasing `lo`
/// then increasing `hi`. Yields `n(n+1)/2 - 1` ranges.
pub fn enumerate_cuts(n: usize) -> Vec<CutOp> {
    let mut cuts = Vec::with_capacity((n * (n + 1) / 2).saturating_sub(1));
    for lo in 0..n {
        for hi in lo..n {
            if hi - lo + 1 < n {
                cuts.push(CutOp::new(lo, hi));
            }
        }
    }
    cuts
}

/// Apply `cut` to `grid` along `axis`, returning the child grid and the
/// structural cost of the cut.
///
/// Panics if the cut is out of range or would remove the whole axis.
pub fn apply_cut(grid: &Grid, axis: Axis, cut: CutOp) -> (Grid, f64) {
    let len = axis.len_of(grid);
    assert!(cut.hi < len, "cut {cut} out of range for axis of length {len}");
    assert!(cut.width() < len, "cut {cut} would remove every {}", axis.label());

    match axis {
        Axis::Rows => {
            let rows: Vec<String> = cut
                .complement(len)
                .map(|i| grid.rows()[i].clone())
                .collect();
            let cost = grid.col_count() as f64 / cut.width() as f64;
            (Grid::from_valid_rows(rows, grid.col_count()), cost)
        }
        Axis::Columns => {
            let cells = grid.cells();
            let rows: Vec<String> = cells
                .iter()
                .map(|row| cut.complement(len).map(|c| row[c]).collect())
                .collect();
            let breaks = adjacency_breaks(&cells, cut);
            let cost = 1.0 + breaks as f64 / cut.width() as f64;
            (Grid::from_valid_rows(rows, len - cut.width()), cost)
        }
    }
}

/// Count content separated by a column cut.
///
/// Per row, one break when the cells left and right of the cut (which
/// become neighbours) differ. Within the cut, one break for every
/// vertically adjacent pair of unequal cells.
fn adjacency_breaks(cells: &[Vec<char>], cut: CutOp) -> usize {
    let width = cells.first().map_or(0, Vec::len);
    let mut breaks = 0;

    if cut.lo > 0 && cut.hi + 1 < width {
        breaks += cells
            .iter()
            .filter(|row| row[cut.lo - 1] != row[cut.hi + 1])
            .count();
    }

    for col in cut.lo..=cut.hi {
        breaks += cells
            .windows(2)
            .filter(|pair| pair[0][col] != pair[1][col])
            .count();
    }

    breaks
}

/// Children of `node`: every column cut in order, then every row cut in order.
///
/// Each child's `g` is the parent's `g` plus the cut cost. When `estimate`
/// is given the child also carries `h = estimate(child_grid)`.
pub fn neighbours<F>(node: &Node, estimate: Option<F>) -> Vec<Node>
where
    F: Fn(&Grid) -> f64,
{
    let state = &node.state;
    let mut children = Vec::new();

    for axis in [Axis::Columns, Axis::Rows] {
        for cut in enumerate_cuts(axis.len_of(state)) {
            let (child, cost) = apply_cut(state, axis, cut);
            let h = estimate.as_ref().map(|f| f(&child));
            children.push(Node::child(child, node.g + cost, h, cut.describe(axis)));
        }
    }

    children
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&str]) -> Grid {
        Grid::new(rows.iter().copied()).unwrap()
    }

    #[test]
    fn test_enumerate_cuts_count_and_order() {
        for n in 1..8 {
            let cuts = enumerate_cuts(n);
            assert_eq!(cuts.len(), n * (n + 1) / 2 - 1);
            assert!(cuts.iter().all(|c| c.lo <= c.hi && c.width() < n));
        }

        let cuts = enumerate_cuts(3);
        let pairs: Vec<(usize, usize)> = cuts.iter().map(|c| (c.lo, c.hi)).collect();
        assert_eq!(pairs, vec![(0, 0), (0, 1), (1, 1), (1, 2), (2, 2)]);
    }

    #[test]
    fn test_complement_partitions_axis() {
        for n in 2..7 {
            for cut in enumerate_cuts(n) {
                let mut seen = vec![0u8; n];
                for i in cut.complement(n) {
                    seen[i] += 1;
                }
                for i in cut.lo..=cut.hi {
                    seen[i] += 1;
                }
                assert!(seen.iter().all(|&count| count == 1), "cut {cut} on {n}");
            }
        }
    }

    #[test]
    fn test_column_cut_shape() {
        let g = grid(&["abcd", "efgh", "ijkl"]);
        let (child, _) = apply_cut(&g, Axis::Columns, CutOp::new(1, 2));
        assert_eq!(child, grid(&["ad", "eh", "il"]));
        assert_eq!(child.dimensions(), (3, 2));
    }

    #[test]
    fn test_row_cut_shape_and_cost() {
        let g = grid(&["abcd", "efgh", "ijkl"]);
        let (child, cost) = apply_cut(&g, Axis::Rows, CutOp::new(0, 1));
        assert_eq!(child, grid(&["ijkl"]));
        assert_eq!(cost, 2.0);

        let (_, single) = apply_cut(&g, Axis::Rows, CutOp::new(2, 2));
        assert_eq!(single, 4.0);
    }

    #[test]
    fn test_edge_column_of_identical_values_costs_one() {
        let g = grid(&["ab", "ab"]);
        let (child, cost) = apply_cut(&g, Axis::Columns, CutOp::new(1, 1));
        assert_eq!(child, grid(&["a", "a"]));
        assert_eq!(cost, 1.0);
    }

    #[test]
    fn test_column_cost_counts_breaks() {
        // Seam a|c differs in both rows, cut column is 'b' over 'x'.
        let g = grid(&["abc", "axc"]);
        let (_, cost) = apply_cut(&g, Axis::Columns, CutOp::new(1, 1));
        assert_eq!(cost, 1.0 + 3.0);

        // Seam a|a matches, cut block is uniform.
        let h = grid(&["abba", "abba"]);
        let (_, cheap) = apply_cut(&h, Axis::Columns, CutOp::new(1, 2));
        assert_eq!(cheap, 1.0);
    }

    #[test]
    fn test_apply_cut_is_repeatable() {
        let g = grid(&["abc", "def", "ghi"]);
        let cut = CutOp::new(0, 1);
        assert_eq!(
            apply_cut(&g, Axis::Columns, cut),
            apply_cut(&g, Axis::Columns, cut)
        );
    }

    #[test]
    #[should_panic(expected = "would remove every")]
    fn test_full_cut_panics() {
        let g = grid(&["ab", "cd"]);
        apply_cut(&g, Axis::Rows, CutOp::new(0, 1));
    }

    #[test]
    fn test_describe() {
        assert_eq!(
            CutOp::new(1, 3).describe(Axis::Rows),
            "Eliminated rows: 1, 2, 3"
        );
        assert_eq!(
            CutOp::new(0, 0).describe(Axis::Columns),
            "Eliminated columns: 0"
        );
    }

    #[test]
    fn test_neighbours_order_and_costs() {
        let root = Node::root(grid(&["ab", "cd"]));
        let children = neighbours(&root, None::<fn(&Grid) -> f64>);

        // Two column cuts, then two row cuts.
        assert_eq!(children.len(), 4);
        assert_eq!(children[0].via.as_deref(), Some("Eliminated columns: 0"));
        assert_eq!(children[1].via.as_deref(), Some("Eliminated columns: 1"));
        assert_eq!(children[2].via.as_deref(), Some("Eliminated rows: 0"));
        assert_eq!(children[3].via.as_deref(), Some("Eliminated rows: 1"));
        assert!(children.iter().all(|n| n.h.is_none()));
        assert_eq!(children[0].g, 2.0);
        assert_eq!(children[2].g, 2.0);
    }

    #[test]
    fn test_neighbours_attach_heuristic() {
        let root = Node::root(grid(&["ab", "cd"]));
        let children = neighbours(&root, Some(|g: &Grid| g.col_count() as f64));
        assert_eq!(children[0].h, Some(1.0));
        assert_eq!(children[3].h, Some(2.0));
        assert_eq!(children[3].f(), children[3].g + 2.0);
    }
}
