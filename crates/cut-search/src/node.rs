//! Search nodes and simple paths.
//!
//! A [`Node`] is a grid annotated with its accumulated cost, optional
//! heuristic estimate and the cut that produced it. Node identity is the
//! grid alone.
//!
//! A [`Path`] is a persistent linked list: extending a path shares the
//! prefix through `Rc` and never touches the original, so a frontier can
//! hold many divergent paths over a common prefix.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use serde::Serialize;
use smallvec::SmallVec;

use crate::grid::Grid;

/// A grid annotated with search bookkeeping
#[derive(Debug, Clone, Serialize)]
pub struct Node {
    pub state: Grid,
    /// Cost accumulated from the source
    pub g: f64,
    /// Estimated remaining cost, when a heuristic is in use
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h: Option<f64>,
    /// Description of the cut that produced this node; `None` for the source
    #[serde(skip_serializing_if = "Option::is_none")]
    pub via: Option<String>,
    #[serde(skip)]
    fingerprint: u64,
}

impl Node {
    /// The source node: zero cost, no provenance
    pub fn root(state: Grid) -> Self {
        Self::build(state, 0.0, None, None)
    }

    pub fn child(state: Grid, g: f64, h: Option<f64>, via: String) -> Self {
        Self::build(state, g, h, Some(via))
    }

    fn build(state: Grid, g: f64, h: Option<f64>, via: Option<String>) -> Self {
        let mut hasher = DefaultHasher::new();
        state.hash(&mut hasher);
        Self {
            state,
            g,
            h,
            via,
            fingerprint: hasher.finish(),
        }
    }

    /// `g + h`, or `g` when no estimate is attached
    pub fn f(&self) -> f64 {
        self.g + self.h.unwrap_or(0.0)
    }

    /// Attach a heuristic estimate
    pub fn with_h(mut self, h: f64) -> Self {
        self.h = Some(h);
        self
    }

    /// Hash of the grid, used to reject most non-matches cheaply
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    /// True if this node's state is `grid`
    pub fn is_state(&self, grid: &Grid) -> bool {
        self.state == *grid
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.fingerprint == other.fingerprint && self.state == other.state
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.fingerprint.hash(state);
    }
}

#[derive(Debug)]
struct Link {
    node: Node,
    parent: Option<Rc<Link>>,
}

/// A simple path of nodes starting at the source
#[derive(Debug, Clone)]
pub struct Path {
    tail: Rc<Link>,
    len: usize,
}

impl Path {
    /// A single-node path
    pub fn new(source: Node) -> Self {
        Self {
            tail: Rc::new(Link {
                node: source,
                parent: None,
            }),
            len: 1,
        }
    }

    /// A new path equal to this one plus `node`; `self` is unchanged
    pub fn extended(&self, node: Node) -> Self {
        Self {
            tail: Rc::new(Link {
                node,
                parent: Some(Rc::clone(&self.tail)),
            }),
            len: self.len + 1,
        }
    }

    pub fn last(&self) -> &Node {
        &self.tail.node
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Paths always hold at least the source
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Number of cuts along the path
    pub fn cut_count(&self) -> usize {
        self.len - 1
    }

    /// Accumulated cost at the end of the path
    pub fn cost(&self) -> f64 {
        self.last().g
    }

    /// True if some node on the path has the same state as `node`
    pub fn contains(&self, node: &Node) -> bool {
        let mut link = Some(&self.tail);
        while let Some(l) = link {
            if l.node == *node {
                return true;
            }
            link = l.parent.as_ref();
        }
        false
    }

    /// Nodes from source to tail
    pub fn nodes(&self) -> SmallVec<[&Node; 16]> {
        let mut nodes = SmallVec::with_capacity(self.len);
        let mut link = Some(&self.tail);
        while let Some(l) = link {
            nodes.push(&l.node);
            link = l.parent.as_ref();
        }
        nodes.reverse();
        nodes
    }

    /// Provenance labels in order, one per cut
    pub fn steps(&self) -> Vec<&str> {
        self.nodes()
            .into_iter()
            .filter_map(|n| n.via.as_deref())
            .collect()
    }
}

impl Serialize for Path {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.nodes())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, node) in self.nodes().into_iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            if let Some(via) = &node.via {
                writeln!(f, "{via}")?;
            }
            writeln!(f, "{}", node.state)?;
        }
        write!(f, "Cost: {}", self.cost())
    }
}
