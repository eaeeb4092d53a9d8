//! Reachability propagation over execution edges.
//!
//! After every graph mutation the host takes a [`GraphSnapshot`] and asks
//! the [`ReachabilityEngine`] which nodes are reachable from the canvas's
//! starting points. The result is a [`ReachabilityPatch`] (the reachable
//! set plus a per-edge connectivity flag) that the caller applies back
//! onto the store. The engine itself holds nothing but the last revision it
//! processed, so redundant recomputes are a cheap `None`.
//!
//! The propagation itself is a forward BFS:
//!
//! 1. Seed the reachable set with every node flagged as a starting point.
//!    All flagged nodes are seeds; there is no primary path.
//! 2. Expand along execution edges, source → target, with an explicit
//!    visited set. A node already visited is never re-expanded, which is
//!    what terminates the walk in the presence of cycles.
//! 3. Flag every edge whose endpoints both landed in the reachable set.
//!
//! Each recompute is O(V+E); it runs only on mutation events, never per
//! render frame.

use std::collections::VecDeque;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::types::EdgeKind;

/// Immutable reachability input taken from the store at one revision.
#[derive(Clone, Debug)]
pub struct GraphSnapshot {
    /// Store revision at snapshot time; drives the recompute gate.
    pub revision: u64,
    /// Ids of every node flagged as a starting point.
    pub starting_points: Vec<String>,
    /// Every edge's endpoints and kind.
    pub edges: Vec<SnapshotEdge>,
}

/// Edge record inside a [`GraphSnapshot`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SnapshotEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,
}

/// Output of one reachability recompute.
///
/// `reachable` holds every node id transitively activated from some
/// starting point via execution edges; `edge_connectivity` maps every edge
/// id to whether both of its endpoints are in that set. Apply via
/// [`GraphStore::apply_connectivity`](super::GraphStore::apply_connectivity).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReachabilityPatch {
    pub revision: u64,
    pub reachable: FxHashSet<String>,
    pub edge_connectivity: FxHashMap<String, bool>,
}

impl ReachabilityPatch {
    /// Convenience lookup for one node.
    #[must_use]
    pub fn is_reachable(&self, node_id: &str) -> bool {
        self.reachable.contains(node_id)
    }
}

/// Revision-gated wrapper around the pure reachability computation.
///
/// # Examples
///
/// ```rust
/// use flowlattice::graph::{GraphStore, ReachabilityEngine};
/// use flowlattice::node::Node;
/// use flowlattice::types::NodeKind;
///
/// # fn main() -> Result<(), flowlattice::graph::GraphError> {
/// let mut store = GraphStore::new();
/// store.add_node(Node::new("t", NodeKind::Trigger).as_starting_point())?;
///
/// let mut engine = ReachabilityEngine::new();
/// let patch = engine.recompute(&store.snapshot()).expect("first pass computes");
/// assert!(patch.is_reachable("t"));
///
/// // Same revision again: nothing to do.
/// assert!(engine.recompute(&store.snapshot()).is_none());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct ReachabilityEngine {
    last_revision: Option<u64>,
}

impl ReachabilityEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recomputes unless the snapshot revision was already processed.
    ///
    /// Returns `None` when the revision matches the previous call, making
    /// post-mutation recompute hooks safe to call unconditionally.
    pub fn recompute(&mut self, snapshot: &GraphSnapshot) -> Option<ReachabilityPatch> {
        if self.last_revision == Some(snapshot.revision) {
            debug!(revision = snapshot.revision, "reachability already current");
            return None;
        }
        self.last_revision = Some(snapshot.revision);
        Some(Self::compute(snapshot))
    }

    /// The pure computation: forward BFS from all starting points.
    ///
    /// Stateless and deterministic; calling it twice on the same snapshot
    /// yields identical patches.
    #[must_use]
    pub fn compute(snapshot: &GraphSnapshot) -> ReachabilityPatch {
        let mut adjacency: FxHashMap<&str, Vec<&str>> = FxHashMap::default();
        for edge in snapshot.edges.iter().filter(|e| e.kind.is_execution()) {
            adjacency
                .entry(edge.source.as_str())
                .or_default()
                .push(edge.target.as_str());
        }

        let mut reachable: FxHashSet<String> = FxHashSet::default();
        let mut frontier: VecDeque<&str> = VecDeque::new();
        for seed in &snapshot.starting_points {
            if reachable.insert(seed.clone()) {
                frontier.push_back(seed.as_str());
            }
        }

        while let Some(node) = frontier.pop_front() {
            if let Some(successors) = adjacency.get(node) {
                for &next in successors {
                    if !reachable.contains(next) {
                        reachable.insert(next.to_string());
                        frontier.push_back(next);
                    }
                }
            }
        }

        let edge_connectivity = snapshot
            .edges
            .iter()
            .map(|edge| {
                let connected =
                    reachable.contains(&edge.source) && reachable.contains(&edge.target);
                (edge.id.clone(), connected)
            })
            .collect();

        ReachabilityPatch {
            revision: snapshot.revision,
            reachable,
            edge_connectivity,
        }
    }
}
