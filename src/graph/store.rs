//! Canonical node/edge storage with atomic mutation primitives.
//!
//! [`GraphStore`] is the single source of truth for a canvas. Mutations are
//! all-or-nothing: every precondition is checked before the first write, so
//! a returned [`GraphError`] guarantees the store is untouched. Each
//! successful mutation bumps a monotonic revision counter that the
//! reachability engine uses to skip redundant recomputes.

use std::collections::hash_map::Entry;

use miette::Diagnostic;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use super::reachability::{GraphSnapshot, ReachabilityPatch, SnapshotEdge};
use crate::edge::Edge;
use crate::node::Node;

/// Structural errors raised by [`GraphStore`] mutations.
///
/// These indicate caller misuse (committing against a stale view, replaying
/// an id, referencing a missing endpoint) and always abort the mutation with
/// no partial apply. They are logged at `warn` level before being returned;
/// user-facing connection rejections live in
/// [`ConnectionRejection`](super::ConnectionRejection) instead.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum GraphError {
    /// An id is already present in the store.
    #[error("id `{id}` is already present in the graph")]
    #[diagnostic(
        code(flowlattice::graph::duplicate_id),
        help("Node and edge ids must be unique across the canvas.")
    )]
    DuplicateId { id: String },

    /// A node lookup failed during a mutation.
    #[error("node `{id}` was not found")]
    #[diagnostic(code(flowlattice::graph::node_not_found))]
    NodeNotFound { id: String },

    /// An edge lookup failed during a mutation.
    #[error("edge `{id}` was not found")]
    #[diagnostic(code(flowlattice::graph::edge_not_found))]
    EdgeNotFound { id: String },

    /// An edge endpoint referenced a handle the node does not expose.
    #[error("node `{node}` has no `{handle}` handle on the required side")]
    #[diagnostic(
        code(flowlattice::graph::handle_not_found),
        help("Handles are fixed per node kind; check the direction and id.")
    )]
    HandleNotFound { node: String, handle: String },
}

/// Persisted document shape at the serialization boundary.
///
/// The document format (JSON with `nodes`/`edges` arrays) is owned by the
/// persistence collaborator; this type only pins the shape the engine can
/// [`serialize`](GraphStore::serialize) into and
/// [`hydrate`](GraphStore::hydrate) from.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// The canonical node/edge collections for one canvas.
///
/// Expected to be driven from a single logical thread; user edits are
/// serialized by the host, so the store carries no interior locking. See
/// the [module docs](super) for the snapshot → compute → patch protocol.
#[derive(Clone, Debug, Default)]
pub struct GraphStore {
    nodes: FxHashMap<String, Node>,
    edges: FxHashMap<String, Edge>,
    revision: u64,
}

impl GraphStore {
    /// Creates an empty store at revision zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Monotonic mutation counter. Bumped by every successful mutation;
    /// untouched by failed mutations and by
    /// [`apply_connectivity`](Self::apply_connectivity).
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Lookup without side effects.
    #[must_use]
    pub fn get_node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Lookup without side effects.
    #[must_use]
    pub fn get_edge(&self, id: &str) -> Option<&Edge> {
        self.edges.get(id)
    }

    /// Iterates all nodes in arbitrary order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Iterates all edges in arbitrary order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    /// Adds a node.
    ///
    /// # Errors
    ///
    /// [`GraphError::DuplicateId`] if the id is already present.
    pub fn add_node(&mut self, node: Node) -> Result<&Node, GraphError> {
        match self.nodes.entry(node.id.clone()) {
            Entry::Occupied(occupied) => {
                warn!(id = %occupied.key(), "rejected add_node with duplicate id");
                Err(GraphError::DuplicateId {
                    id: occupied.key().clone(),
                })
            }
            Entry::Vacant(vacant) => {
                self.revision += 1;
                Ok(vacant.insert(node))
            }
        }
    }

    /// Removes a node and cascades removal of every edge referencing it.
    ///
    /// The dependent edge set is computed internally and removed in the same
    /// logical operation; callers never issue the edge removals themselves.
    /// Returns the removed edges so the caller can patch its view.
    ///
    /// # Errors
    ///
    /// [`GraphError::NodeNotFound`] if the id is absent (nothing removed).
    pub fn remove_node(&mut self, id: &str) -> Result<Vec<Edge>, GraphError> {
        if self.nodes.remove(id).is_none() {
            warn!(%id, "rejected remove_node for unknown id");
            return Err(GraphError::NodeNotFound { id: id.to_string() });
        }
        let dependent: Vec<String> = self
            .edges
            .values()
            .filter(|edge| edge.source == id || edge.target == id)
            .map(|edge| edge.id.clone())
            .collect();
        let mut removed = Vec::with_capacity(dependent.len());
        for edge_id in dependent {
            if let Some(edge) = self.edges.remove(&edge_id) {
                removed.push(edge);
            }
        }
        self.revision += 1;
        Ok(removed)
    }

    /// Commits an edge the caller has already run through
    /// [`validate_connection`](super::validate_connection).
    ///
    /// The edge kind is re-derived from the handle ids and the `connected`
    /// flag is reset pending the next reachability recompute.
    ///
    /// # Errors
    ///
    /// - [`GraphError::DuplicateId`] if the edge id is already present
    /// - [`GraphError::NodeNotFound`] if either endpoint node is absent
    /// - [`GraphError::HandleNotFound`] if an endpoint handle is absent or
    ///   sits on the wrong side of its node
    pub fn add_edge(&mut self, mut edge: Edge) -> Result<&Edge, GraphError> {
        if self.edges.contains_key(&edge.id) {
            warn!(id = %edge.id, "rejected add_edge with duplicate id");
            return Err(GraphError::DuplicateId { id: edge.id });
        }
        Self::check_endpoints(&self.nodes, &edge)?;
        edge.rederive_kind();
        edge.connected = false;
        self.revision += 1;
        Ok(self.edges.entry(edge.id.clone()).or_insert(edge))
    }

    /// Removes an edge, returning it.
    ///
    /// # Errors
    ///
    /// [`GraphError::EdgeNotFound`] if the id is absent.
    pub fn remove_edge(&mut self, id: &str) -> Result<Edge, GraphError> {
        match self.edges.remove(id) {
            Some(edge) => {
                self.revision += 1;
                Ok(edge)
            }
            None => {
                warn!(%id, "rejected remove_edge for unknown id");
                Err(GraphError::EdgeNotFound { id: id.to_string() })
            }
        }
    }

    /// Merges an attribute patch into a node's attribute map.
    ///
    /// # Errors
    ///
    /// [`GraphError::NodeNotFound`] if the id is absent.
    pub fn patch_node_attributes(
        &mut self,
        id: &str,
        patch: impl IntoIterator<Item = (String, Value)>,
    ) -> Result<&Node, GraphError> {
        let Some(node) = self.nodes.get_mut(id) else {
            warn!(%id, "rejected attribute patch for unknown node");
            return Err(GraphError::NodeNotFound { id: id.to_string() });
        };
        node.attributes.extend(patch);
        self.revision += 1;
        Ok(node)
    }

    /// Sets or clears a node's starting-point flag.
    ///
    /// A no-op write (flag already at the requested value) is not counted as
    /// a mutation, so downstream revision-gated recomputes stay quiet.
    ///
    /// # Errors
    ///
    /// [`GraphError::NodeNotFound`] if the id is absent.
    pub fn set_starting_point(&mut self, id: &str, flag: bool) -> Result<(), GraphError> {
        let Some(node) = self.nodes.get_mut(id) else {
            warn!(%id, "rejected starting-point toggle for unknown node");
            return Err(GraphError::NodeNotFound { id: id.to_string() });
        };
        if node.is_starting_point != flag {
            node.is_starting_point = flag;
            self.revision += 1;
        }
        Ok(())
    }

    /// Takes the immutable snapshot the reachability engine consumes.
    #[must_use]
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            revision: self.revision,
            starting_points: self
                .nodes
                .values()
                .filter(|node| node.is_starting_point)
                .map(|node| node.id.clone())
                .collect(),
            edges: self
                .edges
                .values()
                .map(|edge| SnapshotEdge {
                    id: edge.id.clone(),
                    source: edge.source.clone(),
                    target: edge.target.clone(),
                    kind: edge.kind,
                })
                .collect(),
        }
    }

    /// Writes the per-edge `connected` flags from a reachability patch.
    ///
    /// Not a graph mutation: the flags are derived state, so the revision is
    /// left alone and no further recompute is triggered.
    pub fn apply_connectivity(&mut self, patch: &ReachabilityPatch) {
        for edge in self.edges.values_mut() {
            edge.connected = patch
                .edge_connectivity
                .get(&edge.id)
                .copied()
                .unwrap_or(false);
        }
    }

    /// Serializes the store into the boundary document shape.
    ///
    /// Output order is id-sorted so persisted documents diff cleanly.
    #[must_use]
    pub fn serialize(&self) -> GraphDocument {
        let mut nodes: Vec<Node> = self.nodes.values().cloned().collect();
        nodes.sort_by(|a, b| a.id.cmp(&b.id));
        let mut edges: Vec<Edge> = self.edges.values().cloned().collect();
        edges.sort_by(|a, b| a.id.cmp(&b.id));
        GraphDocument { nodes, edges }
    }

    /// Rebuilds a store from a persisted document.
    ///
    /// Nodes hydrated without handles receive their kind's defaults, edge
    /// kinds are re-derived, and the same duplicate/endpoint checks as the
    /// live mutations apply. Persisted `connected` flags are kept as a
    /// best-effort display state until the first recompute.
    ///
    /// # Errors
    ///
    /// Any [`GraphError`] a live `add_node`/`add_edge` sequence would raise.
    pub fn hydrate(document: GraphDocument) -> Result<Self, GraphError> {
        let mut store = GraphStore::new();
        for mut node in document.nodes {
            node.ensure_handles();
            if store.nodes.contains_key(&node.id) {
                warn!(id = %node.id, "rejected hydration with duplicate node id");
                return Err(GraphError::DuplicateId { id: node.id });
            }
            store.nodes.insert(node.id.clone(), node);
        }
        for mut edge in document.edges {
            if store.edges.contains_key(&edge.id) {
                warn!(id = %edge.id, "rejected hydration with duplicate edge id");
                return Err(GraphError::DuplicateId { id: edge.id });
            }
            Self::check_endpoints(&store.nodes, &edge)?;
            edge.rederive_kind();
            store.edges.insert(edge.id.clone(), edge);
        }
        Ok(store)
    }

    fn check_endpoints(
        nodes: &FxHashMap<String, Node>,
        edge: &Edge,
    ) -> Result<(), GraphError> {
        let source = nodes
            .get(&edge.source)
            .ok_or_else(|| GraphError::NodeNotFound {
                id: edge.source.clone(),
            })?;
        if source.source_handle(&edge.source_handle).is_none() {
            warn!(node = %edge.source, handle = %edge.source_handle, "edge references missing source handle");
            return Err(GraphError::HandleNotFound {
                node: edge.source.clone(),
                handle: edge.source_handle.clone(),
            });
        }
        let target = nodes
            .get(&edge.target)
            .ok_or_else(|| GraphError::NodeNotFound {
                id: edge.target.clone(),
            })?;
        if target.target_handle(&edge.target_handle).is_none() {
            warn!(node = %edge.target, handle = %edge.target_handle, "edge references missing target handle");
            return Err(GraphError::HandleNotFound {
                node: edge.target.clone(),
                handle: edge.target_handle.clone(),
            });
        }
        Ok(())
    }
}
