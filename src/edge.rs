//! Committed edge records.
//!
//! An [`Edge`] joins a source node handle to a target node handle. Its
//! `kind` is derived from the two handle ids (see
//! [`crate::node::is_execution_handle_id`]) and its `connected` flag is
//! derived by the reachability engine; neither is caller-settable state.
//! Edges come into existence only through a validator-approved commit
//! ([`crate::graph::validate_connection`] followed by
//! [`GraphStore::add_edge`](crate::graph::GraphStore::add_edge)) or through
//! hydration, and both paths re-derive the kind.

use serde::{Deserialize, Serialize};

use crate::node::handle_kind_of_id;
use crate::types::EdgeKind;

/// A directed connection between two node handles.
///
/// # Examples
///
/// ```rust
/// use flowlattice::edge::Edge;
/// use flowlattice::types::EdgeKind;
///
/// let edge = Edge::new("e1", "trigger-1", "exec-out", "email-1", "exec-in");
/// assert_eq!(edge.kind, EdgeKind::Execution);
/// assert!(!edge.connected);
///
/// let wire = Edge::new("e2", "var-1", "value", "email-1", "subject");
/// assert_eq!(wire.kind, EdgeKind::Data);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub source_handle: String,
    pub target: String,
    pub target_handle: String,
    /// Derived classification; recomputed on commit and hydration.
    pub kind: EdgeKind,
    /// Derived by the reachability engine; `false` until the first patch.
    #[serde(default)]
    pub connected: bool,
}

impl Edge {
    /// Builds an edge with the kind derived from the handle ids and
    /// `connected` pending the next reachability recompute.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        source_handle: impl Into<String>,
        target: impl Into<String>,
        target_handle: impl Into<String>,
    ) -> Self {
        let source_handle = source_handle.into();
        let target_handle = target_handle.into();
        let kind = EdgeKind::derive(
            handle_kind_of_id(&source_handle),
            handle_kind_of_id(&target_handle),
        );
        Self {
            id: id.into(),
            source: source.into(),
            source_handle,
            target: target.into(),
            target_handle,
            kind,
            connected: false,
        }
    }

    /// Re-derives `kind` from the current handle ids.
    ///
    /// Invariant: the stored kind must always match this derivation. The
    /// store calls it on every commit and during hydration so a stale
    /// persisted value cannot survive.
    pub fn rederive_kind(&mut self) {
        self.kind = EdgeKind::derive(
            handle_kind_of_id(&self.source_handle),
            handle_kind_of_id(&self.target_handle),
        );
    }

    /// Returns `true` for execution edges.
    #[must_use]
    pub fn is_execution(&self) -> bool {
        self.kind.is_execution()
    }

    /// `(node, handle)` pair on the source side.
    #[must_use]
    pub fn source_endpoint(&self) -> (&str, &str) {
        (&self.source, &self.source_handle)
    }

    /// `(node, handle)` pair on the target side.
    #[must_use]
    pub fn target_endpoint(&self) -> (&str, &str) {
        (&self.target, &self.target_handle)
    }
}
