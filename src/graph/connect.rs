//! Connection validation: the gate every proposed edge passes through.
//!
//! [`validate_connection`] is a pure function from a [`ProposedConnection`]
//! and the current edge set to a [`ConnectionVerdict`]. It never mutates
//! anything and never panics; rejections are ordinary values carrying a
//! user-presentable reason. The host treats validate-then-commit as one
//! atomic logical operation: no other mutation may interleave between the
//! verdict and the matching
//! [`GraphStore::add_edge`](super::GraphStore::add_edge) call.
//!
//! Normalization happens first and in one place: a proposal with missing
//! handle ids is completed with the canonical defaults before any rule
//! runs, so single-handle node kinds stay handle-id-agnostic and the rules
//! only ever see fully-specified endpoints.

use miette::Diagnostic;
use serde::Deserialize;
use thiserror::Error;

use crate::edge::Edge;
use crate::node::{DEFAULT_SOURCE_HANDLE, DEFAULT_TARGET_HANDLE, is_execution_handle_id};
use crate::utils::ids;

/// A connection gesture as the UI reports it.
///
/// Handle ids are optional: dropping a wire on a node body rather than on a
/// specific handle arrives without them.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposedConnection {
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub source_handle: Option<String>,
    #[serde(default)]
    pub target_handle: Option<String>,
}

impl ProposedConnection {
    /// Proposal between two nodes with unspecified handles.
    #[must_use]
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            source_handle: None,
            target_handle: None,
        }
    }

    /// Pins the source handle.
    #[must_use]
    pub fn with_source_handle(mut self, handle: impl Into<String>) -> Self {
        self.source_handle = Some(handle.into());
        self
    }

    /// Pins the target handle.
    #[must_use]
    pub fn with_target_handle(mut self, handle: impl Into<String>) -> Self {
        self.target_handle = Some(handle.into());
        self
    }

    /// Completes missing handle ids with the canonical defaults.
    ///
    /// This is the single normalization step: everything downstream of it
    /// works on fully-specified endpoints.
    #[must_use]
    pub fn normalize(&self) -> NormalizedConnection {
        NormalizedConnection {
            source: self.source.clone(),
            source_handle: self
                .source_handle
                .clone()
                .unwrap_or_else(|| DEFAULT_SOURCE_HANDLE.to_string()),
            target: self.target.clone(),
            target_handle: self
                .target_handle
                .clone()
                .unwrap_or_else(|| DEFAULT_TARGET_HANDLE.to_string()),
        }
    }
}

/// A fully-specified connection candidate, post-normalization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizedConnection {
    pub source: String,
    pub source_handle: String,
    pub target: String,
    pub target_handle: String,
}

impl NormalizedConnection {
    /// Execution-link iff both handle ids carry the execution marker.
    #[must_use]
    pub fn is_execution_link(&self) -> bool {
        is_execution_handle_id(&self.source_handle) && is_execution_handle_id(&self.target_handle)
    }

    /// Materializes the candidate as a committable [`Edge`] with a fresh id,
    /// derived kind, and connectivity pending the next recompute.
    #[must_use]
    pub fn into_edge(self) -> Edge {
        Edge::new(
            ids::edge_id(),
            self.source,
            self.source_handle,
            self.target,
            self.target_handle,
        )
    }
}

/// Why a proposed connection was turned down.
///
/// Rejections are returned, never raised: the UI shows
/// [`Display`](std::fmt::Display) text to the user and carries on.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum ConnectionRejection {
    /// The source execution handle already originates an execution edge.
    #[error("this node already has an outgoing execution connection")]
    #[diagnostic(
        code(flowlattice::connect::source_already_connected),
        help("Each execution output can drive exactly one next step; remove the existing connection first.")
    )]
    SourceAlreadyConnected { node: String, handle: String },

    /// The target execution handle already receives an execution edge.
    #[error("this node already has an incoming execution connection")]
    #[diagnostic(
        code(flowlattice::connect::target_already_connected),
        help("Each execution input accepts exactly one predecessor; remove the existing connection first.")
    )]
    TargetAlreadyConnected { node: String, handle: String },
}

/// Outcome of [`validate_connection`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionVerdict {
    /// The proposal is sound; commit this edge via the store.
    Accepted(Edge),
    /// The proposal violates an execution-arity rule.
    Rejected(ConnectionRejection),
}

impl ConnectionVerdict {
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, ConnectionVerdict::Accepted(_))
    }

    /// Converts into a `Result` for `?`-style handling.
    pub fn into_result(self) -> Result<Edge, ConnectionRejection> {
        match self {
            ConnectionVerdict::Accepted(edge) => Ok(edge),
            ConnectionVerdict::Rejected(reason) => Err(reason),
        }
    }
}

/// Validates a proposed connection against the current edge set.
///
/// Rules, in order:
///
/// 1. Normalize missing handle ids to the canonical defaults.
/// 2. Classify: execution-link iff both handle ids carry the execution
///    marker, data-link otherwise.
/// 3. Execution-links are rejected when the source `(node, handle)` already
///    originates an execution edge, then when the target `(node, handle)`
///    already receives one.
/// 4. Data-links are always accepted; fan-in and fan-out on data handles
///    are unconstrained.
/// 5. Acceptance yields a fully-specified [`Edge`].
///
/// Pure: no side effects, callers commit via the store.
///
/// # Examples
///
/// ```rust
/// use flowlattice::edge::Edge;
/// use flowlattice::graph::{ConnectionRejection, ProposedConnection, validate_connection};
///
/// let taken = Edge::new("e1", "a", "exec-out", "b", "exec-in");
/// let verdict = validate_connection(&ProposedConnection::new("a", "c"), [&taken]);
/// assert_eq!(
///     verdict.into_result().unwrap_err(),
///     ConnectionRejection::SourceAlreadyConnected {
///         node: "a".into(),
///         handle: "exec-out".into(),
///     },
/// );
/// ```
pub fn validate_connection<'a, I>(proposed: &ProposedConnection, existing: I) -> ConnectionVerdict
where
    I: IntoIterator<Item = &'a Edge>,
{
    let candidate = proposed.normalize();

    if candidate.is_execution_link() {
        let execution_edges: Vec<&Edge> =
            existing.into_iter().filter(|e| e.is_execution()).collect();

        let source_endpoint = (candidate.source.as_str(), candidate.source_handle.as_str());
        if execution_edges
            .iter()
            .any(|e| e.source_endpoint() == source_endpoint)
        {
            return ConnectionVerdict::Rejected(ConnectionRejection::SourceAlreadyConnected {
                node: candidate.source,
                handle: candidate.source_handle,
            });
        }

        let target_endpoint = (candidate.target.as_str(), candidate.target_handle.as_str());
        if execution_edges
            .iter()
            .any(|e| e.target_endpoint() == target_endpoint)
        {
            return ConnectionVerdict::Rejected(ConnectionRejection::TargetAlreadyConnected {
                node: candidate.target,
                handle: candidate.target_handle,
            });
        }
    }

    ConnectionVerdict::Accepted(candidate.into_edge())
}
