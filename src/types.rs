//! Core types for the flowlattice graph engine.
//!
//! This module defines the fundamental vocabulary used throughout the crate
//! for classifying nodes, handles, and edges on an automation canvas. These
//! are the domain concepts that define what a flow graph *is*; the structural
//! records built from them live in [`crate::node`] and [`crate::edge`].
//!
//! # Key Types
//!
//! - [`NodeKind`]: Closed enum of the node kinds a canvas can host
//! - [`HandleDirection`]: Which side of a node a handle sits on
//! - [`HandleKind`]: Whether a handle carries control flow or values
//! - [`EdgeKind`]: Derived classification of a committed edge
//!
//! # Examples
//!
//! ```rust
//! use flowlattice::types::{EdgeKind, HandleKind, NodeKind};
//!
//! let kind = NodeKind::AiAgent;
//! assert_eq!(kind.as_str(), "ai-agent");
//! assert!(!kind.supports_activation());
//!
//! // Edge kind is derived from its endpoint handles, never set directly.
//! let derived = EdgeKind::derive(HandleKind::Execution, HandleKind::Execution);
//! assert_eq!(derived, EdgeKind::Execution);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifies the kind of a node on the canvas.
///
/// The set is closed: every node a collaborator can create or hydrate falls
/// into one of these kinds. Kind drives which handles a node exposes by
/// default (see [`NodeKind::default_handles`]), whether the node can act as a
/// workflow starting point, and how the trace reconstructor orders
/// simultaneous steps.
///
/// # Persistence
///
/// Kinds serialize in kebab-case (`"ai-agent"`, `"email-send"`), matching the
/// wire form used by the log-source collaborator. [`NodeKind::from_str`]
/// accepts the same strings and fails on anything else; callers that must
/// degrade gracefully (the trace reconstructor) treat the failure as "kind
/// unknown" rather than an error.
///
/// # Examples
///
/// ```rust
/// use flowlattice::types::NodeKind;
///
/// let kind: NodeKind = "email-send".parse().unwrap();
/// assert_eq!(kind, NodeKind::EmailSend);
/// assert!("teleport".parse::<NodeKind>().is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    /// Manual entry point; a run can be activated from here.
    Trigger,
    /// External entry point activated by an inbound request.
    Webhook,
    /// LLM step that turns a prompt and inputs into an output value.
    AiAgent,
    /// Outbound email step.
    EmailSend,
    /// Branching step with distinct true/false execution outputs.
    Condition,
    /// Pure value holder; participates in data flow only.
    Variable,
    /// Terminal marker for a workflow branch.
    End,
}

impl NodeKind {
    /// Canonical kebab-case form, identical to the serde representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Trigger => "trigger",
            NodeKind::Webhook => "webhook",
            NodeKind::AiAgent => "ai-agent",
            NodeKind::EmailSend => "email-send",
            NodeKind::Condition => "condition",
            NodeKind::Variable => "variable",
            NodeKind::End => "end",
        }
    }

    /// Returns `true` for kinds that can start a workflow run.
    ///
    /// The `is_starting_point` flag on a [`Node`](crate::node::Node) is only
    /// meaningful for these kinds; the reachability engine still honors the
    /// flag wherever it appears (see the reachability invariants).
    #[must_use]
    pub fn supports_activation(&self) -> bool {
        matches!(self, NodeKind::Trigger | NodeKind::Webhook)
    }

    /// Returns `true` for kinds that carry values but never control flow.
    ///
    /// Value-only nodes are excluded from reconstructed traces: they are not
    /// execution steps.
    #[must_use]
    pub fn is_value_only(&self) -> bool {
        matches!(self, NodeKind::Variable)
    }

    /// Returns `true` for the terminal kind.
    #[must_use]
    pub fn is_end(&self) -> bool {
        matches!(self, NodeKind::End)
    }

    /// Returns `true` for kinds that deliver something outward (send-class).
    #[must_use]
    pub fn is_send(&self) -> bool {
        matches!(self, NodeKind::EmailSend)
    }

    /// Every kind, in declaration order. Handy for UI palettes and tests.
    #[must_use]
    pub fn all() -> &'static [NodeKind] {
        &[
            NodeKind::Trigger,
            NodeKind::Webhook,
            NodeKind::AiAgent,
            NodeKind::EmailSend,
            NodeKind::Condition,
            NodeKind::Variable,
            NodeKind::End,
        ]
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a known [`NodeKind`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown node kind `{0}`")]
pub struct UnknownNodeKind(pub String);

impl FromStr for NodeKind {
    type Err = UnknownNodeKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeKind::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownNodeKind(s.to_string()))
    }
}

/// Which side of a node a handle sits on.
///
/// `Source` handles originate edges; `Target` handles receive them. The
/// direction is fixed per handle, not per edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleDirection {
    Source,
    Target,
}

/// Whether a handle carries control flow or values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleKind {
    /// Sequential activation; capped at one edge per handle side.
    Execution,
    /// Computed attribute flow; unconstrained arity.
    Data,
}

/// Classification of a committed edge.
///
/// Derived from the endpoint handles and never independently settable: an
/// edge is an execution edge iff *both* of its handles are execution
/// handles, otherwise it is a data edge. The store re-derives the kind on
/// every commit and on hydration so a stale or hand-edited value can never
/// survive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Execution,
    Data,
}

impl EdgeKind {
    /// Derives the edge kind from its endpoint handle kinds.
    #[must_use]
    pub fn derive(source: HandleKind, target: HandleKind) -> Self {
        match (source, target) {
            (HandleKind::Execution, HandleKind::Execution) => EdgeKind::Execution,
            _ => EdgeKind::Data,
        }
    }

    /// Returns `true` for [`EdgeKind::Execution`].
    #[must_use]
    pub fn is_execution(&self) -> bool {
        matches!(self, EdgeKind::Execution)
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeKind::Execution => f.write_str("execution"),
            EdgeKind::Data => f.write_str("data"),
        }
    }
}
