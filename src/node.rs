//! Node and handle records for the canvas graph.
//!
//! A [`Node`] is the unit users place on the canvas: a typed step with a
//! free-form attribute map and a set of [`Handle`]s that edges attach to.
//! Handles come in two kinds, execution (control flow) and data (value
//! flow), and the kind is encoded in the handle id itself: execution
//! handles carry the `exec` marker prefix. That convention is what lets the
//! connection validator classify a proposed edge from ids alone, before the
//! node records are ever consulted.
//!
//! # Examples
//!
//! ```rust
//! use flowlattice::node::{DEFAULT_SOURCE_HANDLE, Node, is_execution_handle_id};
//! use flowlattice::types::NodeKind;
//!
//! let trigger = Node::new("trigger-1", NodeKind::Trigger).as_starting_point();
//! assert!(trigger.is_starting_point);
//! // Default handles come from the kind.
//! assert!(trigger.handle(DEFAULT_SOURCE_HANDLE).is_some());
//! assert!(is_execution_handle_id(DEFAULT_SOURCE_HANDLE));
//! ```

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{HandleDirection, HandleKind, NodeKind};
use crate::utils::collections::new_attr_map;

/// Marker prefix that designates an execution handle id.
pub const EXECUTION_MARKER: &str = "exec";

/// Canonical id of the default execution output handle.
pub const DEFAULT_SOURCE_HANDLE: &str = "exec-out";

/// Canonical id of the default execution input handle.
pub const DEFAULT_TARGET_HANDLE: &str = "exec-in";

/// Returns `true` if `id` carries the execution marker.
///
/// Classification is purely lexical so that a proposed connection can be
/// categorized before any node lookup happens.
#[must_use]
pub fn is_execution_handle_id(id: &str) -> bool {
    id == EXECUTION_MARKER || id.starts_with("exec-")
}

/// Handle kind implied by a handle id.
#[must_use]
pub fn handle_kind_of_id(id: &str) -> HandleKind {
    if is_execution_handle_id(id) {
        HandleKind::Execution
    } else {
        HandleKind::Data
    }
}

/// A connection point owned by a node.
///
/// The `kind` field always agrees with the id marker; constructors enforce
/// it, and [`Handle::from_id`] is the hydration-safe way to rebuild a handle
/// from persisted data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Handle {
    pub id: String,
    pub direction: HandleDirection,
    pub kind: HandleKind,
}

impl Handle {
    /// Builds a handle, deriving the kind from the id marker.
    #[must_use]
    pub fn from_id(id: impl Into<String>, direction: HandleDirection) -> Self {
        let id = id.into();
        let kind = handle_kind_of_id(&id);
        Self { id, direction, kind }
    }

    /// Execution handle with an explicit id. The id must carry the marker.
    #[must_use]
    pub fn execution(id: impl Into<String>, direction: HandleDirection) -> Self {
        let id = id.into();
        debug_assert!(is_execution_handle_id(&id));
        Self {
            id,
            direction,
            kind: HandleKind::Execution,
        }
    }

    /// Data handle with an explicit id.
    #[must_use]
    pub fn data(id: impl Into<String>, direction: HandleDirection) -> Self {
        let id = id.into();
        debug_assert!(!is_execution_handle_id(&id));
        Self {
            id,
            direction,
            kind: HandleKind::Data,
        }
    }

    /// Returns `true` for execution handles.
    #[must_use]
    pub fn is_execution(&self) -> bool {
        self.kind == HandleKind::Execution
    }
}

impl NodeKind {
    /// The canonical handle set a freshly created node of this kind exposes.
    ///
    /// Single-handle kinds stay handle-id-agnostic at the UI layer: a
    /// connection dropped on them without an explicit handle id normalizes
    /// onto [`DEFAULT_SOURCE_HANDLE`] / [`DEFAULT_TARGET_HANDLE`].
    #[must_use]
    pub fn default_handles(&self) -> Vec<Handle> {
        use HandleDirection::{Source, Target};
        match self {
            NodeKind::Trigger => vec![Handle::execution(DEFAULT_SOURCE_HANDLE, Source)],
            NodeKind::Webhook => vec![
                Handle::execution(DEFAULT_SOURCE_HANDLE, Source),
                Handle::data("payload", Source),
            ],
            NodeKind::AiAgent => vec![
                Handle::execution(DEFAULT_TARGET_HANDLE, Target),
                Handle::execution(DEFAULT_SOURCE_HANDLE, Source),
                Handle::data("prompt", Target),
                Handle::data("output", Source),
            ],
            NodeKind::EmailSend => vec![
                Handle::execution(DEFAULT_TARGET_HANDLE, Target),
                Handle::execution(DEFAULT_SOURCE_HANDLE, Source),
                Handle::data("subject", Target),
                Handle::data("body", Target),
            ],
            NodeKind::Condition => vec![
                Handle::execution(DEFAULT_TARGET_HANDLE, Target),
                Handle::execution("exec-out-true", Source),
                Handle::execution("exec-out-false", Source),
                Handle::data("input", Target),
            ],
            NodeKind::Variable => vec![Handle::data("value", Source)],
            NodeKind::End => vec![Handle::execution(DEFAULT_TARGET_HANDLE, Target)],
        }
    }
}

/// A typed step on the canvas.
///
/// Nodes are created through [`Node::new`] (which installs the kind's default
/// handle set) or rebuilt from a persisted document by
/// [`GraphStore::hydrate`](crate::graph::GraphStore::hydrate). Attributes are
/// an open key→value map owned by the UI and execution collaborators; the
/// engine itself only reads `id`, `kind`, `is_starting_point`, and `handles`.
///
/// # Examples
///
/// ```rust
/// use flowlattice::node::Node;
/// use flowlattice::types::NodeKind;
/// use serde_json::json;
///
/// let email = Node::new("email-1", NodeKind::EmailSend)
///     .with_attribute("subject", json!("Welcome aboard"))
///     .with_attribute("to", json!(""));
/// assert_eq!(email.attributes.len(), 2);
/// assert!(!email.is_starting_point);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    #[serde(default)]
    pub attributes: FxHashMap<String, Value>,
    #[serde(default)]
    pub is_starting_point: bool,
    /// Empty on the wire means "use the kind's defaults"; hydration fills it.
    #[serde(default)]
    pub handles: Vec<Handle>,
}

impl Node {
    /// Creates a node with the kind's default handle set and no attributes.
    #[must_use]
    pub fn new(id: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            kind,
            attributes: new_attr_map(),
            is_starting_point: false,
            handles: kind.default_handles(),
        }
    }

    /// Adds or replaces one attribute.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    /// Adds a handle beyond the kind defaults.
    #[must_use]
    pub fn with_handle(mut self, handle: Handle) -> Self {
        self.handles.push(handle);
        self
    }

    /// Flags this node as a workflow starting point.
    ///
    /// Meaningful only for kinds where
    /// [`supports_activation`](NodeKind::supports_activation) holds, but the
    /// flag is stored verbatim either way; the reachability engine honors it
    /// unconditionally.
    #[must_use]
    pub fn as_starting_point(mut self) -> Self {
        self.is_starting_point = true;
        self
    }

    /// Looks up a handle by id.
    #[must_use]
    pub fn handle(&self, id: &str) -> Option<&Handle> {
        self.handles.iter().find(|h| h.id == id)
    }

    /// Looks up a handle by id, requiring it to sit on the source side.
    #[must_use]
    pub fn source_handle(&self, id: &str) -> Option<&Handle> {
        self.handles
            .iter()
            .find(|h| h.id == id && h.direction == HandleDirection::Source)
    }

    /// Looks up a handle by id, requiring it to sit on the target side.
    #[must_use]
    pub fn target_handle(&self, id: &str) -> Option<&Handle> {
        self.handles
            .iter()
            .find(|h| h.id == id && h.direction == HandleDirection::Target)
    }

    /// Installs the kind's default handles if none were hydrated.
    pub(crate) fn ensure_handles(&mut self) {
        if self.handles.is_empty() {
            self.handles = self.kind.default_handles();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_classification() {
        assert!(is_execution_handle_id("exec"));
        assert!(is_execution_handle_id("exec-out"));
        assert!(is_execution_handle_id("exec-out-true"));
        assert!(!is_execution_handle_id("output"));
        assert!(!is_execution_handle_id("executive"));
    }

    #[test]
    fn default_handles_respect_kind_shape() {
        let trigger = Node::new("t", NodeKind::Trigger);
        assert_eq!(trigger.handles.len(), 1);
        assert!(trigger.source_handle(DEFAULT_SOURCE_HANDLE).is_some());
        assert!(trigger.target_handle(DEFAULT_TARGET_HANDLE).is_none());

        let condition = Node::new("c", NodeKind::Condition);
        assert!(condition.source_handle("exec-out-true").is_some());
        assert!(condition.source_handle("exec-out-false").is_some());
        assert!(condition.target_handle(DEFAULT_TARGET_HANDLE).is_some());

        let variable = Node::new("v", NodeKind::Variable);
        assert!(variable.handles.iter().all(|h| !h.is_execution()));
    }

    #[test]
    fn hydrated_node_without_handles_gets_defaults() {
        let mut node: Node =
            serde_json::from_str(r#"{"id":"n1","kind":"end"}"#).unwrap();
        assert!(node.handles.is_empty());
        node.ensure_handles();
        assert_eq!(node.handles, NodeKind::End.default_handles());
    }
}
