//! Identifier generation helpers.
//!
//! Generated ids follow predictable, parseable formats:
//!
//! - Edge ids: `edge-{uuid}`
//! - Node ids: `{kind}-{short uuid}` (e.g. `ai-agent-1f9c2d4e`)
//!
//! Node ids are normally assigned by the canvas UI; [`node_id`] exists for
//! hosts and tests that create nodes programmatically.

use uuid::Uuid;

use crate::types::NodeKind;

/// Fresh edge id for a validator-accepted connection.
#[must_use]
pub fn edge_id() -> String {
    format!("edge-{}", Uuid::new_v4())
}

/// Fresh node id prefixed with the kind's canonical name.
#[must_use]
pub fn node_id(kind: NodeKind) -> String {
    let uuid = Uuid::new_v4().simple().to_string();
    format!("{}-{}", kind.as_str(), &uuid[..8])
}
