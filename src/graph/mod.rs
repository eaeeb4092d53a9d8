//! Canvas graph state: store, connection protocol, and reachability.
//!
//! This module owns the live graph a canvas edits. The pieces compose in a
//! fixed order that keeps every derived value explicit:
//!
//! 1. [`GraphStore`] holds the canonical node/edge collections and applies
//!    mutations atomically, bumping a monotonic revision counter.
//! 2. [`validate_connection`] is the pure gate every new edge passes
//!    through; the store only ever commits validator-produced edges.
//! 3. [`ReachabilityEngine`] consumes a [`GraphSnapshot`] taken after a
//!    mutation and returns a [`ReachabilityPatch`] the caller applies back
//!    onto the store.
//!
//! There is no hidden reactive loop: snapshot → compute → patch is the whole
//! protocol, and each arrow is an explicit call.
//!
//! # Quick Start
//!
//! ```rust
//! use flowlattice::graph::{
//!     GraphStore, ProposedConnection, ReachabilityEngine, validate_connection,
//! };
//! use flowlattice::node::Node;
//! use flowlattice::types::NodeKind;
//!
//! # fn main() -> Result<(), flowlattice::graph::GraphError> {
//! let mut store = GraphStore::new();
//! store.add_node(Node::new("start", NodeKind::Trigger).as_starting_point())?;
//! store.add_node(Node::new("mail", NodeKind::EmailSend))?;
//!
//! // Validate-then-commit, one logical operation.
//! let proposed = ProposedConnection::new("start", "mail");
//! let edge = validate_connection(&proposed, store.edges())
//!     .into_result()
//!     .expect("first execution edge is always accepted");
//! store.add_edge(edge)?;
//!
//! // Recompute reachability and patch the derived flags back in.
//! let mut engine = ReachabilityEngine::new();
//! if let Some(patch) = engine.recompute(&store.snapshot()) {
//!     store.apply_connectivity(&patch);
//! }
//! assert!(store.edges().all(|e| e.connected));
//! # Ok(())
//! # }
//! ```

mod connect;
mod reachability;
mod store;

pub use connect::{
    ConnectionRejection, ConnectionVerdict, NormalizedConnection, ProposedConnection,
    validate_connection,
};
pub use reachability::{GraphSnapshot, ReachabilityEngine, ReachabilityPatch, SnapshotEdge};
pub use store::{GraphDocument, GraphError, GraphStore};
