//! # Flowlattice: Flow-Graph Engine for Visual Automation Canvases
//!
//! Flowlattice is the engine behind a node-and-wire automation editor: users
//! compose workflows as a directed graph of typed nodes joined by
//! control-flow ("execution") edges and value-flow ("data") edges, and this
//! crate owns everything about that graph with real invariants in it.
//!
//! ## Core Concepts
//!
//! - **Nodes & Handles**: Typed canvas steps exposing execution and data
//!   connection points; the handle id itself marks which is which
//! - **Edges**: Derived-kind connections, created only through validation
//! - **Connection protocol**: A pure validator that accepts or rejects a
//!   proposed edge with a user-presentable reason
//! - **Reachability**: Forward propagation from starting points along
//!   execution edges, delivered as an explicit patch
//! - **Trace reconstruction**: Best-effort linear step view recovered from
//!   an unordered run log
//!
//! ## Quick Start
//!
//! ### Editing a graph
//!
//! ```
//! use flowlattice::graph::{GraphStore, ProposedConnection, ReachabilityEngine, validate_connection};
//! use flowlattice::node::Node;
//! use flowlattice::types::NodeKind;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = GraphStore::new();
//! store.add_node(Node::new("start", NodeKind::Trigger).as_starting_point())?;
//! store.add_node(Node::new("agent", NodeKind::AiAgent))?;
//! store.add_node(Node::new("mail", NodeKind::EmailSend))?;
//!
//! // Every edge goes through validate-then-commit.
//! for (from, to) in [("start", "agent"), ("agent", "mail")] {
//!     let edge = validate_connection(&ProposedConnection::new(from, to), store.edges())
//!         .into_result()?;
//!     store.add_edge(edge)?;
//! }
//!
//! // Derived state is recomputed explicitly, then patched back in.
//! let mut engine = ReachabilityEngine::new();
//! if let Some(patch) = engine.recompute(&store.snapshot()) {
//!     store.apply_connectivity(&patch);
//! }
//! assert!(store.get_edge("missing").is_none());
//! assert!(store.edges().all(|edge| edge.connected));
//! # Ok(())
//! # }
//! ```
//!
//! ### Rejections are values, not errors
//!
//! ```
//! use flowlattice::edge::Edge;
//! use flowlattice::graph::{ConnectionVerdict, ProposedConnection, validate_connection};
//!
//! let taken = Edge::new("e1", "a", "exec-out", "b", "exec-in");
//! match validate_connection(&ProposedConnection::new("a", "c"), [&taken]) {
//!     ConnectionVerdict::Accepted(_) => unreachable!("a's output is taken"),
//!     ConnectionVerdict::Rejected(reason) => {
//!         // Human-readable, straight to the UI.
//!         assert!(reason.to_string().contains("outgoing execution connection"));
//!     }
//! }
//! ```
//!
//! ### Reconstructing a run trace
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use flowlattice::trace::{LogEntry, TraceReconstructor};
//! use serde_json::json;
//!
//! let entries = vec![
//!     LogEntry::new("l2", Utc.timestamp_opt(2, 0).unwrap(), "done")
//!         .with_node("agent", Some("ai-agent"))
//!         .with_payload(json!({"output": "Hello!"})),
//!     LogEntry::new("l1", Utc.timestamp_opt(1, 0).unwrap(), "processing")
//!         .with_node("agent", Some("ai-agent")),
//! ];
//!
//! let view = TraceReconstructor::new().reconstruct(&entries);
//! // The payload-bearing entry represents the node.
//! assert_eq!(view.steps[0].entry_id, "l2");
//! ```
//!
//! ## Module Guide
//!
//! - [`types`] - Kind enums for nodes, handles, and edges
//! - [`node`] - Node and handle records, default handle sets
//! - [`edge`] - Committed edge records with derived kinds
//! - [`graph`] - Store, connection validation, and reachability
//! - [`trace`] - Log entry model and trace reconstruction
//! - [`utils`] - Id generation and collection helpers

pub mod edge;
pub mod graph;
pub mod node;
pub mod trace;
pub mod types;
pub mod utils;
