use chrono::{DateTime, TimeZone, Utc};

use flowlattice::edge::Edge;
use flowlattice::graph::{GraphStore, ProposedConnection, validate_connection};
use flowlattice::node::Node;
use flowlattice::trace::LogEntry;
use flowlattice::types::NodeKind;

pub fn trigger(id: &str) -> Node {
    Node::new(id, NodeKind::Trigger).as_starting_point()
}

pub fn agent(id: &str) -> Node {
    Node::new(id, NodeKind::AiAgent)
}

pub fn email(id: &str) -> Node {
    Node::new(id, NodeKind::EmailSend)
}

pub fn variable(id: &str) -> Node {
    Node::new(id, NodeKind::Variable)
}

pub fn end(id: &str) -> Node {
    Node::new(id, NodeKind::End)
}

/// Execution edge on the default handles, with a caller-chosen id.
pub fn exec_edge(id: &str, from: &str, to: &str) -> Edge {
    Edge::new(id, from, "exec-out", to, "exec-in")
}

/// Store pre-populated with the given nodes.
pub fn store_with(nodes: impl IntoIterator<Item = Node>) -> GraphStore {
    let mut store = GraphStore::new();
    for node in nodes {
        store.add_node(node).unwrap();
    }
    store
}

/// Runs the full validate-then-commit protocol on the default handles.
pub fn connect(store: &mut GraphStore, from: &str, to: &str) -> Edge {
    let edge = validate_connection(&ProposedConnection::new(from, to), store.edges())
        .into_result()
        .unwrap();
    store.add_edge(edge).unwrap().clone()
}

pub fn ts(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

/// Node-scoped log entry with a kind string.
pub fn node_log(id: &str, node: &str, kind: &str, secs: i64, message: &str) -> LogEntry {
    LogEntry::new(id, ts(secs), message).with_node(node, Some(kind))
}
