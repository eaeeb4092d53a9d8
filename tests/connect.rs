mod common;

use common::*;
use flowlattice::graph::{
    ConnectionRejection, ConnectionVerdict, ProposedConnection, validate_connection,
};
use flowlattice::node::{DEFAULT_SOURCE_HANDLE, DEFAULT_TARGET_HANDLE};
use flowlattice::types::EdgeKind;

#[test]
fn scenario_b_second_edge_from_used_output_is_rejected() {
    let mut store = store_with([trigger("s"), agent("a"), email("b"), email("c")]);
    connect(&mut store, "s", "a");
    connect(&mut store, "a", "b");

    // A's execution output is taken; wiring it to C must be rejected.
    let verdict = validate_connection(&ProposedConnection::new("a", "c"), store.edges());
    assert_eq!(
        verdict.into_result().unwrap_err(),
        ConnectionRejection::SourceAlreadyConnected {
            node: "a".into(),
            handle: DEFAULT_SOURCE_HANDLE.into(),
        }
    );
}

#[test]
fn occupied_target_input_is_rejected() {
    let mut store = store_with([trigger("s"), trigger("t"), agent("a")]);
    connect(&mut store, "s", "a");

    let verdict = validate_connection(&ProposedConnection::new("t", "a"), store.edges());
    assert_eq!(
        verdict.into_result().unwrap_err(),
        ConnectionRejection::TargetAlreadyConnected {
            node: "a".into(),
            handle: DEFAULT_TARGET_HANDLE.into(),
        }
    );
}

#[test]
fn distinct_execution_handles_on_one_node_are_independent() {
    let mut store = store_with([
        trigger("s"),
        flowlattice::node::Node::new("c", flowlattice::types::NodeKind::Condition),
        email("yes"),
        email("no"),
    ]);
    connect(&mut store, "s", "c");

    for (handle, target) in [("exec-out-true", "yes"), ("exec-out-false", "no")] {
        let edge = validate_connection(
            &ProposedConnection::new("c", target).with_source_handle(handle),
            store.edges(),
        )
        .into_result()
        .unwrap();
        store.add_edge(edge).unwrap();
    }
    assert_eq!(store.edge_count(), 3);

    // But reusing the true-branch handle is still capped.
    let verdict = validate_connection(
        &ProposedConnection::new("c", "no").with_source_handle("exec-out-true"),
        store.edges(),
    );
    assert!(!verdict.is_accepted());
}

#[test]
fn data_links_have_no_arity_limit() {
    let mut store = store_with([variable("v1"), variable("v2"), email("m"), agent("a")]);

    // Fan-in: two sources into the same subject handle.
    for source in ["v1", "v2"] {
        let edge = validate_connection(
            &ProposedConnection::new(source, "m")
                .with_source_handle("value")
                .with_target_handle("subject"),
            store.edges(),
        )
        .into_result()
        .unwrap();
        store.add_edge(edge).unwrap();
    }

    // Fan-out: the same source handle again, toward another node.
    let edge = validate_connection(
        &ProposedConnection::new("v1", "a")
            .with_source_handle("value")
            .with_target_handle("prompt"),
        store.edges(),
    )
    .into_result()
    .unwrap();
    store.add_edge(edge).unwrap();

    assert_eq!(store.edge_count(), 3);
    assert!(store.edges().all(|e| e.kind == EdgeKind::Data));
}

#[test]
fn acceptance_produces_a_fully_specified_edge() {
    let verdict = validate_connection(&ProposedConnection::new("s", "a"), []);
    let ConnectionVerdict::Accepted(edge) = verdict else {
        panic!("fresh execution link must be accepted");
    };
    assert!(edge.id.starts_with("edge-"));
    assert_eq!(edge.source_handle, DEFAULT_SOURCE_HANDLE);
    assert_eq!(edge.target_handle, DEFAULT_TARGET_HANDLE);
    assert_eq!(edge.kind, EdgeKind::Execution);
    assert!(!edge.connected, "connectivity is pending the next recompute");
}

#[test]
fn generated_edge_ids_never_collide() {
    let mut ids = std::collections::HashSet::new();
    for _ in 0..64 {
        let edge = validate_connection(&ProposedConnection::new("s", "a"), [])
            .into_result()
            .unwrap();
        assert!(ids.insert(edge.id));
    }
}

#[test]
fn rejection_text_is_user_presentable() {
    let taken = exec_edge("e", "a", "b");
    let reason = validate_connection(&ProposedConnection::new("a", "c"), [&taken])
        .into_result()
        .unwrap_err();
    assert_eq!(
        reason.to_string(),
        "this node already has an outgoing execution connection"
    );
}

#[test]
fn proposal_deserializes_from_ui_gesture_json() {
    let proposed: ProposedConnection = serde_json::from_str(
        r#"{"source": "v1", "target": "m", "sourceHandle": "value", "targetHandle": "subject"}"#,
    )
    .unwrap();
    assert_eq!(proposed.source_handle.as_deref(), Some("value"));

    // Handle ids are optional on the wire.
    let bare: ProposedConnection =
        serde_json::from_str(r#"{"source": "s", "target": "a"}"#).unwrap();
    assert_eq!(bare.normalize().source_handle, DEFAULT_SOURCE_HANDLE);
}
