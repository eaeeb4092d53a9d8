mod common;

use common::*;
use proptest::prelude::*;
use serde_json::json;

use flowlattice::trace::{LogEntry, TraceReconstructor};

const KIND_POOL: &[Option<&str>] = &[
    Some("trigger"),
    Some("ai-agent"),
    Some("email-send"),
    Some("condition"),
    Some("variable"),
    Some("end"),
    Some("mystery-kind"),
    None,
];

const MESSAGE_POOL: &[&str] = &[
    "queued",
    "processing item",
    "executed",
    "completed",
    "waiting on upstream",
    "",
];

/// One entry described by pool indices; ids are assigned positionally so
/// every batch has unique, stable entry ids.
fn entry_strategy() -> impl Strategy<Value = (Option<usize>, usize, i64, usize, bool)> {
    (
        prop::option::of(0..5usize), // node index; None = run-scoped
        0..KIND_POOL.len(),
        0..6i64, // small timestamp range to force ties
        0..MESSAGE_POOL.len(),
        any::<bool>(), // attach an output payload
    )
}

fn materialize(batch: &[(Option<usize>, usize, i64, usize, bool)]) -> Vec<LogEntry> {
    batch
        .iter()
        .enumerate()
        .map(|(i, &(node, kind_idx, secs, message_idx, with_payload))| {
            let mut entry = LogEntry::new(format!("l{i}"), ts(secs), MESSAGE_POOL[message_idx]);
            if let Some(node_idx) = node {
                entry = entry.with_node(format!("n{node_idx}"), KIND_POOL[kind_idx]);
            }
            if with_payload {
                entry = entry.with_payload(json!({"output": i}));
            }
            entry
        })
        .collect()
}

proptest! {
    /// Any permutation of the same batch reconstructs identically.
    #[test]
    fn prop_reconstruction_is_order_independent(
        batch in prop::collection::vec(entry_strategy(), 0..24),
        permutation in prop::collection::vec(any::<u32>(), 0..24),
    ) {
        let entries = materialize(&batch);

        let mut shuffled = entries.clone();
        // Deterministic permutation driven by the generated keys.
        shuffled.sort_by_key(|entry| {
            let index: usize = entry.id[1..].parse().unwrap_or(0);
            permutation.get(index).copied().unwrap_or(0)
        });

        let reconstructor = TraceReconstructor::new();
        prop_assert_eq!(
            reconstructor.reconstruct(&entries),
            reconstructor.reconstruct(&shuffled)
        );
    }

    /// Structural guarantees that hold for every input batch.
    #[test]
    fn prop_view_shape_is_sound(batch in prop::collection::vec(entry_strategy(), 0..24)) {
        let entries = materialize(&batch);
        let view = TraceReconstructor::new().reconstruct(&entries);

        // One step per surviving node, edges join consecutive steps.
        prop_assert_eq!(view.edges.len(), view.steps.len().saturating_sub(1));
        for (edge, pair) in view.edges.iter().zip(view.steps.windows(2)) {
            prop_assert_eq!(edge.source.as_str(), pair[0].node_id.as_str());
            prop_assert_eq!(edge.target.as_str(), pair[1].node_id.as_str());
        }

        // Steps are timestamp-sorted and node ids never repeat.
        for pair in view.steps.windows(2) {
            prop_assert!(pair[0].timestamp <= pair[1].timestamp);
        }
        let mut seen = std::collections::HashSet::new();
        for step in &view.steps {
            prop_assert!(seen.insert(step.node_id.clone()));
            // Run-scoped entries can never become steps.
            prop_assert!(step.node_id.starts_with('n'));
        }
    }
}
