//! Trace reconstruction: unordered log entries → ordered steps and edges.
//!
//! See the [module docs](super) for the contract. The pipeline:
//!
//! 1. Canonicalize the batch by `(timestamp, id)` so the outcome does not
//!    depend on the order entries arrived in.
//! 2. Discard entries with no node attribution.
//! 3. Group by node, dropping groups that are pure value nodes.
//! 4. Pick one representative entry per group: payload with `input`/`output`
//!    beats an execution-vocabulary message beats the earliest entry.
//! 5. Sort representatives by timestamp, breaking exact ties with a
//!    pluggable [`StepOrdering`] policy.
//! 6. Emit one step per representative and one edge per consecutive pair.

use chrono::{DateTime, Utc};
use rustc_hash::FxHashMap;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::entry::{LogEntry, LogLevel, LogPage};
use crate::types::NodeKind;

/// Message substrings that mark an entry as describing execution progress.
///
/// Matched case-insensitively anywhere in the message.
pub const EXECUTION_VOCABULARY: &[&str] = &[
    "processing",
    "executing",
    "executed",
    "running",
    "completed",
    "finished",
    "sending",
    "sent",
];

/// Tie-break policy for representatives sharing an exact timestamp.
///
/// The trace's kind-based ordering embeds domain knowledge into an
/// otherwise generic utility, so it is pluggable rather than hard-coded:
/// implement `rank` and hand the policy to
/// [`TraceReconstructor::with_ordering`]. Lower ranks sort earlier; equal
/// ranks keep canonical order.
pub trait StepOrdering: Send + Sync {
    fn rank(&self, kind: Option<NodeKind>) -> i8;
}

/// Default policy: activation kinds first, send-class steps late, terminal
/// steps last, everything else neutral.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultStepOrdering;

impl StepOrdering for DefaultStepOrdering {
    fn rank(&self, kind: Option<NodeKind>) -> i8 {
        match kind {
            Some(kind) if kind.supports_activation() => -1,
            Some(kind) if kind.is_end() => 2,
            Some(kind) if kind.is_send() => 1,
            _ => 0,
        }
    }
}

/// Display tunables for reconstruction.
#[derive(Clone, Copy, Debug)]
pub struct TraceOptions {
    /// Step labels are truncated to this many characters.
    pub max_label_len: usize,
}

impl Default for TraceOptions {
    fn default() -> Self {
        Self { max_label_len: 48 }
    }
}

/// Structured content extracted from a representative entry's payload.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepDetail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// Payload kept as opaque text when structured decoding failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

impl StepDetail {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.input.is_none() && self.output.is_none() && self.prompt.is_none() && self.raw.is_none()
    }
}

/// One reconstructed step; exactly one per surviving node group.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceStep {
    /// The node this step represents.
    pub node_id: String,
    pub kind: Option<NodeKind>,
    pub label: String,
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    /// Id of the representative log entry the step was built from.
    pub entry_id: String,
    pub detail: StepDetail,
}

/// Synthesized sequential edge between consecutive steps.
///
/// Display-only: it asserts adjacency in the reconstructed order, not an
/// edge in the authored graph.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceEdge {
    pub id: String,
    pub source: String,
    pub target: String,
}

/// Ordered steps plus the sequential edges joining them.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TraceView {
    pub steps: Vec<TraceStep>,
    pub edges: Vec<TraceEdge>,
}

impl TraceView {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Reconstructs one run's trace from its complete log batch.
///
/// Stateless between calls; safe to share and to run on any worker.
///
/// # Examples
///
/// ```rust
/// use flowlattice::trace::{DefaultStepOrdering, TraceOptions, TraceReconstructor};
///
/// let reconstructor = TraceReconstructor::with_ordering(DefaultStepOrdering)
///     .with_options(TraceOptions { max_label_len: 32 });
/// assert!(reconstructor.reconstruct(&[]).is_empty());
/// ```
pub struct TraceReconstructor {
    ordering: Box<dyn StepOrdering>,
    options: TraceOptions,
}

impl Default for TraceReconstructor {
    fn default() -> Self {
        Self::new()
    }
}

impl TraceReconstructor {
    /// Reconstructor with the default ordering policy and options.
    #[must_use]
    pub fn new() -> Self {
        Self::with_ordering(DefaultStepOrdering)
    }

    /// Reconstructor with a custom tie-break policy.
    #[must_use]
    pub fn with_ordering(ordering: impl StepOrdering + 'static) -> Self {
        Self {
            ordering: Box::new(ordering),
            options: TraceOptions::default(),
        }
    }

    /// Replaces the display options.
    #[must_use]
    pub fn with_options(mut self, options: TraceOptions) -> Self {
        self.options = options;
        self
    }

    /// Convenience wrapper over one fetched page.
    #[must_use]
    pub fn reconstruct_page(&self, page: &LogPage) -> TraceView {
        self.reconstruct(&page.data)
    }

    /// Builds the step/edge view for one run's complete batch.
    ///
    /// Deterministic in the entry *set*: any permutation of the same
    /// entries yields an identical view. An empty batch yields an empty
    /// view; nothing in here returns an error.
    #[must_use]
    pub fn reconstruct(&self, entries: &[LogEntry]) -> TraceView {
        // Canonical order makes grouping and "earliest" well-defined for
        // unordered input.
        let mut ordered: Vec<&LogEntry> =
            entries.iter().filter(|e| e.node_id.is_some()).collect();
        ordered.sort_by(|a, b| {
            a.timestamp
                .cmp(&b.timestamp)
                .then_with(|| a.id.cmp(&b.id))
        });

        let mut group_index: FxHashMap<&str, usize> = FxHashMap::default();
        let mut groups: Vec<(&str, Vec<&LogEntry>)> = Vec::new();
        for entry in ordered {
            let Some(node_id) = entry.node_id.as_deref() else {
                continue;
            };
            match group_index.get(node_id) {
                Some(&idx) => groups[idx].1.push(entry),
                None => {
                    group_index.insert(node_id, groups.len());
                    groups.push((node_id, vec![entry]));
                }
            }
        }

        let mut steps: Vec<TraceStep> = Vec::with_capacity(groups.len());
        for (node_id, group) in &groups {
            // Pure value nodes are data plumbing, not execution steps.
            let every_entry_is_value_only = group
                .iter()
                .all(|e| e.kind().is_some_and(|k| k.is_value_only()));
            if every_entry_is_value_only {
                continue;
            }
            let Some(representative) = self.representative(group) else {
                continue;
            };
            let kind = group.iter().find_map(|e| e.kind());
            steps.push(self.step_of(node_id, kind, representative));
        }

        steps.sort_by(|a, b| {
            a.timestamp
                .cmp(&b.timestamp)
                .then_with(|| self.ordering.rank(a.kind).cmp(&self.ordering.rank(b.kind)))
        });

        let edges = steps
            .windows(2)
            .map(|pair| TraceEdge {
                id: format!("trace-{}-{}", pair[0].node_id, pair[1].node_id),
                source: pair[0].node_id.clone(),
                target: pair[1].node_id.clone(),
            })
            .collect();

        TraceView { steps, edges }
    }

    /// Picks one entry to stand for the whole group.
    ///
    /// Priority: structured `input`/`output` payload, then an
    /// execution-vocabulary message, then the earliest entry.
    fn representative<'a>(&self, group: &[&'a LogEntry]) -> Option<&'a LogEntry> {
        for &entry in group {
            if let Ok(Some(Value::Object(map))) = entry.decoded_payload()
                && (map.contains_key("input") || map.contains_key("output"))
            {
                return Some(entry);
            }
        }
        for &entry in group {
            if matches_execution_vocabulary(&entry.message) {
                return Some(entry);
            }
        }
        group.first().copied()
    }

    fn step_of(&self, node_id: &str, kind: Option<NodeKind>, entry: &LogEntry) -> TraceStep {
        TraceStep {
            node_id: node_id.to_string(),
            kind,
            label: self.label_of(node_id, kind, entry),
            timestamp: entry.timestamp,
            level: entry.level,
            entry_id: entry.id.clone(),
            detail: detail_of(entry),
        }
    }

    fn label_of(&self, node_id: &str, kind: Option<NodeKind>, entry: &LogEntry) -> String {
        let message = entry.message.trim();
        let base = if !message.is_empty() {
            message
        } else if let Some(kind) = kind {
            kind.as_str()
        } else {
            node_id
        };
        truncate_label(base, self.options.max_label_len)
    }
}

/// Returns `true` if the message carries an execution-vocabulary term.
fn matches_execution_vocabulary(message: &str) -> bool {
    let lowered = message.to_lowercase();
    EXECUTION_VOCABULARY.iter().any(|term| lowered.contains(term))
}

fn detail_of(entry: &LogEntry) -> StepDetail {
    match entry.decoded_payload() {
        Ok(Some(Value::Object(map))) => StepDetail {
            input: map.get("input").cloned(),
            output: map.get("output").cloned(),
            prompt: map
                .get("prompt")
                .and_then(|v| v.as_str())
                .map(str::to_string),
            raw: None,
        },
        Ok(Some(other)) => StepDetail {
            raw: Some(other.to_string()),
            ..StepDetail::default()
        },
        Ok(None) => StepDetail::default(),
        Err(err) => {
            debug!(%err, "keeping undecodable payload as opaque text");
            StepDetail {
                raw: entry
                    .payload
                    .as_ref()
                    .and_then(|v| v.as_str())
                    .map(str::to_string),
                ..StepDetail::default()
            }
        }
    }
}

fn truncate_label(text: &str, max: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max).collect();
    if chars.next().is_some() {
        format!("{head}…")
    } else {
        head
    }
}
