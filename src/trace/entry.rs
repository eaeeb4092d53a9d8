//! Log entry shapes consumed from the log-source collaborator.
//!
//! The wire format is the log service's JSON (camelCase keys, kebab-case
//! node kinds, free-form payloads). Only [`LogEntry`] is a contract; the
//! engine never performs the fetch itself and treats everything inside an
//! entry as untrusted display data.

use chrono::{DateTime, Utc};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::types::NodeKind;

/// Severity of a log entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

/// One timestamped record from a run's log stream.
///
/// `node_id` and `node_kind` are optional: run-scoped diagnostics carry
/// neither, and the trace reconstructor discards those. `node_kind` arrives
/// as a raw string and is parsed tolerantly via [`LogEntry::kind`]: an
/// unknown kind means "no kind", never an error.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: String,
    #[serde(default)]
    pub node_id: Option<String>,
    #[serde(default)]
    pub node_kind: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub level: LogLevel,
    #[serde(default)]
    pub message: String,
    /// Structured payload; may embed `input`, `output`, or `prompt`.
    #[serde(default)]
    pub payload: Option<Value>,
}

impl LogEntry {
    /// Builds a run-scoped entry with no node attribution.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        timestamp: DateTime<Utc>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            node_id: None,
            node_kind: None,
            timestamp,
            level: LogLevel::default(),
            message: message.into(),
            payload: None,
        }
    }

    /// Attributes the entry to a node, optionally with its raw kind string.
    #[must_use]
    pub fn with_node(mut self, node_id: impl Into<String>, node_kind: Option<&str>) -> Self {
        self.node_id = Some(node_id.into());
        self.node_kind = node_kind.map(str::to_string);
        self
    }

    /// Attaches a payload value.
    #[must_use]
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Sets the severity.
    #[must_use]
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Parses the raw kind string, treating unknown kinds as absent.
    #[must_use]
    pub fn kind(&self) -> Option<NodeKind> {
        self.node_kind.as_deref().and_then(|raw| raw.parse().ok())
    }

    /// Decodes the payload into a structured value.
    ///
    /// String payloads are expected to hold embedded JSON (the execution
    /// service double-encodes some records); anything else is returned as
    /// is. The error is non-fatal by contract: callers keep the raw text
    /// and move on.
    pub fn decoded_payload(&self) -> Result<Option<Value>, MalformedPayload> {
        match &self.payload {
            None => Ok(None),
            Some(Value::String(raw)) => serde_json::from_str(raw).map(Some).map_err(|_| {
                MalformedPayload {
                    entry: self.id.clone(),
                }
            }),
            Some(value) => Ok(Some(value.clone())),
        }
    }
}

/// A string payload that does not hold structured JSON.
///
/// Non-fatal: trace reconstruction keeps the text opaque instead of
/// failing the run view.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("log payload for entry `{entry}` is not structured JSON")]
#[diagnostic(
    code(flowlattice::trace::malformed_payload),
    severity(Warning),
    help("The raw text is preserved on the step; nothing is lost.")
)]
pub struct MalformedPayload {
    pub entry: String,
}

/// Paginated query result shape produced by the log-source collaborator.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LogPage {
    pub data: Vec<LogEntry>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn wire_shape_round_trips() {
        let json = r#"{
            "id": "l1",
            "nodeId": "agent-1",
            "nodeKind": "ai-agent",
            "timestamp": "2026-03-01T12:00:00Z",
            "level": "warn",
            "message": "processing",
            "payload": {"output": "done"}
        }"#;
        let entry: LogEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.node_id.as_deref(), Some("agent-1"));
        assert_eq!(entry.kind(), Some(NodeKind::AiAgent));
        assert_eq!(entry.level, LogLevel::Warn);
    }

    #[test]
    fn unknown_kind_degrades_to_none() {
        let entry = LogEntry::new("l1", Utc.timestamp_opt(0, 0).unwrap(), "x")
            .with_node("n1", Some("quantum-leap"));
        assert_eq!(entry.kind(), None);
    }

    #[test]
    fn string_payload_with_embedded_json_decodes() {
        let entry = LogEntry::new("l1", Utc.timestamp_opt(0, 0).unwrap(), "x")
            .with_payload(json!("{\"output\": 42}"));
        let decoded = entry.decoded_payload().unwrap().unwrap();
        assert_eq!(decoded, json!({"output": 42}));
    }

    #[test]
    fn broken_string_payload_is_a_malformed_error() {
        let entry = LogEntry::new("l9", Utc.timestamp_opt(0, 0).unwrap(), "x")
            .with_payload(json!("{not json"));
        let err = entry.decoded_payload().unwrap_err();
        assert_eq!(err.entry, "l9");
    }
}
