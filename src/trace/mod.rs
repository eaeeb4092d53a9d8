//! Best-effort execution trace reconstruction from run logs.
//!
//! The execution collaborator emits a flat, possibly out-of-order stream of
//! [`LogEntry`] records for each run. This module turns one run's batch into
//! a linear step/edge sequence suitable for display next to the canvas. It
//! is a visualization aid, not a source of truth: it does not claim to
//! reproduce the true control-flow graph, and it never fails on malformed
//! input: undecodable payloads degrade to opaque text and an empty batch
//! yields an empty view.
//!
//! Everything here is pure and re-entrant: a [`TraceReconstructor`] borrows
//! itself immutably, holds no per-run state, and can serve independent runs
//! from any worker. A single run's entries must arrive as one complete
//! batch; there is no streaming variant.
//!
//! # Quick Start
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use flowlattice::trace::{LogEntry, TraceReconstructor};
//!
//! let entries = vec![
//!     LogEntry::new("l1", Utc.timestamp_opt(1, 0).unwrap(), "processing")
//!         .with_node("agent-1", Some("ai-agent")),
//!     LogEntry::new("l2", Utc.timestamp_opt(3, 0).unwrap(), "completed")
//!         .with_node("email-1", Some("email-send")),
//! ];
//!
//! let view = TraceReconstructor::new().reconstruct(&entries);
//! assert_eq!(view.steps.len(), 2);
//! assert_eq!(view.edges.len(), 1);
//! assert_eq!(view.edges[0].source, "agent-1");
//! ```

mod entry;
mod reconstruct;

pub use entry::{LogEntry, LogLevel, LogPage, MalformedPayload};
pub use reconstruct::{
    DefaultStepOrdering, EXECUTION_VOCABULARY, StepDetail, StepOrdering, TraceEdge,
    TraceOptions, TraceReconstructor, TraceStep, TraceView,
};
