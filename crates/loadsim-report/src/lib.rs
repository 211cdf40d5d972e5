//! loadsim-report — consumers of scheduler snapshots.
//!
//! The scheduler performs no I/O. Everything that displays, logs, or
//! aggregates a run implements [`StatusSink`] and is fed by the driver:
//!
//! - [`StatusLog`] — tracing status lines every N ticks
//! - [`RunLog`] — plain-text run log (queue sizes and arrivals)
//! - [`JsonLines`] — one JSON object per tick snapshot
//! - [`SummaryCollector`] — aggregates a [`RunSummary`]
//! - [`Fanout`] — forwards every event to several sinks

pub mod error;
pub mod logfile;
pub mod sink;
pub mod snapshots;
pub mod status;
pub mod summary;

pub use error::{ReportError, ReportResult};
pub use logfile::RunLog;
pub use sink::{AdmissionKind, Fanout, RunStart, StatusSink};
pub use snapshots::JsonLines;
pub use status::StatusLog;
pub use summary::{RunSummary, SummaryCollector, format_summary};
