//! Run summary — aggregate counters for one simulation run.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use loadsim_core::{Request, ScaleDecision, Server, TickSnapshot};

use crate::error::ReportResult;
use crate::sink::{AdmissionKind, RunStart, StatusSink};

/// Totals and extremes for a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub ticks: u64,
    /// Requests queued before tick 0.
    pub burst_requests: u64,
    /// Requests admitted during the run.
    pub arrivals: u64,
    pub assigned: u64,
    pub completed: u64,
    /// Requests lost when their server was removed.
    pub abandoned: u64,
    pub grows: u64,
    pub shrinks: u64,
    pub initial_queue_size: usize,
    pub final_queue_size: usize,
    pub peak_queue_size: usize,
    pub initial_server_count: usize,
    pub final_server_count: usize,
    pub peak_server_count: usize,
    pub min_server_count: usize,
}

/// Builds a [`RunSummary`] from run events.
#[derive(Debug, Default)]
pub struct SummaryCollector {
    summary: RunSummary,
}

impl SummaryCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Summary so far.
    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    pub fn finish(self) -> RunSummary {
        self.summary
    }
}

impl StatusSink for SummaryCollector {
    fn on_start(&mut self, start: &RunStart) -> ReportResult<()> {
        let s = &mut self.summary;
        s.initial_queue_size = start.queue_size;
        s.final_queue_size = start.queue_size;
        s.peak_queue_size = start.queue_size;
        s.initial_server_count = start.server_count;
        s.final_server_count = start.server_count;
        s.peak_server_count = start.server_count;
        s.min_server_count = start.server_count;
        Ok(())
    }

    fn on_admit(&mut self, _request: &Request, kind: AdmissionKind) -> ReportResult<()> {
        match kind {
            AdmissionKind::Burst => self.summary.burst_requests += 1,
            AdmissionKind::Arrival => self.summary.arrivals += 1,
        }
        Ok(())
    }

    fn on_tick(&mut self, snapshot: &TickSnapshot, _servers: &[Server]) -> ReportResult<()> {
        let s = &mut self.summary;
        s.ticks += 1;
        s.assigned += snapshot.assigned as u64;
        s.completed += snapshot.completed as u64;
        match snapshot.decision {
            ScaleDecision::Grow => s.grows += 1,
            ScaleDecision::Shrink => s.shrinks += 1,
            ScaleDecision::NoChange => {}
        }
        if snapshot.abandoned.is_some() {
            s.abandoned += 1;
        }
        s.final_queue_size = snapshot.queue_size;
        s.peak_queue_size = s.peak_queue_size.max(snapshot.queue_size);
        s.final_server_count = snapshot.server_count;
        s.peak_server_count = s.peak_server_count.max(snapshot.server_count);
        s.min_server_count = s.min_server_count.min(snapshot.server_count);
        Ok(())
    }
}

/// Render a summary as aligned text.
pub fn format_summary(summary: &RunSummary) -> String {
    let rows: [(&str, String); 11] = [
        ("ticks", summary.ticks.to_string()),
        (
            "requests",
            format!(
                "{} burst + {} arrivals",
                summary.burst_requests, summary.arrivals
            ),
        ),
        ("assigned", summary.assigned.to_string()),
        ("completed", summary.completed.to_string()),
        ("abandoned", summary.abandoned.to_string()),
        (
            "queue",
            format!(
                "{} -> {} (peak {})",
                summary.initial_queue_size, summary.final_queue_size, summary.peak_queue_size
            ),
        ),
        (
            "servers",
            format!(
                "{} -> {}",
                summary.initial_server_count, summary.final_server_count
            ),
        ),
        ("servers peak", summary.peak_server_count.to_string()),
        ("servers min", summary.min_server_count.to_string()),
        ("grows", summary.grows.to_string()),
        ("shrinks", summary.shrinks.to_string()),
    ];

    let mut out = String::from("Simulation summary\n");
    for (label, value) in rows {
        let _ = writeln!(out, "  {label:<14}{value}");
    }
    out
}
