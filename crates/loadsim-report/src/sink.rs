//! The reporting interface the driver feeds during a run.

use serde::Serialize;

use loadsim_core::{Request, Server, TickSnapshot};

use crate::error::ReportResult;
use crate::summary::RunSummary;

/// How a request entered the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdmissionKind {
    /// Part of the initial burst queued before tick 0.
    Burst,
    /// Arrived during the run.
    Arrival,
}

/// State at the start of a run, after the initial burst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunStart {
    pub simulation_length: u64,
    pub queue_size: usize,
    pub server_count: usize,
}

/// Receives run events. Every method defaults to doing nothing.
pub trait StatusSink {
    fn on_start(&mut self, _start: &RunStart) -> ReportResult<()> {
        Ok(())
    }

    fn on_admit(&mut self, _request: &Request, _kind: AdmissionKind) -> ReportResult<()> {
        Ok(())
    }

    /// Called after every tick with the snapshot and the pool in order.
    fn on_tick(&mut self, _snapshot: &TickSnapshot, _servers: &[Server]) -> ReportResult<()> {
        Ok(())
    }

    fn on_finish(&mut self, _summary: &RunSummary) -> ReportResult<()> {
        Ok(())
    }
}

/// Forwards every event to each inner sink, in insertion order.
///
/// Stops at the first error.
#[derive(Default)]
pub struct Fanout {
    sinks: Vec<Box<dyn StatusSink + Send>>,
}

impl Fanout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sink: Box<dyn StatusSink + Send>) {
        self.sinks.push(sink);
    }

    pub fn with(mut self, sink: Box<dyn StatusSink + Send>) -> Self {
        self.push(sink);
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl StatusSink for Fanout {
    fn on_start(&mut self, start: &RunStart) -> ReportResult<()> {
        self.sinks.iter_mut().try_for_each(|s| s.on_start(start))
    }

    fn on_admit(&mut self, request: &Request, kind: AdmissionKind) -> ReportResult<()> {
        self.sinks.iter_mut().try_for_each(|s| s.on_admit(request, kind))
    }

    fn on_tick(&mut self, snapshot: &TickSnapshot, servers: &[Server]) -> ReportResult<()> {
        self.sinks
            .iter_mut()
            .try_for_each(|s| s.on_tick(snapshot, servers))
    }

    fn on_finish(&mut self, summary: &RunSummary) -> ReportResult<()> {
        self.sinks.iter_mut().try_for_each(|s| s.on_finish(summary))
    }
}
