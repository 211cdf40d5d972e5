//! The run loop.

use tracing::info;

use loadsim_core::Scheduler;
use loadsim_report::{AdmissionKind, RunStart, RunSummary, StatusSink, SummaryCollector};

use crate::admission::AdmissionSource;
use crate::error::SimResult;

/// One simulation run: a scheduler plus the source feeding it.
pub struct Simulation<A> {
    scheduler: Scheduler,
    source: A,
}

impl<A: AdmissionSource> Simulation<A> {
    pub fn new(scheduler: Scheduler, source: A) -> Self {
        Self { scheduler, source }
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Run to the configured horizon.
    ///
    /// Queues the initial burst, then for every tick admits that tick's
    /// arrivals and runs the scheduler once. Every event goes to `sink`;
    /// the returned summary is collected alongside. Sink errors abort the
    /// run.
    pub fn run(mut self, sink: &mut dyn StatusSink) -> SimResult<RunSummary> {
        let mut summary = SummaryCollector::new();

        for request in self.source.initial_burst() {
            summary.on_admit(&request, AdmissionKind::Burst)?;
            sink.on_admit(&request, AdmissionKind::Burst)?;
            self.scheduler.admit(request);
        }

        let start = RunStart {
            simulation_length: self.scheduler.simulation_length(),
            queue_size: self.scheduler.queue().len(),
            server_count: self.scheduler.pool().len(),
        };
        summary.on_start(&start)?;
        sink.on_start(&start)?;
        info!(
            policy = self.scheduler.policy_name(),
            ticks = start.simulation_length,
            queue = start.queue_size,
            "run starting"
        );

        while !self.scheduler.is_finished() {
            let tick = self.scheduler.current_tick();
            let queue_len = self.scheduler.queue().len();
            for request in self.source.arrivals(tick, queue_len) {
                summary.on_admit(&request, AdmissionKind::Arrival)?;
                sink.on_admit(&request, AdmissionKind::Arrival)?;
                self.scheduler.admit(request);
            }

            let snapshot = self.scheduler.tick();
            let servers = self.scheduler.pool().servers();
            summary.on_tick(&snapshot, servers)?;
            sink.on_tick(&snapshot, servers)?;
        }

        let result = summary.finish();
        sink.on_finish(&result)?;
        Ok(result)
    }
}
