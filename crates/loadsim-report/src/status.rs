//! Periodic status lines through `tracing`.

use tracing::info;

use loadsim_core::{Server, TickSnapshot};

use crate::error::ReportResult;
use crate::sink::{RunStart, StatusSink};
use crate::summary::RunSummary;

/// Logs a status line every `every` ticks, starting with tick 0.
#[derive(Debug, Clone)]
pub struct StatusLog {
    every: u64,
    per_server: bool,
    horizon: u64,
}

impl StatusLog {
    /// `every == 0` disables the periodic lines; start and finish are
    /// still logged.
    pub fn new(every: u64) -> Self {
        Self {
            every,
            per_server: false,
            horizon: 0,
        }
    }

    /// Also log each server as active or inactive.
    pub fn with_per_server(mut self, per_server: bool) -> Self {
        self.per_server = per_server;
        self
    }

    /// Whether `tick` gets a status line.
    pub fn is_due(&self, tick: u64) -> bool {
        self.every > 0 && tick % self.every == 0
    }
}

impl StatusSink for StatusLog {
    fn on_start(&mut self, start: &RunStart) -> ReportResult<()> {
        self.horizon = start.simulation_length;
        info!(
            ticks = start.simulation_length,
            servers = start.server_count,
            queue = start.queue_size,
            "simulation started"
        );
        Ok(())
    }

    fn on_tick(&mut self, snapshot: &TickSnapshot, servers: &[Server]) -> ReportResult<()> {
        if !self.is_due(snapshot.tick) {
            return Ok(());
        }
        info!(
            time = snapshot.tick,
            horizon = self.horizon,
            servers = snapshot.server_count,
            idle = snapshot.idle_count,
            busy = snapshot.busy_count,
            queue = snapshot.queue_size,
            "load balancer status"
        );
        if self.per_server {
            for server in servers {
                let status = if server.is_busy() { "active" } else { "inactive" };
                info!(
                    server = server.id(),
                    status,
                    remaining = server.remaining_time(),
                    "server status"
                );
            }
        }
        Ok(())
    }

    fn on_finish(&mut self, summary: &RunSummary) -> ReportResult<()> {
        info!(
            ticks = summary.ticks,
            completed = summary.completed,
            abandoned = summary.abandoned,
            queue = summary.final_queue_size,
            servers = summary.final_server_count,
            "simulation finished"
        );
        Ok(())
    }
}
