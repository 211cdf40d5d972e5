//! Scheduler — the per-tick state machine.
//!
//! Every call to [`Scheduler::tick`] runs the same phases in a fixed order:
//!
//! ```text
//! assign    drain the queue head into idle servers until either runs out
//! progress  age busy servers by one; finished servers go idle
//! resize    grow or shrink the pool by at most one server
//! advance   current_tick += 1
//! ```
//!
//! Admission happens between ticks through [`Scheduler::admit`]. A server
//! freed during progress is not eligible for work until the next tick's
//! assign phase.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::balancer::{AssignmentPolicy, FirstIdle};
use crate::config::SchedulerConfig;
use crate::error::ConfigResult;
use crate::pool::ServerPool;
use crate::queue::RequestQueue;
use crate::request::{Request, RequestId};
use crate::scaler::{ResizePolicy, ScaleDecision, ScaleInputs, ThresholdScaler};

/// Discrete simulation time.
pub type Tick = u64;

/// State after one tick, handed to the reporting side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TickSnapshot {
    /// The tick that just ran (0-based).
    pub tick: Tick,
    pub queue_size: usize,
    pub server_count: usize,
    pub idle_count: usize,
    pub busy_count: usize,
    /// Requests moved from the queue to servers this tick.
    pub assigned: usize,
    /// Servers that finished their request this tick.
    pub completed: usize,
    pub decision: ScaleDecision,
    /// Request dropped because its server was removed by a shrink.
    pub abandoned: Option<RequestId>,
}

/// Drives one simulation run.
///
/// Owns its queue and pool exclusively; independent runs share nothing.
pub struct Scheduler {
    config: SchedulerConfig,
    queue: RequestQueue,
    pool: ServerPool,
    balancer: Box<dyn AssignmentPolicy>,
    scaler: Box<dyn ResizePolicy>,
    current_tick: Tick,
}

impl Scheduler {
    /// Create a scheduler with first-idle assignment and threshold scaling.
    pub fn new(config: SchedulerConfig) -> ConfigResult<Self> {
        config.validate()?;
        info!(
            servers = config.initial_servers,
            ticks = config.simulation_length,
            min_servers = config.min_servers,
            max_servers = config.max_servers,
            "scheduler created"
        );
        Ok(Self {
            queue: RequestQueue::new(),
            pool: ServerPool::new(config.initial_servers),
            balancer: Box::new(FirstIdle),
            scaler: Box::new(ThresholdScaler::from_config(&config)),
            current_tick: 0,
            config,
        })
    }

    /// Replace the assignment policy.
    pub fn with_assignment_policy(mut self, policy: Box<dyn AssignmentPolicy>) -> Self {
        self.balancer = policy;
        self
    }

    /// Replace the resize policy.
    pub fn with_resize_policy(mut self, policy: Box<dyn ResizePolicy>) -> Self {
        self.scaler = policy;
        self
    }

    /// Queue a request for assignment on the next tick.
    pub fn admit(&mut self, request: Request) {
        self.queue.enqueue(request);
    }

    /// Run one tick. Never fails; empty queues and pools are valid states.
    pub fn tick(&mut self) -> TickSnapshot {
        let tick = self.current_tick;

        let assigned = self.assign();
        let completed = self.pool.tick();
        let (decision, abandoned) = self.resize(tick);
        self.current_tick += 1;

        let snapshot = TickSnapshot {
            tick,
            queue_size: self.queue.len(),
            server_count: self.pool.len(),
            idle_count: self.pool.count_idle(),
            busy_count: self.pool.count_busy(),
            assigned,
            completed,
            decision,
            abandoned,
        };
        debug!(
            tick,
            queue = snapshot.queue_size,
            servers = snapshot.server_count,
            assigned,
            completed,
            decision = ?decision,
            "tick complete"
        );
        snapshot
    }

    // ── Phases ──────────────────────────────────────────────────────

    /// Greedily match the queue head against idle servers.
    fn assign(&mut self) -> usize {
        let mut assigned = 0;
        while let Some(&request) = self.queue.peek() {
            let Some(slot) = self.balancer.select(self.pool.servers()) else {
                break;
            };
            if self.pool.assign(slot, &request).is_none() {
                warn!(
                    policy = self.balancer.name(),
                    slot, "assignment policy picked a busy or missing slot"
                );
                break;
            }
            self.queue.dequeue();
            assigned += 1;
        }
        assigned
    }

    fn resize(&mut self, tick: Tick) -> (ScaleDecision, Option<RequestId>) {
        let inputs = ScaleInputs {
            tick,
            queue_len: self.queue.len(),
            pool_size: self.pool.len(),
        };
        match self.scaler.evaluate(&inputs) {
            ScaleDecision::Grow => {
                self.pool.grow();
                (ScaleDecision::Grow, None)
            }
            ScaleDecision::Shrink => match self.pool.shrink() {
                Some(server) => (ScaleDecision::Shrink, server.current_request()),
                None => (ScaleDecision::NoChange, None),
            },
            ScaleDecision::NoChange => (ScaleDecision::NoChange, None),
        }
    }

    // ── Read-only accessors ─────────────────────────────────────────

    pub fn queue(&self) -> &RequestQueue {
        &self.queue
    }

    pub fn pool(&self) -> &ServerPool {
        &self.pool
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Ticks run so far.
    pub fn current_tick(&self) -> Tick {
        self.current_tick
    }

    pub fn simulation_length(&self) -> u64 {
        self.config.simulation_length
    }

    /// Whether the configured horizon has been reached.
    ///
    /// Ticking past the horizon is allowed; this only tells the driver
    /// when to stop.
    pub fn is_finished(&self) -> bool {
        self.current_tick >= self.config.simulation_length
    }

    pub fn policy_name(&self) -> &'static str {
        self.balancer.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balancer::RoundRobin;
    use crate::error::ConfigError;
    use crate::server::Server;

    fn scheduler(servers: u32, min: u32, max: u32) -> Scheduler {
        Scheduler::new(SchedulerConfig::new(servers, 100, min, max)).unwrap()
    }

    #[test]
    fn zero_horizon_is_rejected() {
        let result = Scheduler::new(SchedulerConfig::new(2, 0, 1, 5));
        assert!(matches!(result, Err(ConfigError::ZeroHorizon)));
    }

    #[test]
    fn assignment_scenario() {
        let mut s = scheduler(2, 0, 10);
        s.admit(Request::with_duration(1, 3));
        s.admit(Request::with_duration(2, 1));

        let snap = s.tick();

        let servers = s.pool().servers();
        assert_eq!(servers[0].remaining_time(), 2);
        assert_eq!(servers[0].current_request(), Some(1));
        assert!(servers[0].is_busy());
        assert_eq!(servers[1].remaining_time(), 0);
        assert!(servers[1].is_idle());
        assert_eq!(snap.queue_size, 0);
        assert_eq!(snap.assigned, 2);
        assert_eq!(snap.completed, 1);
        assert_eq!(snap.decision, ScaleDecision::NoChange);
    }

    #[test]
    fn resize_scenario_shrinks_idle_pool() {
        let mut s = scheduler(5, 1, 5);
        let snap = s.tick();
        assert_eq!(snap.decision, ScaleDecision::Shrink);
        assert_eq!(s.pool().len(), 4);
        assert_eq!(snap.server_count, 4);
    }

    #[test]
    fn equal_thresholds_grow_exactly_once() {
        let mut s = scheduler(0, 2, 2);
        for id in 0..3 {
            s.admit(Request::with_duration(id, 5));
        }

        let snap = s.tick();
        assert_eq!(snap.queue_size, 3);
        assert_eq!(snap.decision, ScaleDecision::Grow);
        assert_eq!(s.pool().len(), 1);
    }

    #[test]
    fn freed_server_waits_for_next_tick() {
        let mut s = scheduler(1, 0, 10);
        s.admit(Request::with_duration(1, 1));
        s.admit(Request::with_duration(2, 1));

        let first = s.tick();
        assert_eq!(first.assigned, 1);
        assert_eq!(first.completed, 1);
        // The server went idle during progress but request 2 is still queued.
        assert_eq!(first.queue_size, 1);
        assert_eq!(first.idle_count, 1);

        let second = s.tick();
        assert_eq!(second.assigned, 1);
        assert_eq!(second.queue_size, 0);
    }

    #[test]
    fn idle_tick_only_advances_time() {
        let mut s = scheduler(3, 0, 10);
        let snap = s.tick();
        assert_eq!(snap.tick, 0);
        assert_eq!(s.current_tick(), 1);
        assert_eq!(s.pool().len(), 3);
        assert_eq!(s.pool().count_idle(), 3);
        assert!(s.queue().is_empty());
        assert_eq!(snap.decision, ScaleDecision::NoChange);
    }

    #[test]
    fn empty_pool_and_queue_is_valid() {
        let mut s = scheduler(0, 1, 5);
        let snap = s.tick();
        assert_eq!(snap.server_count, 0);
        assert_eq!(snap.decision, ScaleDecision::NoChange);
    }

    #[test]
    fn queue_is_drained_greedily() {
        let mut s = scheduler(3, 0, 10);
        for id in 0..5 {
            s.admit(Request::with_duration(id, 10));
        }
        let snap = s.tick();
        assert_eq!(snap.assigned, 3);
        assert_eq!(snap.queue_size, 2);
        assert_eq!(snap.busy_count, 3);
        assert_eq!(s.queue().peek().map(Request::id), Some(3));
    }

    #[test]
    fn shrink_reports_abandoned_request() {
        // Two servers, min 5: the queue is always below the low-water mark.
        let mut s = scheduler(2, 5, 10);
        s.admit(Request::with_duration(10, 50));
        s.admit(Request::with_duration(11, 50));

        let snap = s.tick();
        assert_eq!(snap.decision, ScaleDecision::Shrink);
        assert_eq!(snap.abandoned, Some(11));
        assert_eq!(s.pool().len(), 1);
        assert!(s.queue().is_empty());
    }

    #[test]
    fn grown_servers_take_work_next_tick() {
        let mut s = scheduler(0, 0, 1);
        s.admit(Request::with_duration(0, 4));
        s.admit(Request::with_duration(1, 4));

        let first = s.tick();
        assert_eq!(first.decision, ScaleDecision::Grow);
        assert_eq!(first.assigned, 0);

        let second = s.tick();
        assert_eq!(second.assigned, 1);
        assert_eq!(second.queue_size, 1);
        assert_eq!(s.pool().servers()[0].current_request(), Some(0));
    }

    #[test]
    fn round_robin_policy_spreads_work() {
        let mut s = scheduler(3, 0, 10).with_assignment_policy(Box::new(RoundRobin::new()));
        assert_eq!(s.policy_name(), "round-robin");

        s.admit(Request::with_duration(0, 1));
        s.tick();
        s.admit(Request::with_duration(1, 1));
        s.tick();

        // With first-idle both would land on slot 0; round-robin moves on.
        s.admit(Request::with_duration(2, 5));
        s.tick();
        let busy: Vec<_> = s
            .pool()
            .iter()
            .filter(|srv| srv.is_busy())
            .map(Server::id)
            .collect();
        assert_eq!(busy, vec![2]);
    }

    #[test]
    fn custom_resize_policy_is_used() {
        struct AlwaysGrow;
        impl ResizePolicy for AlwaysGrow {
            fn evaluate(&mut self, _inputs: &ScaleInputs) -> ScaleDecision {
                ScaleDecision::Grow
            }
        }

        let mut s = scheduler(1, 0, 10).with_resize_policy(Box::new(AlwaysGrow));
        s.tick();
        s.tick();
        assert_eq!(s.pool().len(), 3);
    }

    #[test]
    fn misbehaving_policy_cannot_overwrite_busy_server() {
        struct AlwaysSlotZero;
        impl AssignmentPolicy for AlwaysSlotZero {
            fn select(&mut self, _servers: &[Server]) -> Option<usize> {
                Some(0)
            }
            fn name(&self) -> &'static str {
                "slot-zero"
            }
        }

        let mut s = scheduler(2, 0, 10).with_assignment_policy(Box::new(AlwaysSlotZero));
        s.admit(Request::with_duration(0, 5));
        s.admit(Request::with_duration(1, 5));

        let snap = s.tick();
        assert_eq!(snap.assigned, 1);
        assert_eq!(snap.queue_size, 1);
        assert_eq!(s.pool().servers()[0].current_request(), Some(0));
    }

    #[test]
    fn finishes_at_horizon() {
        let mut s = Scheduler::new(SchedulerConfig::new(1, 3, 0, 10)).unwrap();
        let mut ticks = 0;
        while !s.is_finished() {
            s.tick();
            ticks += 1;
        }
        assert_eq!(ticks, 3);
        assert_eq!(s.current_tick(), 3);

        // Ticking beyond the horizon is still well defined.
        let extra = s.tick();
        assert_eq!(extra.tick, 3);
    }
}
