//! Batch experiments — many independent runs at once.
//!
//! Each run builds its own scheduler, pool, queue, and generator inside a
//! blocking task; nothing is shared between runs.

use serde::Serialize;
use tokio::task::JoinSet;
use tracing::{debug, info};

use loadsim_core::{PolicyKind, Scheduler, SchedulerConfig};
use loadsim_report::{Fanout, RunSummary};

use crate::admission::{ArrivalConfig, RandomArrivals};
use crate::error::{SimError, SimResult};
use crate::runner::Simulation;

/// Everything needed to reproduce one run.
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub scheduler: SchedulerConfig,
    pub arrivals: ArrivalConfig,
    pub policy: PolicyKind,
}

impl RunPlan {
    /// `count` copies of this plan with seeds `seed_base..seed_base + count`.
    pub fn seeded(&self, count: usize, seed_base: u64) -> Vec<RunPlan> {
        (0..count as u64)
            .map(|offset| {
                let mut plan = self.clone();
                plan.arrivals.seed = seed_base.wrapping_add(offset);
                plan
            })
            .collect()
    }
}

/// Result of one run in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchOutcome {
    pub seed: u64,
    pub summary: RunSummary,
}

/// Run a single plan to completion on the current thread.
pub fn run_plan(plan: RunPlan) -> SimResult<BatchOutcome> {
    let seed = plan.arrivals.seed;
    let scheduler = Scheduler::new(plan.scheduler.clone())?
        .with_assignment_policy(plan.policy.build());
    let source = RandomArrivals::new(plan.arrivals, plan.scheduler.initial_servers)?;
    let summary = Simulation::new(scheduler, source).run(&mut Fanout::new())?;
    debug!(seed, ticks = summary.ticks, "batch run finished");
    Ok(BatchOutcome { seed, summary })
}

/// Run every plan concurrently. Outcomes come back in plan order.
pub async fn run_batch(plans: Vec<RunPlan>) -> SimResult<Vec<BatchOutcome>> {
    let total = plans.len();
    info!(runs = total, "batch starting");

    let mut set = JoinSet::new();
    for (index, plan) in plans.into_iter().enumerate() {
        set.spawn_blocking(move || run_plan(plan).map(|outcome| (index, outcome)));
    }

    let mut outcomes = Vec::with_capacity(total);
    while let Some(joined) = set.join_next().await {
        let (index, outcome) = joined.map_err(|e| SimError::Join(e.to_string()))??;
        outcomes.push((index, outcome));
    }
    outcomes.sort_by_key(|(index, _)| *index);

    info!(runs = total, "batch finished");
    Ok(outcomes.into_iter().map(|(_, outcome)| outcome).collect())
}
