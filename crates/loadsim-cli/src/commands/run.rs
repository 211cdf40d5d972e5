use std::io;

use anyhow::Context;

use loadsim_core::Scheduler;
use loadsim_report::{Fanout, JsonLines, RunLog, RunSummary, StatusLog, format_summary};
use loadsim_sim::{RandomArrivals, Simulation};

use super::{RunArgs, Settings};

pub fn run(args: &RunArgs) -> anyhow::Result<()> {
    let settings = args.resolve(&mut io::stdin().lock())?;
    let summary = simulate(&settings)?;
    print_summary(&summary, &args.format)
}

/// Build the scheduler, source, and sinks for `settings` and run to the
/// horizon.
pub fn simulate(settings: &Settings) -> anyhow::Result<RunSummary> {
    let scheduler = Scheduler::new(settings.scheduler.clone())?
        .with_assignment_policy(settings.policy.build());
    let source = RandomArrivals::new(
        settings.arrivals.clone(),
        settings.scheduler.initial_servers,
    )?;

    let mut sinks = Fanout::new().with(Box::new(
        StatusLog::new(settings.status_every).with_per_server(settings.per_server),
    ));
    if let Some(path) = &settings.log_file {
        let log = RunLog::create(path)
            .with_context(|| format!("creating run log {}", path.display()))?;
        sinks.push(Box::new(log));
    }
    if let Some(path) = &settings.snapshots {
        let stream = JsonLines::create(path)
            .with_context(|| format!("creating snapshot file {}", path.display()))?;
        sinks.push(Box::new(stream));
    }

    Ok(Simulation::new(scheduler, source).run(&mut sinks)?)
}

fn print_summary(summary: &RunSummary, format: &str) -> anyhow::Result<()> {
    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(summary)?);
        }
        _ => {
            print!("{}", format_summary(summary));
        }
    }
    Ok(())
}
