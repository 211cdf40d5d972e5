use std::io;

use loadsim_report::format_summary;
use loadsim_sim::{RunPlan, run_batch};

use super::RunArgs;

pub async fn batch(args: &RunArgs, runs: usize, seed_base: Option<u64>) -> anyhow::Result<()> {
    let settings = args.resolve(&mut io::stdin().lock())?;
    if settings.log_file.is_some() || settings.snapshots.is_some() {
        tracing::warn!("run log and snapshot files are not written in batch mode");
    }

    let plan = RunPlan {
        scheduler: settings.scheduler,
        arrivals: settings.arrivals,
        policy: settings.policy,
    };
    let seed_base = seed_base.unwrap_or(plan.arrivals.seed);
    let outcomes = run_batch(plan.seeded(runs, seed_base)).await?;

    match args.format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&outcomes)?);
        }
        _ => {
            for outcome in &outcomes {
                println!("seed {}", outcome.seed);
                print!("{}", format_summary(&outcome.summary));
            }
        }
    }
    Ok(())
}
