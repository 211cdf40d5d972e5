//! Subcommand implementations and shared settings resolution.

pub mod batch;
pub mod init;
pub mod run;

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use loadsim_core::config::to_u64;
use loadsim_core::{
    AdmissionSection, PolicyKind, ReportSection, SchedulerConfig, SchedulerSection,
    SimulationFile,
};
use loadsim_sim::ArrivalConfig;

/// Flags shared by `run` and `batch`. Set flags override the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Path to a loadsim.toml file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Servers in the pool at tick 0
    #[arg(long, allow_negative_numbers = true)]
    pub servers: Option<i64>,
    /// Number of ticks to simulate
    #[arg(long, allow_negative_numbers = true)]
    pub ticks: Option<i64>,
    /// Shrink when the queue is shorter than this
    #[arg(long, allow_negative_numbers = true)]
    pub min: Option<i64>,
    /// Grow when the queue is longer than this
    #[arg(long, allow_negative_numbers = true)]
    pub max: Option<i64>,
    /// Never grow the pool beyond this many servers
    #[arg(long)]
    pub max_pool_size: Option<i64>,
    /// Ticks to wait after a resize before the next one
    #[arg(long)]
    pub cooldown: Option<i64>,
    /// Assignment policy: first-idle or round-robin
    #[arg(long)]
    pub policy: Option<PolicyKind>,
    /// Seed for request generation
    #[arg(long)]
    pub seed: Option<u64>,
    /// Chance, in percent, of one arrival per tick
    #[arg(long)]
    pub arrival_percent: Option<i64>,
    /// Requests queued per server before the first tick
    #[arg(long)]
    pub burst_per_server: Option<i64>,
    /// Number arrivals from a counter instead of the queue size
    #[arg(long)]
    pub unique_ids: bool,
    /// Log a status line every N ticks (0 disables)
    #[arg(long)]
    pub status_every: Option<i64>,
    /// Include per-server lines in status output
    #[arg(long)]
    pub per_server: bool,
    /// Write a plain-text run log to this path
    #[arg(long)]
    pub log_file: Option<PathBuf>,
    /// Write tick snapshots as JSON lines to this path
    #[arg(long)]
    pub snapshots: Option<PathBuf>,
    /// Summary output format: text or json
    #[arg(short, long, default_value = "text")]
    pub format: String,
}

/// Fully resolved settings for a run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub scheduler: SchedulerConfig,
    pub policy: PolicyKind,
    pub arrivals: ArrivalConfig,
    pub status_every: u64,
    pub per_server: bool,
    pub log_file: Option<PathBuf>,
    pub snapshots: Option<PathBuf>,
}

/// Status interval used when neither file nor flags set one.
const DEFAULT_STATUS_EVERY: u64 = 10;

impl RunArgs {
    /// Layer flags over the config file, prompting on `input` for the
    /// server and tick counts if still unset.
    pub fn resolve(&self, input: &mut impl BufRead) -> anyhow::Result<Settings> {
        let file = match &self.config {
            Some(path) => SimulationFile::from_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => SimulationFile::default(),
        };

        let mut scheduler = file.scheduler.merge(SchedulerSection {
            initial_servers: self.servers,
            simulation_length: self.ticks,
            min_servers: self.min,
            max_servers: self.max,
            max_pool_size: self.max_pool_size,
            resize_cooldown_ticks: self.cooldown,
            policy: self.policy,
        });
        if scheduler.initial_servers.is_none() {
            scheduler.initial_servers = Some(prompt(input, "Enter the number of servers: ")?);
        }
        if scheduler.simulation_length.is_none() {
            scheduler.simulation_length = Some(prompt(input, "Enter the simulation time: ")?);
        }

        let admission = file.admission.merge(AdmissionSection {
            seed: self.seed,
            burst_per_server: self.burst_per_server,
            arrival_percent: self.arrival_percent,
            max_processing_time: None,
            unique_ids: self.unique_ids.then_some(true),
        });
        let report = file.report.merge(ReportSection {
            status_every: self.status_every,
            per_server: self.per_server.then_some(true),
            log_file: self.log_file.clone(),
            snapshots: self.snapshots.clone(),
        });

        Ok(Settings {
            scheduler: scheduler.to_config().context("invalid scheduler settings")?,
            policy: scheduler.policy.unwrap_or_default(),
            arrivals: ArrivalConfig::from_section(&admission)
                .context("invalid admission settings")?,
            status_every: report
                .status_every
                .map(|v| to_u64("status_every", v))
                .transpose()?
                .unwrap_or(DEFAULT_STATUS_EVERY),
            per_server: report.per_server.unwrap_or(false),
            log_file: report.log_file,
            snapshots: report.snapshots,
        })
    }
}

fn prompt(input: &mut impl BufRead, label: &str) -> anyhow::Result<i64> {
    print!("{label}");
    std::io::stdout().flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let value = line.trim();
    value
        .parse()
        .with_context(|| format!("expected an integer, got `{value}`"))
}
