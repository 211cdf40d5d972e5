//! Simulation configuration.
//!
//! [`SchedulerConfig`] is the validated, typed form the scheduler is built
//! from. [`SimulationFile`] is the on-disk `loadsim.toml`; its integers are
//! signed so that negative values produce a descriptive error instead of a
//! generic parse failure.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::balancer::PolicyKind;
use crate::error::{ConfigError, ConfigResult};

/// Default low-water mark when none is configured.
pub const DEFAULT_MIN_SERVERS: u32 = 1;
/// Default high-water mark when none is configured.
pub const DEFAULT_MAX_SERVERS: u32 = 10;

/// Scheduler construction parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Servers in the pool at tick 0 (ids `0..initial_servers`).
    pub initial_servers: u32,
    /// Number of ticks in the run. Must be greater than zero.
    pub simulation_length: u64,
    /// Shrink when the queue is shorter than this.
    pub min_servers: u32,
    /// Grow when the queue is longer than this.
    pub max_servers: u32,
    /// Ceiling on pool size. `None` leaves growth unbounded.
    #[serde(default)]
    pub max_pool_size: Option<u32>,
    /// Ticks to hold off after a grow or shrink.
    #[serde(default)]
    pub resize_cooldown_ticks: u64,
}

impl SchedulerConfig {
    pub fn new(
        initial_servers: u32,
        simulation_length: u64,
        min_servers: u32,
        max_servers: u32,
    ) -> Self {
        Self {
            initial_servers,
            simulation_length,
            min_servers,
            max_servers,
            max_pool_size: None,
            resize_cooldown_ticks: 0,
        }
    }

    /// Reject configurations the scheduler cannot run.
    ///
    /// `min_servers > max_servers` is accepted: the grow rule simply wins
    /// whenever both thresholds are crossed.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.simulation_length == 0 {
            return Err(ConfigError::ZeroHorizon);
        }
        if self.min_servers > self.max_servers {
            warn!(
                min_servers = self.min_servers,
                max_servers = self.max_servers,
                "min_servers exceeds max_servers; grow takes precedence"
            );
        }
        Ok(())
    }
}

// ── loadsim.toml ───────────────────────────────────────────────────

/// The `loadsim.toml` file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationFile {
    #[serde(default)]
    pub scheduler: SchedulerSection,
    #[serde(default)]
    pub admission: AdmissionSection,
    #[serde(default)]
    pub report: ReportSection,
}

/// `[scheduler]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerSection {
    pub initial_servers: Option<i64>,
    pub simulation_length: Option<i64>,
    pub min_servers: Option<i64>,
    pub max_servers: Option<i64>,
    pub max_pool_size: Option<i64>,
    pub resize_cooldown_ticks: Option<i64>,
    pub policy: Option<PolicyKind>,
}

/// `[admission]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmissionSection {
    pub seed: Option<u64>,
    /// Requests queued per initial server before tick 0.
    pub burst_per_server: Option<i64>,
    /// Chance, in percent, of one arrival per tick.
    pub arrival_percent: Option<i64>,
    /// Exclusive upper bound on synthesized processing times.
    pub max_processing_time: Option<i64>,
    /// Number arrivals from a counter instead of the current queue size.
    pub unique_ids: Option<bool>,
}

/// `[report]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSection {
    /// Log a status line every N ticks (0 disables).
    pub status_every: Option<i64>,
    /// Include one line per server in status output.
    pub per_server: Option<bool>,
    /// Plain-text run log.
    pub log_file: Option<PathBuf>,
    /// JSON-lines stream of tick snapshots.
    pub snapshots: Option<PathBuf>,
}

impl SimulationFile {
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// A starting-point file with every setting spelled out.
    pub fn scaffold() -> Self {
        Self {
            scheduler: SchedulerSection {
                initial_servers: Some(10),
                simulation_length: Some(10_000),
                min_servers: Some(i64::from(DEFAULT_MIN_SERVERS)),
                max_servers: Some(i64::from(DEFAULT_MAX_SERVERS)),
                max_pool_size: None,
                resize_cooldown_ticks: Some(0),
                policy: Some(PolicyKind::FirstIdle),
            },
            admission: AdmissionSection {
                seed: Some(0),
                burst_per_server: Some(100),
                arrival_percent: Some(1),
                max_processing_time: Some(100),
                unique_ids: Some(false),
            },
            report: ReportSection {
                status_every: Some(10),
                per_server: Some(false),
                log_file: Some(PathBuf::from("log.txt")),
                snapshots: None,
            },
        }
    }
}

impl SchedulerSection {
    /// Layer `over` on top of `self`; set fields in `over` win.
    pub fn merge(self, over: SchedulerSection) -> Self {
        Self {
            initial_servers: over.initial_servers.or(self.initial_servers),
            simulation_length: over.simulation_length.or(self.simulation_length),
            min_servers: over.min_servers.or(self.min_servers),
            max_servers: over.max_servers.or(self.max_servers),
            max_pool_size: over.max_pool_size.or(self.max_pool_size),
            resize_cooldown_ticks: over.resize_cooldown_ticks.or(self.resize_cooldown_ticks),
            policy: over.policy.or(self.policy),
        }
    }

    /// Check every value and build a validated [`SchedulerConfig`].
    pub fn to_config(&self) -> ConfigResult<SchedulerConfig> {
        let initial_servers = self
            .initial_servers
            .ok_or(ConfigError::Missing("initial_servers"))?;
        let simulation_length = self
            .simulation_length
            .ok_or(ConfigError::Missing("simulation_length"))?;

        let config = SchedulerConfig {
            initial_servers: to_u32("initial_servers", initial_servers)?,
            simulation_length: to_u64("simulation_length", simulation_length)?,
            min_servers: self
                .min_servers
                .map(|v| to_u32("min_servers", v))
                .transpose()?
                .unwrap_or(DEFAULT_MIN_SERVERS),
            max_servers: self
                .max_servers
                .map(|v| to_u32("max_servers", v))
                .transpose()?
                .unwrap_or(DEFAULT_MAX_SERVERS),
            max_pool_size: self
                .max_pool_size
                .map(|v| to_u32("max_pool_size", v))
                .transpose()?,
            resize_cooldown_ticks: self
                .resize_cooldown_ticks
                .map(|v| to_u64("resize_cooldown_ticks", v))
                .transpose()?
                .unwrap_or(0),
        };
        config.validate()?;
        Ok(config)
    }
}

impl AdmissionSection {
    pub fn merge(self, over: AdmissionSection) -> Self {
        Self {
            seed: over.seed.or(self.seed),
            burst_per_server: over.burst_per_server.or(self.burst_per_server),
            arrival_percent: over.arrival_percent.or(self.arrival_percent),
            max_processing_time: over.max_processing_time.or(self.max_processing_time),
            unique_ids: over.unique_ids.or(self.unique_ids),
        }
    }
}

impl ReportSection {
    pub fn merge(self, over: ReportSection) -> Self {
        Self {
            status_every: over.status_every.or(self.status_every),
            per_server: over.per_server.or(self.per_server),
            log_file: over.log_file.or(self.log_file),
            snapshots: over.snapshots.or(self.snapshots),
        }
    }
}

/// Narrow a signed config value to `u32`.
pub fn to_u32(field: &'static str, value: i64) -> ConfigResult<u32> {
    if value < 0 {
        return Err(ConfigError::Negative { field, value });
    }
    u32::try_from(value).map_err(|_| ConfigError::OutOfRange {
        field,
        value,
        min: 0,
        max: i64::from(u32::MAX),
    })
}

/// Narrow a signed config value to `u64`.
pub fn to_u64(field: &'static str, value: i64) -> ConfigResult<u64> {
    u64::try_from(value).map_err(|_| ConfigError::Negative { field, value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_zero_horizon() {
        let config = SchedulerConfig::new(2, 0, 1, 5);
        assert!(matches!(config.validate(), Err(ConfigError::ZeroHorizon)));
    }

    #[test]
    fn validate_accepts_crossed_thresholds() {
        let config = SchedulerConfig::new(2, 10, 5, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_accepts_empty_initial_pool() {
        let config = SchedulerConfig::new(0, 10, 0, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_minimal_file() {
        let file = SimulationFile::from_toml_str(
            r#"
[scheduler]
initial_servers = 3
simulation_length = 50
"#,
        )
        .unwrap();
        let config = file.scheduler.to_config().unwrap();
        assert_eq!(config.initial_servers, 3);
        assert_eq!(config.simulation_length, 50);
        assert_eq!(config.min_servers, DEFAULT_MIN_SERVERS);
        assert_eq!(config.max_servers, DEFAULT_MAX_SERVERS);
        assert_eq!(config.max_pool_size, None);
        assert_eq!(file.admission, AdmissionSection::default());
    }

    #[test]
    fn parse_policy_name() {
        let file = SimulationFile::from_toml_str(
            r#"
[scheduler]
policy = "round-robin"
"#,
        )
        .unwrap();
        assert_eq!(file.scheduler.policy, Some(PolicyKind::RoundRobin));
    }

    #[test]
    fn negative_values_are_named() {
        let section = SchedulerSection {
            initial_servers: Some(-3),
            simulation_length: Some(10),
            ..Default::default()
        };
        let err = section.to_config().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Negative {
                field: "initial_servers",
                value: -3
            }
        ));
        assert_eq!(err.to_string(), "initial_servers must not be negative (got -3)");
    }

    #[test]
    fn negative_horizon_is_rejected() {
        let section = SchedulerSection {
            initial_servers: Some(1),
            simulation_length: Some(-1),
            ..Default::default()
        };
        assert!(matches!(
            section.to_config(),
            Err(ConfigError::Negative {
                field: "simulation_length",
                ..
            })
        ));
    }

    #[test]
    fn zero_horizon_from_file_is_rejected() {
        let section = SchedulerSection {
            initial_servers: Some(1),
            simulation_length: Some(0),
            ..Default::default()
        };
        assert!(matches!(section.to_config(), Err(ConfigError::ZeroHorizon)));
    }

    #[test]
    fn missing_required_fields() {
        let section = SchedulerSection {
            simulation_length: Some(10),
            ..Default::default()
        };
        assert!(matches!(
            section.to_config(),
            Err(ConfigError::Missing("initial_servers"))
        ));
    }

    #[test]
    fn oversized_value_is_out_of_range() {
        assert!(matches!(
            to_u32("max_servers", i64::from(u32::MAX) + 1),
            Err(ConfigError::OutOfRange { field: "max_servers", .. })
        ));
    }

    #[test]
    fn merge_prefers_override() {
        let base = SchedulerSection {
            initial_servers: Some(4),
            simulation_length: Some(100),
            min_servers: Some(2),
            ..Default::default()
        };
        let over = SchedulerSection {
            initial_servers: Some(8),
            ..Default::default()
        };
        let merged = base.merge(over);
        assert_eq!(merged.initial_servers, Some(8));
        assert_eq!(merged.simulation_length, Some(100));
        assert_eq!(merged.min_servers, Some(2));
    }

    #[test]
    fn scaffold_renders_and_parses_back() {
        let rendered = SimulationFile::scaffold().to_toml_string().unwrap();
        assert!(rendered.contains("[scheduler]"));
        assert!(rendered.contains("first-idle"));

        let parsed = SimulationFile::from_toml_str(&rendered).unwrap();
        let config = parsed.scheduler.to_config().unwrap();
        assert_eq!(config.initial_servers, 10);
        assert_eq!(parsed.report.log_file, Some(PathBuf::from("log.txt")));
    }

    #[test]
    fn from_file_reads_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("loadsim.toml");
        std::fs::write(
            &path,
            "[scheduler]\ninitial_servers = 2\nsimulation_length = 5\n",
        )
        .unwrap();

        let file = SimulationFile::from_file(&path).unwrap();
        assert_eq!(file.scheduler.initial_servers, Some(2));

        let missing = SimulationFile::from_file(&dir.path().join("nope.toml"));
        assert!(matches!(missing, Err(ConfigError::Read(_))));
    }
}
