//! Admission sources — where requests come from.
//!
//! All randomness lives here, in a generator seeded from an explicit
//! `u64`, so a run is fully reproducible from its config and seed.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use loadsim_core::config::{to_u32, to_u64};
use loadsim_core::{AdmissionSection, ConfigError, ConfigResult, Request, RequestId, Tick};

/// Exclusive upper bound for request tags.
const TAG_RANGE: u8 = 100;

/// Supplies requests to the driver.
pub trait AdmissionSource {
    /// Requests queued before the first tick.
    fn initial_burst(&mut self) -> Vec<Request> {
        Vec::new()
    }

    /// Requests arriving just before `tick` runs. `queue_len` is the queue
    /// size at that moment.
    fn arrivals(&mut self, tick: Tick, queue_len: usize) -> Vec<Request>;
}

/// Parameters for [`RandomArrivals`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrivalConfig {
    pub seed: u64,
    /// Requests queued per initial server before tick 0.
    pub burst_per_server: u32,
    /// Chance, in percent, that one request arrives on a tick.
    pub arrival_percent: u8,
    /// Exclusive upper bound on processing times. At least 1.
    pub max_processing_time: u32,
    /// Number arrivals from a running counter. When false an arrival takes
    /// the current queue size as its id, so ids may repeat.
    pub unique_ids: bool,
}

impl Default for ArrivalConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            burst_per_server: 100,
            arrival_percent: 1,
            max_processing_time: 100,
            unique_ids: false,
        }
    }
}

impl ArrivalConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.arrival_percent > 100 {
            return Err(ConfigError::OutOfRange {
                field: "arrival_percent",
                value: i64::from(self.arrival_percent),
                min: 0,
                max: 100,
            });
        }
        if self.max_processing_time == 0 {
            return Err(ConfigError::OutOfRange {
                field: "max_processing_time",
                value: 0,
                min: 1,
                max: i64::from(u32::MAX),
            });
        }
        Ok(())
    }

    /// Build from an `[admission]` table, defaulting unset fields.
    pub fn from_section(section: &AdmissionSection) -> ConfigResult<Self> {
        let defaults = Self::default();
        let arrival_percent = match section.arrival_percent {
            Some(value) => {
                let value = to_u64("arrival_percent", value)?;
                u8::try_from(value)
                    .ok()
                    .filter(|p| *p <= 100)
                    .ok_or(ConfigError::OutOfRange {
                        field: "arrival_percent",
                        value: value as i64,
                        min: 0,
                        max: 100,
                    })?
            }
            None => defaults.arrival_percent,
        };
        let config = Self {
            seed: section.seed.unwrap_or(defaults.seed),
            burst_per_server: section
                .burst_per_server
                .map(|v| to_u32("burst_per_server", v))
                .transpose()?
                .unwrap_or(defaults.burst_per_server),
            arrival_percent,
            max_processing_time: section
                .max_processing_time
                .map(|v| to_u32("max_processing_time", v))
                .transpose()?
                .unwrap_or(defaults.max_processing_time),
            unique_ids: section.unique_ids.unwrap_or(defaults.unique_ids),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Initial burst plus Bernoulli arrivals, all from one seeded generator.
///
/// Processing times are drawn from `0..max_processing_time` and tags from
/// `0..100`.
#[derive(Debug, Clone)]
pub struct RandomArrivals {
    config: ArrivalConfig,
    rng: StdRng,
    initial_servers: u32,
    next_id: RequestId,
}

impl RandomArrivals {
    pub fn new(config: ArrivalConfig, initial_servers: u32) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self {
            rng: StdRng::seed_from_u64(config.seed),
            config,
            initial_servers,
            next_id: 0,
        })
    }

    pub fn config(&self) -> &ArrivalConfig {
        &self.config
    }

    fn synthesize(&mut self, id: RequestId) -> Request {
        let processing_time = self.rng.gen_range(0..self.config.max_processing_time);
        let tag_a = self.rng.gen_range(0..TAG_RANGE);
        let tag_b = self.rng.gen_range(0..TAG_RANGE);
        Request::new(id, processing_time, tag_a, tag_b)
    }
}

impl AdmissionSource for RandomArrivals {
    fn initial_burst(&mut self) -> Vec<Request> {
        let count = u64::from(self.initial_servers) * u64::from(self.config.burst_per_server);
        let burst: Vec<Request> = (0..count).map(|id| self.synthesize(id)).collect();
        self.next_id = count;
        burst
    }

    fn arrivals(&mut self, _tick: Tick, queue_len: usize) -> Vec<Request> {
        if self.rng.gen_range(0..100u8) >= self.config.arrival_percent {
            return Vec::new();
        }
        let id = if self.config.unique_ids {
            let id = self.next_id;
            self.next_id += 1;
            id
        } else {
            queue_len as RequestId
        };
        vec![self.synthesize(id)]
    }
}

/// Fixed requests at fixed ticks, for tests and replays.
#[derive(Debug, Clone, Default)]
pub struct ScriptedArrivals {
    initial: Vec<Request>,
    schedule: BTreeMap<Tick, Vec<Request>>,
}

impl ScriptedArrivals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_initial(mut self, requests: impl IntoIterator<Item = Request>) -> Self {
        self.initial.extend(requests);
        self
    }

    /// Admit `request` just before `tick` runs.
    pub fn at(mut self, tick: Tick, request: Request) -> Self {
        self.schedule.entry(tick).or_default().push(request);
        self
    }

    /// Requests not yet handed out.
    pub fn pending(&self) -> usize {
        self.initial.len() + self.schedule.values().map(Vec::len).sum::<usize>()
    }
}

impl AdmissionSource for ScriptedArrivals {
    fn initial_burst(&mut self) -> Vec<Request> {
        std::mem::take(&mut self.initial)
    }

    fn arrivals(&mut self, tick: Tick, _queue_len: usize) -> Vec<Request> {
        self.schedule.remove(&tick).unwrap_or_default()
    }
}
