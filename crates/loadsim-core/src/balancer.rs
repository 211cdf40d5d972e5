//! Assignment policies — which idle server takes the next request.
//!
//! A policy only ever sees a read-only view of the pool and answers with a
//! slot index. The scheduler re-checks the slot before assigning, so a
//! misbehaving policy cannot overwrite a busy server.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::server::Server;

/// Picks the pool slot that receives the next queued request.
pub trait AssignmentPolicy: Send {
    /// Select an idle slot, or `None` if every server is busy.
    fn select(&mut self, servers: &[Server]) -> Option<usize>;

    fn name(&self) -> &'static str;
}

/// First idle server in pool order.
///
/// No load comparison; this is the reference policy.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstIdle;

impl AssignmentPolicy for FirstIdle {
    fn select(&mut self, servers: &[Server]) -> Option<usize> {
        servers.iter().position(Server::is_idle)
    }

    fn name(&self) -> &'static str {
        "first-idle"
    }
}

/// Round-robin over idle servers.
///
/// Scans from the slot after the previous pick and wraps around the
/// current pool length, so it adapts as the pool grows and shrinks.
#[derive(Debug, Default)]
pub struct RoundRobin {
    cursor: usize,
}

impl RoundRobin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the cursor to slot 0.
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Current cursor value (for diagnostics).
    pub fn current(&self) -> usize {
        self.cursor
    }
}

impl AssignmentPolicy for RoundRobin {
    fn select(&mut self, servers: &[Server]) -> Option<usize> {
        let count = servers.len();
        if count == 0 {
            return None;
        }
        let start = self.cursor % count;
        let slot = (0..count)
            .map(|offset| (start + offset) % count)
            .find(|&idx| servers[idx].is_idle())?;
        self.cursor = slot + 1;
        Some(slot)
    }

    fn name(&self) -> &'static str {
        "round-robin"
    }
}

/// Selectable built-in policies, as named in config files and on the CLI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyKind {
    #[default]
    FirstIdle,
    RoundRobin,
}

impl PolicyKind {
    pub fn build(self) -> Box<dyn AssignmentPolicy> {
        match self {
            Self::FirstIdle => Box::new(FirstIdle),
            Self::RoundRobin => Box::new(RoundRobin::new()),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::FirstIdle => "first-idle",
            Self::RoundRobin => "round-robin",
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first-idle" => Ok(Self::FirstIdle),
            "round-robin" => Ok(Self::RoundRobin),
            other => Err(format!(
                "unknown policy `{other}` (expected first-idle or round-robin)"
            )),
        }
    }
}
