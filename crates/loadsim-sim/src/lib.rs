//! loadsim-sim — drives the scheduler through a run.
//!
//! The scheduler core is deterministic and never draws randomness. This
//! crate supplies the work (admission sources seeded explicitly), calls
//! `admit` and `tick` for the configured horizon, and forwards every event
//! to the reporting sinks.
//!
//! - [`RandomArrivals`] — initial burst plus per-tick random arrivals
//! - [`ScriptedArrivals`] — fixed requests at fixed ticks
//! - [`Simulation`] — the run loop
//! - [`run_batch`] — independent runs in parallel, one scheduler each

pub mod admission;
pub mod batch;
pub mod error;
pub mod runner;

pub use admission::{AdmissionSource, ArrivalConfig, RandomArrivals, ScriptedArrivals};
pub use batch::{BatchOutcome, RunPlan, run_batch, run_plan};
pub use error::{SimError, SimResult};
pub use runner::Simulation;
