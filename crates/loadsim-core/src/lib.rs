//! loadsim-core — the deterministic heart of the load balancer simulation.
//!
//! A bounded pool of servers drains a FIFO queue of requests one discrete
//! tick at a time, while a resize policy grows or shrinks the pool against
//! queue pressure. The core performs no I/O and draws no randomness:
//! requests arrive through [`Scheduler::admit`] and every
//! [`Scheduler::tick`] returns a [`TickSnapshot`] for the caller to report.
//!
//! # Architecture
//!
//! ```text
//! Scheduler
//!   ├── RequestQueue (FIFO of pending requests)
//!   ├── ServerPool (ordered servers, sole owner of server state)
//!   ├── AssignmentPolicy (FirstIdle by default, RoundRobin)
//!   └── ResizePolicy (ThresholdScaler: grow/shrink by one per tick)
//! ```

pub mod balancer;
pub mod config;
pub mod error;
pub mod pool;
pub mod queue;
pub mod request;
pub mod scaler;
pub mod scheduler;
pub mod server;

pub use balancer::{AssignmentPolicy, FirstIdle, PolicyKind, RoundRobin};
pub use config::{
    AdmissionSection, ReportSection, SchedulerConfig, SchedulerSection, SimulationFile,
};
pub use error::{ConfigError, ConfigResult};
pub use pool::ServerPool;
pub use queue::RequestQueue;
pub use request::{Request, RequestId};
pub use scaler::{ResizePolicy, ScaleDecision, ScaleInputs, ThresholdScaler};
pub use scheduler::{Scheduler, Tick, TickSnapshot};
pub use server::{Server, ServerId, ServerState};
