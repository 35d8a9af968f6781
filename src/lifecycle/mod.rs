//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Ping data store (fatal if unreachable) → Signing secret → Router
//!     → Spawn listener task → Settle delay → Running
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Draining → race(cleanup, deadline)
//!     → Stop accepting → Let in-flight requests finish → Stopped
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Phases are linear: Initializing → Running → Draining → Stopped
//! - Only an unreachable store at startup is fatal
//! - Shutdown has a deadline: cleanup still running after it is abandoned

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::{drain, DrainOutcome, Shutdown};
pub use startup::{Server, StartupError};

/// Where the process is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Initializing,
    Running,
    Draining,
    Stopped,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Initializing => "initializing",
            Phase::Running => "running",
            Phase::Draining => "draining",
            Phase::Stopped => "stopped",
        }
    }
}
