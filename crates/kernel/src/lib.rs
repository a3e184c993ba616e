//! Presentation loop kernel: fixed-rate simulation updates decoupled from
//! variable-rate rendering, on a dedicated thread.
//!
//! # Invariants
//! - Tick indices start at 0 each run and increase by one with no gaps.
//! - At most `max_updates_per_render` updates run between two renders.
//! - The interpolation fraction handed to `render` is within `[0, 1]`.
//! - Once `stop` returns, the loop thread has exited and makes no further calls.

pub mod clock;
pub mod config;
pub mod error;
pub mod game_loop;
pub mod metrics;
pub mod pacing;
pub mod scheduler;
pub mod signal;
pub mod simulation;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::{ConfigError, LoopConfig};
pub use error::{LoopError, Phase};
pub use game_loop::GameLoop;
pub use metrics::{LoopMetrics, MetricsSnapshot, Rates};
pub use pacing::{Pacer, SignalPacer, SleepPacer};
pub use scheduler::{Cycle, Scheduler};
pub use signal::ShutdownFlag;
pub use simulation::Simulation;

pub fn crate_info() -> &'static str {
    "olimu-kernel v0.1.0"
}
