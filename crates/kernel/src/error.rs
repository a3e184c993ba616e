use std::fmt;

use crate::config::ConfigError;

/// Which collaborator call was in flight when the loop failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Init,
    Update,
    Render,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Init => "init",
            Phase::Update => "update",
            Phase::Render => "render",
        })
    }
}

/// Errors surfaced by the game loop.
///
/// Scheduling arithmetic never fails; everything here originates from
/// lifecycle misuse, the OS, or a collaborator.
#[derive(Debug, thiserror::Error)]
pub enum LoopError {
    #[error("game loop is already running")]
    AlreadyRunning,
    #[error("invalid loop config: {0}")]
    Config(#[from] ConfigError),
    #[error("{phase} failed at tick {tick}: {source}")]
    Collaborator {
        phase: Phase,
        tick: u64,
        #[source]
        source: anyhow::Error,
    },
    #[error("failed to spawn loop thread: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("loop thread panicked: {0}")]
    Panicked(String),
    #[error("simulation is no longer available")]
    SimulationLost,
}

impl LoopError {
    pub(crate) fn collaborator(phase: Phase, tick: u64, source: anyhow::Error) -> Self {
        Self::Collaborator {
            phase,
            tick,
            source,
        }
    }

    /// The failing phase, if a collaborator ended the loop.
    pub fn phase(&self) -> Option<Phase> {
        match self {
            Self::Collaborator { phase, .. } => Some(*phase),
            _ => None,
        }
    }
}
