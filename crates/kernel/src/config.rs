use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Rates and bounds for the presentation loop. Fixed once the loop is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopConfig {
    /// Fixed simulation steps per second.
    pub update_rate_hz: u32,
    /// Target rendered frames per second.
    pub render_rate_hz: u32,
    /// Upper bound on catch-up updates between two renders.
    pub max_updates_per_render: u32,
    /// Longest single pause taken by the default pacer while idling.
    pub idle_granularity_micros: u64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            update_rate_hz: 30,
            render_rate_hz: 60,
            max_updates_per_render: 5,
            idle_granularity_micros: 1_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("update_rate_hz must be greater than zero")]
    ZeroUpdateRate,
    #[error("render_rate_hz must be greater than zero")]
    ZeroRenderRate,
    #[error("max_updates_per_render must be at least 1")]
    ZeroCatchUp,
    #[error("idle_granularity_micros must be greater than zero")]
    ZeroGranularity,
}

impl LoopConfig {
    pub fn new(update_rate_hz: u32, render_rate_hz: u32, max_updates_per_render: u32) -> Self {
        Self {
            update_rate_hz,
            render_rate_hz,
            max_updates_per_render,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.update_rate_hz == 0 {
            return Err(ConfigError::ZeroUpdateRate);
        }
        if self.render_rate_hz == 0 {
            return Err(ConfigError::ZeroRenderRate);
        }
        if self.max_updates_per_render == 0 {
            return Err(ConfigError::ZeroCatchUp);
        }
        if self.idle_granularity_micros == 0 {
            return Err(ConfigError::ZeroGranularity);
        }
        Ok(())
    }

    pub fn idle_granularity(&self) -> Duration {
        Duration::from_micros(self.idle_granularity_micros)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_thirty_sixty_five() {
        let cfg = LoopConfig::default();
        assert_eq!(cfg.update_rate_hz, 30);
        assert_eq!(cfg.render_rate_hz, 60);
        assert_eq!(cfg.max_updates_per_render, 5);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_zero_rates() {
        assert_eq!(
            LoopConfig::new(0, 60, 5).validate(),
            Err(ConfigError::ZeroUpdateRate)
        );
        assert_eq!(
            LoopConfig::new(30, 0, 5).validate(),
            Err(ConfigError::ZeroRenderRate)
        );
        assert_eq!(
            LoopConfig::new(30, 60, 0).validate(),
            Err(ConfigError::ZeroCatchUp)
        );
    }

    #[test]
    fn rejects_zero_granularity() {
        let cfg = LoopConfig {
            idle_granularity_micros: 0,
            ..LoopConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroGranularity));
    }

    #[test]
    fn granularity_converts_to_duration() {
        assert_eq!(
            LoopConfig::default().idle_granularity(),
            Duration::from_millis(1)
        );
    }
}
