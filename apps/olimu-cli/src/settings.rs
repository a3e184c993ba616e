use anyhow::Context;
use olimu_kernel::LoopConfig;
use std::path::Path;

/// Command-line overrides applied on top of the file (or default) config.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub update_rate: Option<u32>,
    pub render_rate: Option<u32>,
    pub max_updates: Option<u32>,
}

/// Load a YAML loop config, or the defaults when no path is given.
pub fn load(path: Option<&Path>) -> anyhow::Result<LoopConfig> {
    let Some(path) = path else {
        return Ok(LoopConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    parse(&text).with_context(|| format!("parsing config {}", path.display()))
}

pub fn parse(text: &str) -> anyhow::Result<LoopConfig> {
    let cfg: LoopConfig = serde_yaml::from_str(text)?;
    Ok(cfg)
}

pub fn apply(mut cfg: LoopConfig, overrides: &Overrides) -> LoopConfig {
    if let Some(hz) = overrides.update_rate {
        cfg.update_rate_hz = hz;
    }
    if let Some(hz) = overrides.render_rate {
        cfg.render_rate_hz = hz;
    }
    if let Some(n) = overrides.max_updates {
        cfg.max_updates_per_render = n;
    }
    cfg
}
