use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::submit::DeliveryLimits;

/// Optional request timeouts (section `[limits]` in config.toml).
///
/// Absent values mean no timeout: a hung collector is waited on
/// indefinitely, like the hand-off page does.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Connect timeout in seconds.
    pub connect_timeout_secs: Option<u64>,
    /// Whole-request timeout in seconds.
    pub request_timeout_secs: Option<u64>,
}

/// Global configuration loaded from `~/.config/handoff/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandoffConfig {
    /// Collector endpoint the payload is POSTed to.
    pub endpoint: String,
    /// Loopback port the `listen` collector binds.
    pub listen_port: u16,
    /// Optional request timeouts; if missing, requests are not timed out.
    #[serde(default)]
    pub limits: Option<LimitsConfig>,
}

impl Default for HandoffConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8000/".to_string(),
            listen_port: 8000,
            limits: None,
        }
    }
}

impl HandoffConfig {
    /// Timeouts for the submission request, as configured.
    pub fn delivery_limits(&self) -> DeliveryLimits {
        let limits = match &self.limits {
            Some(l) => l,
            None => return DeliveryLimits::default(),
        };
        DeliveryLimits {
            connect_timeout: limits.connect_timeout_secs.map(Duration::from_secs),
            total_timeout: limits.request_timeout_secs.map(Duration::from_secs),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("handoff")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<HandoffConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = HandoffConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(&path)
}

/// Load configuration from an explicit path.
pub fn load_from(path: &Path) -> Result<HandoffConfig> {
    let data = fs::read_to_string(path)?;
    let cfg: HandoffConfig = toml::from_str(&data)?;
    Ok(cfg)
}
