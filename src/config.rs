use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

/// Runtime settings, read once at startup from
/// `<platform config dir>/gyrocast/config.toml`.
///
/// A missing file or missing keys fall back to the defaults, so a
/// config file only needs the values being overridden.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// TCP address the binary subscriber stream listens on.
    pub listen_addr: String,
    /// Bound on each subscriber's outbound entry queue. When the
    /// queue is full, new entries are dropped for that subscriber.
    pub queue_capacity: usize,
    /// Seconds before a stalled subscriber write is abandoned and the
    /// subscriber is dropped.
    pub write_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:3001".to_string(),
            queue_capacity: 30,
            write_timeout_secs: 10,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let Some(dir) = dirs::config_dir() else {
            tracing::warn!("No config directory on this platform, using defaults");
            return Ok(Self::default());
        };
        let path = dir.join("gyrocast").join("config.toml");
        if !path.exists() {
            tracing::info!("No config found, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config =
            toml::from_str(&contents).with_context(|| format!("parsing {}", path.display()))?;
        tracing::info!(?path, "Loaded config");
        Ok(config)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_secs(self.write_timeout_secs)
    }
}
