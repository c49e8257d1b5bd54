use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// How output object keys are derived from each URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameMode {
    /// Lowercase hex SHA-1 of the canonical URL string.
    #[default]
    Sha1,
    /// Percent-escaped canonical URL string.
    Url,
    /// Host component only. Distinct paths/schemes on one host collide.
    Hostname,
}

impl FromStr for NameMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sha1" => Ok(NameMode::Sha1),
            "url" => Ok(NameMode::Url),
            "hostname" => Ok(NameMode::Hostname),
            other => Err(ConfigError::InvalidNameMode(other.to_string())),
        }
    }
}

/// Configuration rejected before any fetching begins.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("output_container is required and not set")]
    MissingOutputContainer,
    #[error("concurrency must be at least 1")]
    ZeroConcurrency,
    #[error("sleep_secs must be a finite, non-negative number (got {0})")]
    InvalidSleep(f64),
    #[error("invalid naming mode {0:?} (expected sha1, url, or hostname)")]
    InvalidNameMode(String),
}

/// Raw configuration loaded from `~/.config/warcget/config.toml` and CLI
/// overrides. Validate into [`Config`] before running a job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    /// Container the archive objects are written to. Required.
    #[serde(default)]
    pub output_container: Option<String>,
    /// Maximum fetch/encode/persist tasks in flight at once.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Pause between task admissions, in seconds. Throttles the rate of new
    /// task starts when hitting one server repeatedly.
    #[serde(default)]
    pub sleep_secs: f64,
    /// Object naming mode.
    #[serde(default)]
    pub naming: NameMode,
    /// Per-request deadline in seconds, covering redirects.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_concurrency() -> usize {
    3
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            output_container: None,
            concurrency: default_concurrency(),
            sleep_secs: 0.0,
            naming: NameMode::default(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl JobConfig {
    /// Validates into the immutable [`Config`] a run consumes. Fails fast on
    /// missing output container, zero concurrency, or a bad sleep value.
    pub fn validate(self) -> Result<Config, ConfigError> {
        let output_container = match self.output_container {
            Some(c) if !c.is_empty() => c,
            _ => return Err(ConfigError::MissingOutputContainer),
        };
        if self.concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if !self.sleep_secs.is_finite() || self.sleep_secs < 0.0 {
            return Err(ConfigError::InvalidSleep(self.sleep_secs));
        }
        Ok(Config {
            output_container,
            concurrency: self.concurrency,
            sleep_interval: Duration::from_secs_f64(self.sleep_secs),
            naming: self.naming,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        })
    }
}

/// Validated run configuration. Constructed once at the process boundary,
/// immutable for the lifetime of a run.
#[derive(Debug, Clone)]
pub struct Config {
    pub output_container: String,
    pub concurrency: usize,
    pub sleep_interval: Duration,
    pub naming: NameMode,
    pub request_timeout: Duration,
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("warcget")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
/// The default file has no output_container; validation reports it.
pub fn load_or_init() -> Result<JobConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = JobConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: JobConfig = toml::from_str(&data)?;
    Ok(cfg)
}
