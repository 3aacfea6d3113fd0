//! Configuration management for the citation proof server

use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::artifacts::EvictionPolicy;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub documents: DocumentsConfig,
    pub artifacts: ArtifactConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Timeout for extraction and rendering
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentsConfig {
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactBackend {
    Disk,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactConfig {
    pub backend: ArtifactBackend,
    pub dir: PathBuf,
    pub memory_capacity: usize,
    /// 0 disables age-based expiry
    pub ttl_secs: u64,
    pub max_entries: Option<usize>,
    pub max_bytes: Option<u64>,
    /// 0 disables the background sweeper
    pub sweep_interval_secs: u64,
}

impl ArtifactConfig {
    pub fn eviction_policy(&self) -> EvictionPolicy {
        EvictionPolicy {
            max_age: (self.ttl_secs > 0).then(|| Duration::from_secs(self.ttl_secs)),
            max_entries: self.max_entries,
            max_bytes: self.max_bytes,
        }
    }

    pub fn sweep_interval(&self) -> Option<Duration> {
        (self.sweep_interval_secs > 0).then(|| Duration::from_secs(self.sweep_interval_secs))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
                request_timeout_secs: 30,
            },
            documents: DocumentsConfig {
                dir: PathBuf::from("./documents"),
            },
            artifacts: ArtifactConfig {
                backend: ArtifactBackend::Disk,
                dir: PathBuf::from("./artifacts"),
                memory_capacity: 256,
                ttl_secs: 3600,
                max_entries: None,
                max_bytes: None,
                sweep_interval_secs: 300,
            },
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {name}")]
    InvalidValue { name: &'static str, value: String },
}

/// Read `name`, falling back to `default` when unset
fn var_or<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => parse(name, value),
        _ => Ok(default),
    }
}

/// Read an optional `name`
fn var_opt<T: FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => parse(name, value).map(Some),
        _ => Ok(None),
    }
}

fn parse<T: FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue { name, value })
}

impl FromStr for ArtifactBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "disk" => Ok(ArtifactBackend::Disk),
            "memory" => Ok(ArtifactBackend::Memory),
            _ => Err(()),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Config::default();
        Ok(Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or(defaults.server.host),
                port: var_or("SERVER_PORT", defaults.server.port)?,
                request_timeout_secs: var_or(
                    "REQUEST_TIMEOUT_SECS",
                    defaults.server.request_timeout_secs,
                )?,
            },
            documents: DocumentsConfig {
                dir: env::var("DOCUMENTS_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.documents.dir),
            },
            artifacts: ArtifactConfig {
                backend: var_or("ARTIFACT_BACKEND", defaults.artifacts.backend)?,
                dir: env::var("ARTIFACT_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.artifacts.dir),
                memory_capacity: var_or(
                    "ARTIFACT_MEMORY_CAPACITY",
                    defaults.artifacts.memory_capacity,
                )?,
                ttl_secs: var_or("ARTIFACT_TTL_SECS", defaults.artifacts.ttl_secs)?,
                max_entries: var_opt("ARTIFACT_MAX_ENTRIES")?,
                max_bytes: var_opt("ARTIFACT_MAX_BYTES")?,
                sweep_interval_secs: var_or(
                    "ARTIFACT_SWEEP_INTERVAL_SECS",
                    defaults.artifacts.sweep_interval_secs,
                )?,
            },
        })
    }
}
