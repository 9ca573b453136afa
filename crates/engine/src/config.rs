//! Engine configuration via `tacit.toml`
//!
//! Controls the worker pool that runs future and promise bodies. A default
//! file can be written next to an application with
//! [`EngineConfig::write_default_if_missing`]; edit it and restart to change
//! settings.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tacit_core::{Error, Result};
use tracing::info;

/// Config file name.
pub const CONFIG_FILE_NAME: &str = "tacit.toml";

/// Engine configuration loaded from `tacit.toml`.
///
/// # Example
///
/// ```toml
/// # Worker threads for future/promise procedures
/// worker_threads = 4
/// max_queue_depth = 4096
/// thread_name_prefix = "tacit-worker"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    /// Number of worker threads in the background pool.
    #[serde(default = "default_worker_threads")]
    pub worker_threads: usize,
    /// Queued bodies allowed before submissions are refused.
    #[serde(default = "default_max_queue_depth")]
    pub max_queue_depth: usize,
    /// Workers are named `<prefix>-0`, `<prefix>-1`, etc.
    #[serde(default = "default_thread_name_prefix")]
    pub thread_name_prefix: String,
}

fn default_worker_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

fn default_max_queue_depth() -> usize {
    4096
}

fn default_thread_name_prefix() -> String {
    "tacit-worker".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            worker_threads: default_worker_threads(),
            max_queue_depth: default_max_queue_depth(),
            thread_name_prefix: default_thread_name_prefix(),
        }
    }
}

impl EngineConfig {
    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// `Error::Config` when a pool size is zero or the thread name prefix is
    /// empty.
    pub fn validate(&self) -> Result<()> {
        if self.worker_threads == 0 {
            return Err(Error::config("worker_threads must be at least 1"));
        }
        if self.max_queue_depth == 0 {
            return Err(Error::config("max_queue_depth must be at least 1"));
        }
        if self.thread_name_prefix.is_empty() {
            return Err(Error::config("thread_name_prefix must not be empty"));
        }
        Ok(())
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# tacit engine configuration
#
# Worker threads used to run future/promise procedure bodies.
# Defaults to the machine's available parallelism.
# worker_threads = 4

# Maximum queued asynchronous bodies. Calls made while the queue is full
# fail immediately with a scheduler error (default: 4096).
max_queue_depth = 4096

# Workers are named "<prefix>-0", "<prefix>-1", ...
thread_name_prefix = "tacit-worker"
"#
    }

    /// Read, parse and validate config from a file path.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the file cannot be read, parsed, or
    /// fails validation.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: EngineConfig = toml::from_str(&content).map_err(|e| {
            Error::config(format!(
                "failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        info!(
            path = %path.display(),
            worker_threads = config.worker_threads,
            max_queue_depth = config.max_queue_depth,
            "loaded engine config"
        );
        Ok(config)
    }

    /// Write the default config file if it does not already exist.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                Error::config(format!(
                    "failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::config(format!("failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            Error::config(format!(
                "failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}
