//! Configuration discovery and loading
//!
//! This module handles the configuration discovery hierarchy:
//! 1. Explicit `--config` path
//! 2. Current directory: ./scanpool.toml
//! 3. Built-in defaults

use crate::pool::PoolConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// TOML-facing configuration file shape
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PoolConfigFile {
    #[serde(default)]
    pub pool: PoolSection,
}

/// `[pool]` section; every field optional, falling back to built-in defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolSection {
    pub max_workers: Option<usize>,
    pub per_worker_limit: Option<usize>,
    pub task_timeout_ms: Option<u64>,
    pub heartbeat_interval_ms: Option<u64>,
    pub restart_backoff_ms: Option<u64>,
}

impl PoolConfigFile {
    /// Load configuration from a specific file
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read configuration file {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("failed to parse configuration file {}", path.display()))
    }

    /// Walk the discovery hierarchy and return the first configuration found
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            info!("loading configuration from {}", path.display());
            return Self::load(path);
        }

        let local = PathBuf::from("scanpool.toml");
        if local.exists() {
            info!("loading configuration from ./scanpool.toml");
            return Self::load(&local);
        }

        debug!("no configuration file found, using built-in defaults");
        Ok(Self::default())
    }

    /// Merge file values over the built-in defaults
    pub fn to_pool_config(&self) -> PoolConfig {
        let mut config = PoolConfig::default();
        if let Some(workers) = self.pool.max_workers {
            config.max_workers = workers.max(1);
        }
        if let Some(limit) = self.pool.per_worker_limit {
            config.per_worker_limit = limit.max(1);
        }
        if let Some(ms) = self.pool.task_timeout_ms {
            config.task_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = self.pool.heartbeat_interval_ms {
            config.heartbeat_interval = Duration::from_millis(ms);
        }
        if let Some(ms) = self.pool.restart_backoff_ms {
            config.restart_backoff = Duration::from_millis(ms);
        }
        config
    }
}
