// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Studmount Team

//! Kernel configuration
//!
//! Read from `studmount.toml` in the working directory when present, then
//! overridden by `STUDMOUNT_*` environment variables.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "studmount.toml";

/// Tessellation and boolean tolerances shared by every render
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    /// Sides used to approximate cylinders
    pub segments: u32,
    /// Plane thickness for BSP classification
    pub epsilon: f64,
    /// Batch worker threads, 0 = one per core
    pub parallelism: usize,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            segments: 32,
            epsilon: 1e-5,
            parallelism: 0,
        }
    }
}

impl KernelConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: KernelConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides
    pub fn load() -> Result<Self> {
        let mut config = if PathBuf::from(CONFIG_FILE).exists() {
            Self::from_file(CONFIG_FILE)?
        } else {
            Self::default()
        };

        if let Ok(segments) = std::env::var("STUDMOUNT_SEGMENTS") {
            config.segments = segments
                .parse()
                .with_context(|| format!("STUDMOUNT_SEGMENTS is not an integer: {}", segments))?;
        }

        if let Ok(epsilon) = std::env::var("STUDMOUNT_EPSILON") {
            config.epsilon = epsilon
                .parse()
                .with_context(|| format!("STUDMOUNT_EPSILON is not a number: {}", epsilon))?;
        }

        if let Ok(parallelism) = std::env::var("STUDMOUNT_PARALLELISM") {
            config.parallelism = parallelism.parse().with_context(|| {
                format!("STUDMOUNT_PARALLELISM is not an integer: {}", parallelism)
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.segments < 3 {
            bail!("segments must be at least 3, got {}", self.segments);
        }
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            bail!("epsilon must be a positive number, got {}", self.epsilon);
        }
        Ok(())
    }

    /// Worker count for batch renders
    pub fn worker_threads(&self) -> usize {
        if self.parallelism > 0 {
            self.parallelism
        } else {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: KernelConfig = toml::from_str("segments = 64").unwrap();
        assert_eq!(config.segments, 64);
        assert_eq!(config.epsilon, 1e-5);
        assert_eq!(config.parallelism, 0);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = KernelConfig::default();
        assert!(config.validate().is_ok());

        config.segments = 2;
        assert!(config.validate().is_err());

        config.segments = 16;
        config.epsilon = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_worker_threads() {
        let config = KernelConfig {
            parallelism: 3,
            ..KernelConfig::default()
        };
        assert_eq!(config.worker_threads(), 3);
        assert!(KernelConfig::default().worker_threads() >= 1);
    }
}
