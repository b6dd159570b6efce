//! Plugin Configuration
//!
//! Tunables for the volume drivers. Every field has a default, so an empty
//! or partial YAML file is a valid configuration.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

// =============================================================================
// LVM Configuration
// =============================================================================

/// Sizing rules applied by the LVM driver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LvmConfig {
    /// Space reserved on every disk for volume group metadata (MB)
    pub vg_overhead_mb: u64,
    /// Space reserved on a bootable disk for the boot partition (MB)
    pub boot_partition_mb: u64,
    /// Logical extent size; file system sizes must be a multiple of it (MB)
    pub logical_extent_mb: u64,
}

impl Default for LvmConfig {
    fn default() -> Self {
        Self {
            vg_overhead_mb: 100,
            boot_partition_mb: 500,
            logical_extent_mb: 4,
        }
    }
}

// =============================================================================
// Plugin Configuration
// =============================================================================

/// Configuration for the volume manager plugin
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginConfig {
    pub lvm: LvmConfig,
}

impl PluginConfig {
    /// Parse a configuration from YAML text
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: PluginConfig = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a configuration file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&text)
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> Result<()> {
        if self.lvm.logical_extent_mb == 0 {
            return Err(Error::Configuration(
                "lvm.logical_extent_mb must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
