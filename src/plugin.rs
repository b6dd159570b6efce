//! Volume Manager Plugin
//!
//! Runs the rule engine over every node and profile of the model, and
//! delegates task synthesis for each node's root volume group to the driver
//! of that group's technology.

use crate::config::PluginConfig;
use crate::domain::ports::ModelStore;
use crate::domain::task::TaskEntry;
use crate::domain::validation::ValidationError;
use crate::drivers::DriverRegistry;
use crate::error::Result;
use crate::model::{ModelItem, Node, StorageProfile};
use crate::rules;
use std::sync::Arc;
use tracing::{debug, info};

/// Volume manager plugin
#[derive(Debug)]
pub struct VolMgrPlugin {
    config: PluginConfig,
    drivers: DriverRegistry,
}

impl Default for VolMgrPlugin {
    fn default() -> Self {
        let config = PluginConfig::default();
        let drivers = DriverRegistry::with_defaults(&config);
        Self { config, drivers }
    }
}

impl VolMgrPlugin {
    /// Create a plugin with a driver for every known technology
    pub fn new(config: PluginConfig) -> Result<Self> {
        config.validate()?;
        let drivers = DriverRegistry::with_defaults(&config);
        Ok(Self { config, drivers })
    }

    /// Create a plugin with an explicit set of drivers
    pub fn with_drivers(config: PluginConfig, drivers: DriverRegistry) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, drivers })
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    pub fn drivers(&self) -> &DriverRegistry {
        &self.drivers
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Validate the whole model and report every finding.
    ///
    /// Profile rules run once per distinct profile instance, however many
    /// nodes share it. Node rules and every registered driver's rules run
    /// per node.
    pub fn validate_model(&self, store: &dyn ModelStore) -> Vec<ValidationError> {
        let nodes = store.nodes();
        let mut errors = Vec::new();

        let profiles = distinct_profiles(nodes);
        for profile in &profiles {
            errors.extend(rules::validate_profile(profile));
        }

        for node in nodes {
            errors.extend(rules::validate_node(node));

            if node.system.is_some() && node.storage_profile.is_some() {
                for driver in self.drivers.iter() {
                    let found = driver.validate_node(node);
                    debug!(
                        node = %node.item_id(),
                        driver = %driver.kind(),
                        errors = found.len(),
                        "Ran driver rules"
                    );
                    errors.extend(found);
                }
            }
        }

        info!(
            nodes = nodes.len(),
            profiles = profiles.len(),
            errors = errors.len(),
            "Model validation complete"
        );
        errors
    }

    // =========================================================================
    // Task Generation
    // =========================================================================

    /// Generate tasks for every node linked to both a system and a storage
    /// profile
    pub fn create_configuration(&self, store: &dyn ModelStore) -> Vec<TaskEntry> {
        let mut entries = Vec::new();

        for node in store.nodes() {
            if node.system.is_some() && node.storage_profile.is_some() {
                debug!(node = %node.item_id(), "Processing storage profile");
                entries.extend(self.tasks_for_node(node));
            } else {
                debug!(node = %node.item_id(), "Node does not have both a system and a storage profile");
            }
        }

        for entry in &entries {
            for task in entry.tasks() {
                debug!(ordered = entry.is_ordered(), "Task: {}", task);
            }
        }

        info!(entries = entries.len(), "Task generation complete");
        entries
    }

    /// Tasks for the root volume group of one node. A profile without a
    /// root volume group yields no tasks.
    fn tasks_for_node(&self, node: &Node) -> Vec<TaskEntry> {
        let Some(profile) = node.storage_profile.as_deref() else {
            return Vec::new();
        };

        let root_vg = match profile.root_volume_group_name() {
            Ok(name) => name,
            Err(e) => {
                debug!(node = %node.item_id(), "{}", e);
                return Vec::new();
            }
        };

        let mut entries = Vec::new();
        for vg in profile
            .volume_groups
            .iter()
            .filter(|vg| vg.volume_group_name == root_vg)
        {
            match self.drivers.get(vg.volume_driver) {
                Some(driver) => entries.extend(driver.generate_tasks_for_volume_group(node, vg)),
                None => debug!(
                    node = %node.item_id(),
                    vg = %vg.item_id(),
                    driver = %vg.volume_driver,
                    "No driver registered for volume group"
                ),
            }
        }
        entries
    }
}

/// Profiles referenced by the nodes, each instance once, in first-seen order
fn distinct_profiles(nodes: &[Node]) -> Vec<&Arc<StorageProfile>> {
    let mut profiles: Vec<&Arc<StorageProfile>> = Vec::new();
    for profile in nodes.iter().filter_map(|node| node.storage_profile.as_ref()) {
        if !profiles.iter().any(|seen| Arc::ptr_eq(seen, profile)) {
            profiles.push(profile);
        }
    }
    profiles
}
