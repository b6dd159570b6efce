//! Rule Engine
//!
//! Technology-independent consistency rules over the configuration model.
//! Every rule is a pure function returning its findings; rules never stop
//! the pass early. Technology-specific rules live with their
//! [drivers](crate::drivers).

pub mod profile;
pub mod node;

pub use profile::*;
pub use node::*;

use crate::domain::validation::ValidationError;
use crate::model::{Node, StorageProfile, System};
use tracing::debug;

/// A rule scoped to a whole storage profile
pub type ProfileRule = fn(&StorageProfile) -> Vec<ValidationError>;

/// A rule scoped to a node's system
pub type SystemRule = fn(&Node, &System) -> Vec<ValidationError>;

/// A rule scoped to a node's system and storage profile together
pub type NodeProfileRule = fn(&Node, &System, &StorageProfile) -> Vec<ValidationError>;

/// Profile rules, in execution order
pub const PROFILE_RULES: &[(&str, ProfileRule)] = &[
    ("unique_volume_group_names", profile::unique_volume_group_names),
    ("unique_mount_points", profile::unique_mount_points),
    ("swap_mount_points", profile::swap_mount_points),
];

/// System rules, in execution order
pub const SYSTEM_RULES: &[(&str, SystemRule)] = &[("single_bootable_disk", node::single_bootable_disk)];

/// Node rules needing both a system and a storage profile, in execution order
pub const NODE_PROFILE_RULES: &[(&str, NodeProfileRule)] = &[
    ("physical_devices_resolve", node::physical_devices_resolve),
    ("disks_referenced_once", node::disks_referenced_once),
];

/// Run every profile rule against a profile
pub fn validate_profile(profile: &StorageProfile) -> Vec<ValidationError> {
    PROFILE_RULES
        .iter()
        .flat_map(|(name, rule)| {
            let errors = rule(profile);
            debug!(
                profile = %profile.storage_profile_name,
                rule = name,
                errors = errors.len(),
                "Ran profile rule"
            );
            errors
        })
        .collect()
}

/// Run every node rule applicable to the node's links
pub fn validate_node(node: &Node) -> Vec<ValidationError> {
    let Some(system) = node.system.as_deref() else {
        debug!(node = %node.meta.item_id, "Node has no system, skipping node rules");
        return Vec::new();
    };

    let mut errors = Vec::new();
    for (name, rule) in SYSTEM_RULES {
        let found = rule(node, system);
        debug!(node = %node.meta.item_id, rule = name, errors = found.len(), "Ran system rule");
        errors.extend(found);
    }

    if let Some(profile) = node.storage_profile.as_deref() {
        for (name, rule) in NODE_PROFILE_RULES {
            let found = rule(node, system, profile);
            debug!(node = %node.meta.item_id, rule = name, errors = found.len(), "Ran node rule");
            errors.extend(found);
        }
    }

    errors
}
