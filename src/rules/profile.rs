//! Profile Rules
//!
//! Rules evaluated once per distinct storage profile.

use crate::domain::validation::ValidationError;
use crate::model::{ModelItem, StorageProfile, SWAP_MOUNT_POINT};
use tracing::debug;

/// Every volume group sharing its name with another group in the profile
/// is reported, so a colliding pair yields two findings.
pub fn unique_volume_group_names(profile: &StorageProfile) -> Vec<ValidationError> {
    let groups = &profile.volume_groups;

    groups
        .iter()
        .enumerate()
        .filter(|(i, vg)| {
            groups
                .iter()
                .enumerate()
                .any(|(j, other)| *i != j && other.volume_group_name == vg.volume_group_name)
        })
        .map(|(_, vg)| {
            debug!(vg = %vg.item_id(), name = %vg.volume_group_name, "Duplicate volume group name");
            ValidationError::new(
                vg.vpath(),
                format!(
                    "Volume Group name '{}' is not unique for this Storage profile",
                    vg.volume_group_name
                ),
            )
        })
        .collect()
}

/// Mount points must be unique across all volume groups of the profile.
/// Each file system of a colliding pair is reported.
pub fn unique_mount_points(profile: &StorageProfile) -> Vec<ValidationError> {
    let file_systems: Vec<_> = profile.file_systems().collect();

    file_systems
        .iter()
        .enumerate()
        .filter(|(i, (_, fs))| {
            file_systems
                .iter()
                .enumerate()
                .any(|(j, (_, other))| *i != j && other.mount_point == fs.mount_point)
        })
        .map(|(_, (vg, fs))| {
            debug!(vg = %vg.item_id(), fs = %fs.item_id(), mount_point = %fs.mount_point, "Duplicate mount point");
            ValidationError::new(
                fs.vpath(),
                format!(
                    "File System mount_point '{}' is not unique for this Storage profile",
                    fs.mount_point
                ),
            )
        })
        .collect()
}

/// A swap file system must be mounted on "swap".
pub fn swap_mount_points(profile: &StorageProfile) -> Vec<ValidationError> {
    profile
        .file_systems()
        .filter(|(_, fs)| fs.is_swap() && fs.mount_point != SWAP_MOUNT_POINT)
        .map(|(vg, fs)| {
            debug!(vg = %vg.item_id(), fs = %fs.item_id(), "Swap file system with wrong mount point");
            ValidationError::new(
                fs.vpath(),
                "A File System with type set to 'swap' must also have a mount_point set to 'swap'",
            )
        })
        .collect()
}
