//! Model Document
//!
//! YAML description of systems, storage profiles and nodes, and the loader
//! that turns it into a [`ModelSnapshot`]. Nodes link systems and profiles
//! by name; every node naming the same profile shares one instance.
//!
//! ```yaml
//! systems:
//!   - id: s1
//!     system_name: MN1SYS
//!     disks:
//!       - { id: disk1, name: primary, uuid: ABCD_1234, size: 28G, bootable: true }
//! storage_profiles:
//!   - id: sp1
//!     storage_profile_name: storage_profile_1
//!     volume_groups:
//!       - id: vg1
//!         volume_group_name: root_vg
//!         physical_devices:
//!           - { id: pd1, device_name: primary }
//!         file_systems:
//!           - { id: fs1, type: ext4, mount_point: /, size: 10G }
//! nodes:
//!   - { id: n1, hostname: node1, system: MN1SYS, storage_profile: storage_profile_1 }
//! ```

use super::item::{ItemMeta, ItemState};
use super::node::Node;
use super::snapshot::ModelSnapshot;
use super::storage::{
    FileSystem, PhysicalDevice, StorageProfile, VolumeDriverKind, VolumeGroup, FS_TYPE_EXT4,
    FS_TYPE_SWAP,
};
use super::system::{Disk, System};
use crate::domain::validation::ValidationError;
use crate::error::{Error, Result};
use crate::units;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Model path under which systems live
pub const SYSTEMS_PATH: &str = "/infrastructure/systems";

/// Model path under which storage profiles live
pub const STORAGE_PROFILES_PATH: &str = "/infrastructure/storage/storage_profiles";

/// Model path under which nodes live
pub const NODES_PATH: &str = "/nodes";

/// Volume groups allowed per storage profile
pub const VOLUME_GROUPS_PER_PROFILE: std::ops::RangeInclusive<usize> = 1..=2;

/// File systems allowed per volume group
pub const FILE_SYSTEMS_PER_VOLUME_GROUP: std::ops::RangeInclusive<usize> = 1..=5;

/// File system types the model accepts
pub const FILE_SYSTEM_TYPES: &[&str] = &[FS_TYPE_EXT4, FS_TYPE_SWAP];

// =============================================================================
// Document Types
// =============================================================================

/// Bootable flag, written either as a YAML bool or as "true"/"false"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum BootableFlag {
    Flag(bool),
    Text(String),
}

impl Default for BootableFlag {
    fn default() -> Self {
        BootableFlag::Flag(false)
    }
}

impl BootableFlag {
    fn as_model_value(&self) -> String {
        match self {
            BootableFlag::Flag(flag) => flag.to_string(),
            BootableFlag::Text(text) => text.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct DiskEntry {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub uuid: String,
    pub size: String,
    #[serde(default)]
    pub bootable: BootableFlag,
    #[serde(default)]
    pub state: ItemState,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct SystemEntry {
    pub id: String,
    pub system_name: String,
    #[serde(default)]
    pub disks: Vec<DiskEntry>,
    #[serde(default)]
    pub state: ItemState,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct PhysicalDeviceEntry {
    pub id: String,
    pub device_name: String,
    #[serde(default)]
    pub state: ItemState,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct FileSystemEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub fs_type: String,
    pub mount_point: String,
    pub size: String,
    #[serde(default)]
    pub state: ItemState,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct VolumeGroupEntry {
    pub id: String,
    pub volume_group_name: String,
    #[serde(default)]
    pub volume_driver: VolumeDriverKind,
    #[serde(default)]
    pub physical_devices: Vec<PhysicalDeviceEntry>,
    #[serde(default)]
    pub file_systems: Vec<FileSystemEntry>,
    #[serde(default)]
    pub state: ItemState,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct StorageProfileEntry {
    pub id: String,
    pub storage_profile_name: String,
    #[serde(default)]
    pub volume_groups: Vec<VolumeGroupEntry>,
    #[serde(default)]
    pub state: ItemState,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct NodeEntry {
    pub id: String,
    #[serde(default)]
    pub hostname: String,
    /// `system_name` of the linked system
    #[serde(default)]
    pub system: Option<String>,
    /// `storage_profile_name` of the linked storage profile
    #[serde(default)]
    pub storage_profile: Option<String>,
    #[serde(default)]
    pub state: ItemState,
}

/// Complete model document
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ModelDocument {
    #[serde(default)]
    pub systems: Vec<SystemEntry>,
    #[serde(default)]
    pub storage_profiles: Vec<StorageProfileEntry>,
    #[serde(default)]
    pub nodes: Vec<NodeEntry>,
}

// =============================================================================
// Loading
// =============================================================================

impl ModelDocument {
    /// Parse a document from YAML text
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Read and parse a document file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&text)
    }

    /// JSON schema describing the document
    pub fn json_schema() -> Result<serde_json::Value> {
        Ok(serde_json::to_value(schemars::schema_for!(ModelDocument))?)
    }

    /// Resolve links and build the model snapshot
    pub fn build(&self) -> Result<ModelSnapshot> {
        let mut systems: HashMap<&str, Arc<System>> = HashMap::new();
        for entry in &self.systems {
            let system = Arc::new(build_system(entry));
            if systems.insert(entry.system_name.as_str(), system).is_some() {
                return Err(Error::DuplicateItem {
                    kind: "system".into(),
                    name: entry.system_name.clone(),
                });
            }
        }

        let mut profiles: HashMap<&str, Arc<StorageProfile>> = HashMap::new();
        for entry in &self.storage_profiles {
            let profile = Arc::new(build_storage_profile(entry));
            if profiles
                .insert(entry.storage_profile_name.as_str(), profile)
                .is_some()
            {
                return Err(Error::DuplicateItem {
                    kind: "storage profile".into(),
                    name: entry.storage_profile_name.clone(),
                });
            }
        }

        let mut nodes = Vec::with_capacity(self.nodes.len());
        let mut node_ids = std::collections::HashSet::new();
        for entry in &self.nodes {
            if !node_ids.insert(entry.id.as_str()) {
                return Err(Error::DuplicateItem {
                    kind: "node".into(),
                    name: entry.id.clone(),
                });
            }

            let system = match &entry.system {
                Some(name) => Some(lookup(&systems, "system", name)?),
                None => None,
            };
            let storage_profile = match &entry.storage_profile {
                Some(name) => Some(lookup(&profiles, "storage profile", name)?),
                None => None,
            };

            nodes.push(Node {
                meta: ItemMeta::new(
                    entry.id.clone(),
                    format!("{}/{}", NODES_PATH, entry.id),
                    entry.state,
                ),
                hostname: entry.hostname.clone(),
                system,
                storage_profile,
            });
        }

        debug!(
            systems = systems.len(),
            profiles = profiles.len(),
            nodes = nodes.len(),
            "Built model snapshot"
        );

        Ok(ModelSnapshot::new(nodes))
    }

    /// Check per-property constraints of every item: collection
    /// cardinalities, size strings, file system types and bootable flags.
    /// A volume group needs at least one physical device.
    pub fn check_properties(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        for system in &self.systems {
            let system_path = format!("{}/{}", SYSTEMS_PATH, system.id);
            for disk in &system.disks {
                let path = format!("{}/disks/{}", system_path, disk.id);
                check_size(&mut errors, &path, &disk.size);
                let bootable = disk.bootable.as_model_value();
                if bootable != "true" && bootable != "false" {
                    errors.push(ValidationError::new(
                        path,
                        format!("Invalid value '{}' for 'bootable', expected 'true' or 'false'", bootable),
                    ));
                }
            }
        }

        for profile in &self.storage_profiles {
            let profile_path = format!("{}/{}", STORAGE_PROFILES_PATH, profile.id);
            if !VOLUME_GROUPS_PER_PROFILE.contains(&profile.volume_groups.len()) {
                errors.push(ValidationError::new(
                    profile_path.clone(),
                    format!(
                        "A Storage Profile must contain between {} and {} Volume Groups, found {}",
                        VOLUME_GROUPS_PER_PROFILE.start(),
                        VOLUME_GROUPS_PER_PROFILE.end(),
                        profile.volume_groups.len()
                    ),
                ));
            }

            for vg in &profile.volume_groups {
                let vg_path = format!("{}/volume_groups/{}", profile_path, vg.id);
                if !FILE_SYSTEMS_PER_VOLUME_GROUP.contains(&vg.file_systems.len()) {
                    errors.push(ValidationError::new(
                        vg_path.clone(),
                        format!(
                            "A Volume Group must contain between {} and {} File Systems, found {}",
                            FILE_SYSTEMS_PER_VOLUME_GROUP.start(),
                            FILE_SYSTEMS_PER_VOLUME_GROUP.end(),
                            vg.file_systems.len()
                        ),
                    ));
                }

                // Only the first device is used; further ones are tolerated
                if vg.physical_devices.is_empty() {
                    errors.push(ValidationError::new(
                        vg_path.clone(),
                        "A Volume Group must contain a Physical Device",
                    ));
                }

                for fs in &vg.file_systems {
                    let fs_path = format!("{}/file_systems/{}", vg_path, fs.id);
                    check_size(&mut errors, &fs_path, &fs.size);
                    if !FILE_SYSTEM_TYPES.contains(&fs.fs_type.as_str()) {
                        errors.push(ValidationError::new(
                            fs_path,
                            format!(
                                "Invalid File System type '{}', expected one of: {}",
                                fs.fs_type,
                                FILE_SYSTEM_TYPES.join(", ")
                            ),
                        ));
                    }
                }
            }
        }

        errors
    }
}

fn check_size(errors: &mut Vec<ValidationError>, path: &str, size: &str) {
    if !units::is_valid_size(size) {
        errors.push(ValidationError::new(
            path,
            format!("Invalid size '{}', expected a number followed by M, G or T", size),
        ));
    }
}

fn lookup<T>(items: &HashMap<&str, Arc<T>>, kind: &str, name: &str) -> Result<Arc<T>> {
    items
        .get(name)
        .cloned()
        .ok_or_else(|| Error::UnknownReference {
            kind: kind.to_string(),
            name: name.to_string(),
        })
}

fn build_system(entry: &SystemEntry) -> System {
    let meta = ItemMeta::new(
        entry.id.clone(),
        format!("{}/{}", SYSTEMS_PATH, entry.id),
        entry.state,
    );
    let disks = entry
        .disks
        .iter()
        .map(|disk| Disk {
            meta: ItemMeta::child_of(&meta, "disks", disk.id.clone(), disk.state),
            name: disk.name.clone(),
            uuid: disk.uuid.clone(),
            size: disk.size.clone(),
            bootable: disk.bootable.as_model_value(),
        })
        .collect();

    System {
        meta,
        system_name: entry.system_name.clone(),
        disks,
    }
}

fn build_storage_profile(entry: &StorageProfileEntry) -> StorageProfile {
    let meta = ItemMeta::new(
        entry.id.clone(),
        format!("{}/{}", STORAGE_PROFILES_PATH, entry.id),
        entry.state,
    );
    let volume_groups = entry
        .volume_groups
        .iter()
        .map(|vg| {
            let vg_meta = ItemMeta::child_of(&meta, "volume_groups", vg.id.clone(), vg.state);
            VolumeGroup {
                physical_devices: vg
                    .physical_devices
                    .iter()
                    .map(|pd| PhysicalDevice {
                        meta: ItemMeta::child_of(&vg_meta, "physical_devices", pd.id.clone(), pd.state),
                        device_name: pd.device_name.clone(),
                    })
                    .collect(),
                file_systems: vg
                    .file_systems
                    .iter()
                    .map(|fs| FileSystem {
                        meta: ItemMeta::child_of(&vg_meta, "file_systems", fs.id.clone(), fs.state),
                        fs_type: fs.fs_type.clone(),
                        mount_point: fs.mount_point.clone(),
                        size: fs.size.clone(),
                    })
                    .collect(),
                volume_group_name: vg.volume_group_name.clone(),
                volume_driver: vg.volume_driver,
                meta: vg_meta,
            }
        })
        .collect();

    StorageProfile {
        meta,
        storage_profile_name: entry.storage_profile_name.clone(),
        volume_groups,
    }
}
