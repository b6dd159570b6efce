//! Storage Profiles
//!
//! Volume groups, their physical devices and file systems.

use super::item::{ItemMeta, ModelItem};
use crate::error::{Error, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Mount point of the root file system
pub const ROOT_MOUNT_POINT: &str = "/";

/// File system type that is mounted by the plugin
pub const FS_TYPE_EXT4: &str = "ext4";

/// Mount point every swap file system must use
pub const SWAP_MOUNT_POINT: &str = "swap";

/// File system type for swap
pub const FS_TYPE_SWAP: &str = "swap";

// =============================================================================
// Volume Driver
// =============================================================================

/// Volume management technology backing a volume group
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum VolumeDriverKind {
    #[default]
    Lvm,
    Vxvm,
}

impl std::fmt::Display for VolumeDriverKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VolumeDriverKind::Lvm => write!(f, "lvm"),
            VolumeDriverKind::Vxvm => write!(f, "vxvm"),
        }
    }
}

// =============================================================================
// Items
// =============================================================================

/// Reference from a volume group to a system disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhysicalDevice {
    pub meta: ItemMeta,
    pub device_name: String,
}

impl ModelItem for PhysicalDevice {
    fn meta(&self) -> &ItemMeta {
        &self.meta
    }
}

/// A file system carved out of a volume group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSystem {
    pub meta: ItemMeta,
    #[serde(rename = "type")]
    pub fs_type: String,
    pub mount_point: String,
    pub size: String,
}

impl FileSystem {
    pub fn is_root(&self) -> bool {
        self.mount_point == ROOT_MOUNT_POINT
    }

    pub fn is_ext4(&self) -> bool {
        self.fs_type == FS_TYPE_EXT4
    }

    pub fn is_swap(&self) -> bool {
        self.fs_type == FS_TYPE_SWAP
    }
}

impl ModelItem for FileSystem {
    fn meta(&self) -> &ItemMeta {
        &self.meta
    }
}

/// A volume group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeGroup {
    pub meta: ItemMeta,
    pub volume_group_name: String,
    pub volume_driver: VolumeDriverKind,
    pub physical_devices: Vec<PhysicalDevice>,
    pub file_systems: Vec<FileSystem>,
}

impl VolumeGroup {
    /// The group's physical device. Only one is supported; any further
    /// devices are ignored.
    pub fn physical_device(&self) -> Option<&PhysicalDevice> {
        self.physical_devices.first()
    }

    pub fn has_root_file_system(&self) -> bool {
        self.file_systems.iter().any(FileSystem::is_root)
    }
}

impl ModelItem for VolumeGroup {
    fn meta(&self) -> &ItemMeta {
        &self.meta
    }
}

/// A storage profile, possibly shared by several nodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageProfile {
    pub meta: ItemMeta,
    pub storage_profile_name: String,
    pub volume_groups: Vec<VolumeGroup>,
}

impl StorageProfile {
    /// Name of the volume group holding the root ("/") file system
    pub fn root_volume_group_name(&self) -> Result<&str> {
        self.volume_groups
            .iter()
            .find(|vg| vg.has_root_file_system())
            .map(|vg| vg.volume_group_name.as_str())
            .ok_or_else(|| Error::RootVolumeGroupUnresolved {
                profile: self.storage_profile_name.clone(),
            })
    }

    pub fn file_systems(&self) -> impl Iterator<Item = (&VolumeGroup, &FileSystem)> {
        self.volume_groups
            .iter()
            .flat_map(|vg| vg.file_systems.iter().map(move |fs| (vg, fs)))
    }

    pub fn physical_devices(&self) -> impl Iterator<Item = (&VolumeGroup, &PhysicalDevice)> {
        self.volume_groups
            .iter()
            .flat_map(|vg| vg.physical_devices.iter().map(move |pd| (vg, pd)))
    }
}

impl ModelItem for StorageProfile {
    fn meta(&self) -> &ItemMeta {
        &self.meta
    }
}
