//! Systems and Disks

use super::item::{ItemMeta, ModelItem};
use serde::{Deserialize, Serialize};

/// A system disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disk {
    pub meta: ItemMeta,
    /// Device name referenced by physical devices
    pub name: String,
    /// Disk UUID, used to build the platform device reference
    pub uuid: String,
    /// Size string, e.g. "28G"
    pub size: String,
    /// "true" or "false"
    pub bootable: String,
}

impl Disk {
    pub fn is_bootable(&self) -> bool {
        self.bootable == "true"
    }

    /// Whether a physical device `device_name` refers to this disk.
    /// A disk without a name never matches.
    pub fn matches_device(&self, device_name: &str) -> bool {
        !self.name.is_empty() && self.name == device_name
    }
}

impl ModelItem for Disk {
    fn meta(&self) -> &ItemMeta {
        &self.meta
    }
}

/// A managed system and its disks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct System {
    pub meta: ItemMeta,
    pub system_name: String,
    pub disks: Vec<Disk>,
}

impl System {
    /// First disk referenced by `device_name`
    pub fn disk_for_device(&self, device_name: &str) -> Option<&Disk> {
        self.disks.iter().find(|disk| disk.matches_device(device_name))
    }

    pub fn bootable_disks(&self) -> impl Iterator<Item = &Disk> {
        self.disks.iter().filter(|disk| disk.is_bootable())
    }
}

impl ModelItem for System {
    fn meta(&self) -> &ItemMeta {
        &self.meta
    }
}
