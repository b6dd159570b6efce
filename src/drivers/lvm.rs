//! LVM Driver
//!
//! Sizing rules and task synthesis for LVM-backed volume groups.
//!
//! For every file system needing work the driver emits an `lvm::volume`
//! task. An ext4 file system other than "/" additionally gets a mount
//! directory and a mount; the three are wrapped in one ordered list so the
//! volume exists before it is mounted.

use crate::config::LvmConfig;
use crate::domain::ports::VolumeDriver;
use crate::domain::task::{OrderedTaskList, Task, TaskEntry};
use crate::domain::validation::ValidationError;
use crate::model::{
    any_needs_apply, Disk, FileSystem, ModelItem, Node, PhysicalDevice, StorageProfile, System,
    VolumeDriverKind, VolumeGroup,
};
use crate::units::size_to_mb;
use tracing::{debug, warn};

/// Backend resource type for logical volumes
pub const RESOURCE_VOLUME: &str = "lvm::volume";

/// Backend resource type for files and directories
pub const RESOURCE_FILE: &str = "file";

/// Backend resource type for mounts
pub const RESOURCE_MOUNT: &str = "mount";

/// LVM volume driver
#[derive(Debug, Clone, Default)]
pub struct LvmDriver {
    config: LvmConfig,
}

impl LvmDriver {
    pub fn new(config: LvmConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LvmConfig {
        &self.config
    }

    fn lvm_groups<'a>(profile: &'a StorageProfile) -> impl Iterator<Item = &'a VolumeGroup> {
        profile
            .volume_groups
            .iter()
            .filter(|vg| vg.volume_driver == VolumeDriverKind::Lvm)
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Space reserved on `disk` besides the file systems (MB)
    pub fn sundries_mb(&self, disk: &Disk) -> u64 {
        let mut sundries = self.config.vg_overhead_mb;
        if disk.is_bootable() {
            sundries = sundries.saturating_add(self.config.boot_partition_mb);
        }
        sundries
    }

    /// The file systems of each volume group, plus sundries, must fit on
    /// the disk behind the group's physical device.
    pub fn validate_disk_capacity(
        &self,
        node: &Node,
        system: &System,
        profile: &StorageProfile,
    ) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        for vg in Self::lvm_groups(profile) {
            // Unresolved devices are reported by the generic node rules
            let Some(disk) = vg
                .physical_device()
                .and_then(|pd| system.disk_for_device(&pd.device_name))
            else {
                continue;
            };

            debug!(node = %node.item_id(), vg = %vg.item_id(), disk = %disk.item_id(), "Checking volume group against disk");

            let cumulative = vg
                .file_systems
                .iter()
                .map(|fs| size_to_mb(&fs.size))
                .fold(0u64, |acc, mb| acc.saturating_add(mb));
            let sundries = self.sundries_mb(disk);
            let disk_size = size_to_mb(&disk.size);

            if cumulative.saturating_add(sundries) > disk_size {
                let message = format!(
                    "The System Disk (size = {}) does not have sufficient space for all \
                     File Systems ({} MBs) plus sundries ({} MBs)",
                    disk.size, cumulative, sundries
                );
                debug!(node = %node.item_id(), vg = %vg.item_id(), "{}", message);
                errors.push(ValidationError::new(vg.vpath(), message));
            }
        }

        errors
    }

    /// Whether `size` is a whole number of logical extents
    pub fn is_extent_multiple(&self, size: &str) -> bool {
        match self.config.logical_extent_mb {
            0 => true,
            extent => size_to_mb(size) % extent == 0,
        }
    }

    /// Every file system size must be a multiple of the logical extent.
    pub fn validate_extent_alignment(
        &self,
        node: &Node,
        profile: &StorageProfile,
    ) -> Vec<ValidationError> {
        Self::lvm_groups(profile)
            .flat_map(|vg| vg.file_systems.iter())
            .filter(|fs| !self.is_extent_multiple(&fs.size))
            .map(|fs| {
                debug!(node = %node.item_id(), fs = %fs.item_id(), size = %fs.size, "File system not extent aligned");
                ValidationError::new(
                    fs.vpath(),
                    format!(
                        "File System size '{}' is not an exact multiple of the LVM Logical Extent size ('{}')",
                        fs.size, self.config.logical_extent_mb
                    ),
                )
            })
            .collect()
    }

    // =========================================================================
    // Task Synthesis
    // =========================================================================

    /// Platform fact naming the disk device. A bootable disk already
    /// carries the boot partition, so the volume group goes on partition 2.
    pub fn disk_device_fact(disk: &Disk) -> String {
        let mut fact = format!("$::disk_scsi_3{}", disk.uuid);
        if disk.is_bootable() {
            fact.push_str("_part2");
        }
        fact.push_str("_dev");
        fact
    }

    /// Device path of a file system's logical volume
    pub fn file_system_device_name(vg: &VolumeGroup, fs: &FileSystem) -> String {
        format!("/dev/{}/{}", vg.volume_group_name, fs.item_id())
    }

    fn describe(kind: &str, node: &Node, pd: &PhysicalDevice, vg: &VolumeGroup, fs: &FileSystem) -> String {
        format!(
            "{}: {}::{}::{}::{}",
            kind,
            fs.item_id(),
            vg.item_id(),
            pd.item_id(),
            node.item_id()
        )
    }

    fn volume_task(
        node: &Node,
        pd: &PhysicalDevice,
        vg: &VolumeGroup,
        fs: &FileSystem,
        disk: &Disk,
    ) -> Task {
        Task::new(
            node.item_id(),
            fs.vpath(),
            Self::describe("Volume", node, pd, vg, fs),
            RESOURCE_VOLUME,
            fs.item_id(),
        )
        .param("ensure", "present")
        .param("pv", Self::disk_device_fact(disk))
        .param("vg", vg.volume_group_name.as_str())
        .param("fstype", fs.fs_type.as_str())
        .param("size", fs.size.as_str())
    }

    /// Mount directory and mount tasks; none for the root file system,
    /// which the platform mounts itself.
    fn mount_tasks(node: &Node, pd: &PhysicalDevice, vg: &VolumeGroup, fs: &FileSystem) -> Vec<Task> {
        if fs.is_root() {
            return Vec::new();
        }

        let directory = Task::new(
            node.item_id(),
            fs.vpath(),
            Self::describe("Mount Directory", node, pd, vg, fs),
            RESOURCE_FILE,
            fs.mount_point.as_str(),
        )
        .param("path", fs.mount_point.as_str())
        .param("ensure", "directory")
        .param("owner", "0")
        .param("group", "0")
        .param("mode", "0755")
        .param("backup", "false");

        let mount = Task::new(
            node.item_id(),
            fs.vpath(),
            Self::describe("Mount", node, pd, vg, fs),
            RESOURCE_MOUNT,
            fs.mount_point.as_str(),
        )
        .param("fstype", fs.fs_type.as_str())
        .param("device", Self::file_system_device_name(vg, fs))
        .param("ensure", "mounted")
        .param("options", "defaults")
        .param("atboot", "true");

        vec![directory, mount]
    }

    fn tasks_for_file_system(
        node: &Node,
        pd: &PhysicalDevice,
        vg: &VolumeGroup,
        fs: &FileSystem,
        disk: &Disk,
    ) -> Vec<TaskEntry> {
        debug!(node = %node.item_id(), vg = %vg.item_id(), fs = %fs.item_id(), "Generating tasks for file system");

        let volume = Self::volume_task(node, pd, vg, fs, disk);
        if !fs.is_ext4() {
            return vec![volume.into()];
        }

        let mounts = Self::mount_tasks(node, pd, vg, fs);
        if mounts.is_empty() {
            return vec![volume.into()];
        }

        let owner = node
            .storage_profile
            .as_deref()
            .map(|profile| profile.vpath().to_string())
            .unwrap_or_else(|| vg.vpath().to_string());

        let mut tasks = Vec::with_capacity(1 + mounts.len());
        tasks.push(volume);
        tasks.extend(mounts);
        vec![OrderedTaskList::new(owner, tasks).into()]
    }
}

impl VolumeDriver for LvmDriver {
    fn kind(&self) -> VolumeDriverKind {
        VolumeDriverKind::Lvm
    }

    fn validate_node(&self, node: &Node) -> Vec<ValidationError> {
        let (Some(system), Some(profile)) = (node.system.as_deref(), node.storage_profile.as_deref())
        else {
            return Vec::new();
        };

        let mut errors = self.validate_disk_capacity(node, system, profile);
        errors.extend(self.validate_extent_alignment(node, profile));
        errors
    }

    fn generate_tasks_for_volume_group(&self, node: &Node, vg: &VolumeGroup) -> Vec<TaskEntry> {
        debug!(node = %node.item_id(), vg = %vg.item_id(), "Generating tasks for volume group");

        let pd = vg.physical_device();
        let disk = match (pd, node.system.as_deref()) {
            (Some(pd), Some(system)) => system.disk_for_device(&pd.device_name),
            _ => None,
        };

        let mut entries = Vec::new();
        for fs in &vg.file_systems {
            if !any_needs_apply(&[
                pd.map(|pd| pd as &dyn ModelItem),
                Some(vg as &dyn ModelItem),
                Some(fs as &dyn ModelItem),
            ]) {
                debug!(node = %node.item_id(), fs = %fs.item_id(), "File system converged, skipping");
                continue;
            }

            let (Some(pd), Some(disk)) = (pd, disk) else {
                warn!(
                    node = %node.item_id(),
                    vg = %vg.item_id(),
                    fs = %fs.item_id(),
                    "No system disk resolved for volume group, skipping file system"
                );
                continue;
            };

            entries.extend(Self::tasks_for_file_system(node, pd, vg, fs, disk));
        }

        entries
    }
}
