//! VxVM Driver
//!
//! Veritas volume groups are accepted by the model but are not managed
//! yet: the driver reports nothing and generates nothing.

use crate::domain::ports::VolumeDriver;
use crate::domain::task::TaskEntry;
use crate::domain::validation::ValidationError;
use crate::model::{ModelItem, Node, VolumeDriverKind, VolumeGroup};
use tracing::debug;

/// VxVM volume driver
#[derive(Debug, Clone, Default)]
pub struct VxvmDriver;

impl VxvmDriver {
    pub fn new() -> Self {
        Self
    }
}

impl VolumeDriver for VxvmDriver {
    fn kind(&self) -> VolumeDriverKind {
        VolumeDriverKind::Vxvm
    }

    fn validate_node(&self, node: &Node) -> Vec<ValidationError> {
        debug!(node = %node.item_id(), "Validating node for VxVM");
        Vec::new()
    }

    fn generate_tasks_for_volume_group(&self, node: &Node, vg: &VolumeGroup) -> Vec<TaskEntry> {
        debug!(node = %node.item_id(), vg = %vg.item_id(), "Generating tasks for VxVM volume group");
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::ModelStore;
    use crate::testing::snapshot;

    #[test]
    fn test_vxvm_is_inert() {
        let model = snapshot(
            r#"
systems:
  - id: s1
    system_name: sys
    disks:
      - { id: disk1, name: primary, uuid: U, size: 1G, bootable: true }
storage_profiles:
  - id: sp1
    storage_profile_name: sp
    volume_groups:
      - id: vg1
        volume_group_name: root_vg
        volume_driver: vxvm
        physical_devices:
          - { id: pd1, device_name: nowhere }
        file_systems:
          - { id: fs1, type: ext4, mount_point: /, size: 11M }
nodes:
  - { id: n1, system: sys, storage_profile: sp }
"#,
        );
        let node = &model.nodes()[0];
        let vg = &node.storage_profile.as_ref().unwrap().volume_groups[0];
        let driver = VxvmDriver::new();

        assert_eq!(driver.kind(), VolumeDriverKind::Vxvm);
        assert!(driver.validate_node(node).is_empty());
        assert!(driver.generate_tasks_for_volume_group(node, vg).is_empty());
    }
}
