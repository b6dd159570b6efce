//! Node Rules
//!
//! Rules checking a node's system against its storage profile.

use crate::domain::validation::ValidationError;
use crate::model::{ModelItem, Node, StorageProfile, System};
use tracing::debug;

/// Exactly one disk of the system must be bootable. The finding is
/// attached to the system, not to its disks.
pub fn single_bootable_disk(node: &Node, system: &System) -> Vec<ValidationError> {
    let bootable = system.bootable_disks().count();
    if bootable == 1 {
        return Vec::new();
    }

    debug!(node = %node.item_id(), bootable, "Wrong number of bootable disks");
    vec![ValidationError::new(
        system.vpath(),
        format!(
            "One System Disk should have 'bootable' Property set to 'true', found {}",
            bootable
        ),
    )]
}

/// Each volume group's physical device must name a disk of the system.
/// Only the first physical device of a group is checked.
pub fn physical_devices_resolve(
    node: &Node,
    system: &System,
    profile: &StorageProfile,
) -> Vec<ValidationError> {
    profile
        .volume_groups
        .iter()
        .filter_map(|vg| vg.physical_device().map(|pd| (vg, pd)))
        .filter(|(_, pd)| system.disk_for_device(&pd.device_name).is_none())
        .map(|(vg, pd)| {
            debug!(
                node = %node.item_id(),
                vg = %vg.item_id(),
                pd = %pd.item_id(),
                device = %pd.device_name,
                "Physical device has no system disk"
            );
            ValidationError::new(
                pd.vpath(),
                format!("Failed to find System disk '{}'", pd.device_name),
            )
        })
        .collect()
}

/// A disk may back at most one physical device across the profile. One
/// finding per over-referenced disk.
pub fn disks_referenced_once(
    node: &Node,
    system: &System,
    profile: &StorageProfile,
) -> Vec<ValidationError> {
    system
        .disks
        .iter()
        .filter(|disk| {
            profile
                .physical_devices()
                .filter(|(_, pd)| disk.matches_device(&pd.device_name))
                .count()
                > 1
        })
        .map(|disk| {
            debug!(node = %node.item_id(), disk = %disk.item_id(), "Disk referenced by multiple physical devices");
            ValidationError::new(
                disk.vpath(),
                format!("Disk '{}' referenced by multiple Physical Devices", disk.name),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::ModelStore;
    use crate::model::ModelSnapshot;
    use crate::testing::snapshot;

    fn run<F>(model: &ModelSnapshot, rule: F) -> Vec<ValidationError>
    where
        F: Fn(&Node, &System, &StorageProfile) -> Vec<ValidationError>,
    {
        let node = &model.nodes()[0];
        rule(
            node,
            node.system.as_deref().unwrap(),
            node.storage_profile.as_deref().unwrap(),
        )
    }

    fn system_with_disks(disks: &str) -> ModelSnapshot {
        snapshot(&format!(
            "systems:\n  - id: s1\n    system_name: sys\n    disks:\n{}nodes:\n  - {{ id: n1, system: sys }}\n",
            disks
        ))
    }

    fn bootable_errors(model: &ModelSnapshot) -> Vec<ValidationError> {
        let node = &model.nodes()[0];
        single_bootable_disk(node, node.system.as_deref().unwrap())
    }

    #[test]
    fn test_single_bootable_disk() {
        let model = system_with_disks(
            "      - { id: d1, name: a, size: 10G, bootable: true }\n      - { id: d2, name: b, size: 10G, bootable: false }\n",
        );
        assert!(bootable_errors(&model).is_empty());
    }

    #[test]
    fn test_no_bootable_disk() {
        let model = system_with_disks("      - { id: d1, name: a, size: 10G, bootable: false }\n");
        assert_eq!(bootable_errors(&model).len(), 1);
    }

    #[test]
    fn test_two_bootable_disks() {
        let model = system_with_disks(
            "      - { id: d1, name: a, size: 10G, bootable: true }\n      - { id: d2, name: b, size: 10G, bootable: true }\n",
        );
        let errors = bootable_errors(&model);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].item_path, "/infrastructure/systems/s1");
    }

    const SHARED_DISK: &str = r#"
systems:
  - id: s1
    system_name: sys
    disks:
      - { id: disk1, name: primary, size: 40G, bootable: true }
      - { id: disk2, name: "", size: 40G, bootable: false }
storage_profiles:
  - id: sp1
    storage_profile_name: sp
    volume_groups:
      - id: vg1
        volume_group_name: root_vg
        physical_devices:
          - { id: pd1, device_name: primary }
      - id: vg2
        volume_group_name: app_vg
        physical_devices:
          - { id: pd1, device_name: primary }
      - id: vg3
        volume_group_name: data_vg
        physical_devices:
          - { id: pd1, device_name: missing }
          - { id: pd2, device_name: also_missing }
nodes:
  - { id: n1, system: sys, storage_profile: sp }
"#;

    #[test]
    fn test_physical_devices_resolve_first_device_only() {
        let model = snapshot(SHARED_DISK);
        let errors = run(&model, physical_devices_resolve);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].item_path.ends_with("/vg3/physical_devices/pd1"));
        assert!(errors[0].message.contains("'missing'"));
    }

    #[test]
    fn test_disk_referenced_twice() {
        let model = snapshot(SHARED_DISK);
        let errors = run(&model, disks_referenced_once);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].item_path, "/infrastructure/systems/s1/disks/disk1");
    }

    #[test]
    fn test_unnamed_disk_never_matches() {
        let model = snapshot(
            r#"
systems:
  - id: s1
    system_name: sys
    disks:
      - { id: disk1, size: 40G, bootable: true }
storage_profiles:
  - id: sp1
    storage_profile_name: sp
    volume_groups:
      - id: vg1
        volume_group_name: root_vg
        physical_devices:
          - { id: pd1, device_name: "" }
      - id: vg2
        volume_group_name: app_vg
        physical_devices:
          - { id: pd1, device_name: "" }
nodes:
  - { id: n1, system: sys, storage_profile: sp }
"#,
        );
        assert_eq!(run(&model, physical_devices_resolve).len(), 2);
        assert!(run(&model, disks_referenced_once).is_empty());
    }
}
