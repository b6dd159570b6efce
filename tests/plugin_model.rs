//! End-to-end validation and task generation from model files on disk

use assert_matches::assert_matches;
use std::io::Write;
use tempfile::NamedTempFile;
use volmgr::{ModelDocument, ModelSnapshot, TaskEntry, ValidationError, VolMgrPlugin};

// =============================================================================
// Fixtures
// =============================================================================

type Fs<'a> = (&'a str, &'a str, &'a str, &'a str);

struct Vg<'a> {
    id: &'a str,
    name: &'a str,
    driver: &'a str,
    file_systems: &'a [Fs<'a>],
    devices: &'a [(&'a str, &'a str)],
}

fn lvm<'a>(
    id: &'a str,
    name: &'a str,
    file_systems: &'a [Fs<'a>],
    devices: &'a [(&'a str, &'a str)],
) -> Vg<'a> {
    Vg {
        id,
        name,
        driver: "lvm",
        file_systems,
        devices,
    }
}

/// (id, bootable, uuid, name, size)
type DiskRow<'a> = (&'a str, &'a str, &'a str, &'a str, &'a str);

fn render(vgs: &[Vg], disks: &[DiskRow], link_system: bool) -> String {
    let mut yaml = String::from("systems:\n  - id: s1\n    system_name: MN1SYS\n");
    if disks.is_empty() {
        yaml.push_str("    disks: []\n");
    } else {
        yaml.push_str("    disks:\n");
        for (id, bootable, uuid, name, size) in disks {
            yaml.push_str(&format!(
                "      - {{ id: {}, name: {}, uuid: {}, size: {}, bootable: \"{}\" }}\n",
                id, name, uuid, size, bootable
            ));
        }
    }

    yaml.push_str(
        "storage_profiles:\n  - id: sp1\n    storage_profile_name: storage_profile_1\n    volume_groups:\n",
    );
    for vg in vgs {
        yaml.push_str(&format!(
            "      - id: {}\n        volume_group_name: {}\n        volume_driver: {}\n",
            vg.id, vg.name, vg.driver
        ));
        if vg.file_systems.is_empty() {
            yaml.push_str("        file_systems: []\n");
        } else {
            yaml.push_str("        file_systems:\n");
            for (id, fs_type, mount_point, size) in vg.file_systems {
                yaml.push_str(&format!(
                    "          - {{ id: {}, type: {}, mount_point: \"{}\", size: {} }}\n",
                    id, fs_type, mount_point, size
                ));
            }
        }
        yaml.push_str("        physical_devices:\n");
        for (id, device) in vg.devices {
            yaml.push_str(&format!(
                "          - {{ id: {}, device_name: {} }}\n",
                id, device
            ));
        }
    }

    yaml.push_str("nodes:\n  - id: n1\n    hostname: node1\n    storage_profile: storage_profile_1\n");
    if link_system {
        yaml.push_str("    system: MN1SYS\n");
    }
    yaml
}

fn load(yaml: &str) -> (ModelDocument, ModelSnapshot) {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();
    file.flush().unwrap();

    let document = ModelDocument::from_path(file.path()).unwrap();
    let snapshot = document.build().unwrap();
    (document, snapshot)
}

fn validate(vgs: &[Vg], disks: &[DiskRow]) -> Vec<ValidationError> {
    let (_, snapshot) = load(&render(vgs, disks, true));
    VolMgrPlugin::default().validate_model(&snapshot)
}

fn plan(vgs: &[Vg], disks: &[DiskRow], link_system: bool) -> Vec<TaskEntry> {
    let (_, snapshot) = load(&render(vgs, disks, link_system));
    VolMgrPlugin::default().create_configuration(&snapshot)
}

const ROOT_FS: &[Fs] = &[
    ("fs1", "ext4", "/", "10G"),
    ("fs2", "swap", "swap", "2G"),
    ("fs3", "ext4", "/home", "14G"),
];
const APP_FS: &[Fs] = &[("fs1", "ext4", "/opt", "10G"), ("fs2", "ext4", "/var", "20G")];
const PRIMARY: &[(&str, &str)] = &[("pd1", "primary")];
const SECONDARY: &[(&str, &str)] = &[("pd1", "secondary")];

const DISK1: DiskRow = ("disk1", "true", "ABCD_1234", "primary", "28G");
const DISK2: DiskRow = ("disk2", "false", "ABCD_1235", "secondary", "30G");

fn dataset1() -> Vec<Vg<'static>> {
    vec![lvm("vg1", "root_vg", ROOT_FS, PRIMARY)]
}

fn dataset2() -> Vec<Vg<'static>> {
    vec![lvm("vg2", "app_vg", APP_FS, SECONDARY)]
}

// =============================================================================
// Validation
// =============================================================================

#[test]
fn valid_root_profile_has_no_errors() {
    let yaml = render(&dataset1(), &[DISK1], true);
    let (document, snapshot) = load(&yaml);
    assert!(document.check_properties().is_empty());
    assert!(VolMgrPlugin::default().validate_model(&snapshot).is_empty());
}

#[test]
fn file_systems_larger_than_disk() {
    let errors = validate(
        &[lvm("vg1", "app_vg", APP_FS, PRIMARY)],
        &[("disk1", "true", "ABCD_1234", "primary", "25G")],
    );
    assert_eq!(errors.len(), 1);
    assert!(errors[0].item_path.ends_with("/volume_groups/vg1"));
}

#[test]
fn no_space_left_for_sundries() {
    let errors = validate(
        &[lvm(
            "vg1",
            "root_vg",
            &[("fs1", "ext4", "/", "10G"), ("fs2", "ext4", "/home", "20G")],
            PRIMARY,
        )],
        &[("disk1", "true", "ABCD_1234", "primary", "30G")],
    );
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("sundries (600 MBs)"));
}

#[test]
fn no_disks_for_physical_device() {
    let errors = validate(
        &[lvm("vg1", "root_vg", &[("fs1", "ext4", "/", "10G")], PRIMARY)],
        &[],
    );
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0].item_path, "/infrastructure/systems/s1");
    assert!(errors[1].item_path.ends_with("/physical_devices/pd1"));
}

#[test]
fn duplicate_volume_group_names() {
    let errors = validate(
        &[
            lvm("vg1", "root_vg", &[("fs1", "ext4", "/", "10G")], PRIMARY),
            lvm("vg2", "root_vg", &[("fs1", "ext4", "/home", "10G")], SECONDARY),
        ],
        &[
            ("disk1", "true", "ABCD_1234", "primary", "15G"),
            ("disk2", "false", "ABCD_1235", "secondary", "15G"),
        ],
    );
    assert_eq!(errors.len(), 2);
}

#[test]
fn duplicate_mount_points() {
    let errors = validate(
        &[lvm(
            "vg1",
            "root_vg",
            &[("fs1", "ext4", "/home", "10G"), ("fs2", "ext4", "/home", "20G")],
            PRIMARY,
        )],
        &[("disk1", "true", "ABCD_1234", "primary", "40G")],
    );
    assert_eq!(errors.len(), 2);
}

#[test]
fn swap_not_mounted_on_swap() {
    let errors = validate(
        &[lvm("vg1", "root_vg", &[("fs1", "swap", "/not_swap", "10G")], PRIMARY)],
        &[("disk1", "true", "ABCD_1234", "primary", "40G")],
    );
    assert_eq!(errors.len(), 1);
}

#[test]
fn disk_shared_by_two_volume_groups() {
    let errors = validate(
        &[
            lvm("vg1", "root_vg", &[], PRIMARY),
            lvm("vg2", "app_vg", &[], PRIMARY),
        ],
        &[("disk1", "true", "ABCD_1234", "primary", "40G")],
    );
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("multiple Physical Devices"));
}

#[test]
fn size_not_extent_aligned() {
    let errors = validate(
        &[lvm("vg1", "root_vg", &[("fs1", "ext4", "/", "11M")], PRIMARY)],
        &[("disk1", "true", "ABCD_1234", "primary", "40G")],
    );
    assert_eq!(errors.len(), 1);
}

// =============================================================================
// Task Generation
// =============================================================================

#[test]
fn root_profile_tasks() {
    let entries = plan(&dataset1(), &[DISK1], true);
    assert_eq!(entries.len(), 3);

    assert_matches!(&entries[0], TaskEntry::Single(task) if task.resource_title == "fs1");
    assert_matches!(&entries[1], TaskEntry::Single(task) if task.get_param("fstype") == Some("swap"));
    let list = assert_matches!(&entries[2], TaskEntry::Ordered(list) => list);
    assert_eq!(list.tasks.len(), 3);
    assert_eq!(list.tasks[2].get_param("device"), Some("/dev/root_vg/fs3"));
}

#[test]
fn only_root_volume_group_gets_tasks() {
    let mut vgs = dataset1();
    vgs.extend(dataset2());
    let entries = plan(&vgs, &[DISK1, DISK2], true);
    assert_eq!(entries.len(), 3);
    assert!(entries
        .iter()
        .flat_map(|e| e.tasks())
        .all(|t| t.item_path.contains("/volume_groups/vg1/")));
}

#[test]
fn profile_without_root_has_no_tasks() {
    assert!(plan(&dataset2(), &[DISK2], true).is_empty());
}

#[test]
fn node_without_system_has_no_tasks() {
    let entries = plan(
        &[lvm("vg1", "root_vg", &[("fs1", "ext4", "/", "10G")], PRIMARY)],
        &[("disk1", "true", "ABCD_1234", "primary", "15G")],
        false,
    );
    assert!(entries.is_empty());
}

#[test]
fn vxvm_root_group_has_no_tasks() {
    let vg = Vg {
        id: "vg1",
        name: "root_vg",
        driver: "vxvm",
        file_systems: &[("fs1", "ext4", "/", "10G")],
        devices: PRIMARY,
    };
    let vgs = [vg];
    let disks = [("disk1", "true", "ABCD_1234", "primary", "15G")];

    assert!(plan(&vgs, &disks, true).is_empty());
    assert!(validate(&vgs, &disks).is_empty());
}
