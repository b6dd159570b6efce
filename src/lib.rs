//! Volume Manager Plugin
//!
//! Validates a declarative storage model (disks, volume groups, physical
//! devices, file systems attached to managed nodes) and turns a valid model
//! into idempotent configuration tasks for a configuration backend.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                          VolMgrPlugin                                 │
//! │         validate_model()              create_configuration()          │
//! ├───────────────────────────────┬──────────────────────────────────────┤
//! │          Rule Engine          │           Volume Drivers              │
//! │  profile rules (once/profile) │  ┌──────────────┐  ┌──────────────┐  │
//! │  node rules (once/node)       │  │     LVM      │  │     VxVM     │  │
//! │                               │  │ rules+tasks  │  │   (inert)    │  │
//! │                               │  └──────────────┘  └──────────────┘  │
//! ├───────────────────────────────┴──────────────────────────────────────┤
//! │                 Model Store (nodes, systems, profiles)                │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`plugin`]: Orchestration of validation and task generation
//! - [`rules`]: Technology-independent validation rules
//! - [`drivers`]: Technology-specific rules and task synthesis
//! - [`model`]: Configuration model snapshot and document loader
//! - [`domain`]: Ports, tasks and validation reports
//! - [`units`]: Size string conversion
//! - [`config`]: Plugin configuration
//! - [`error`]: Error types and handling

pub mod config;
pub mod domain;
pub mod drivers;
pub mod error;
pub mod model;
pub mod plugin;
pub mod rules;
pub mod units;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use config::{LvmConfig, PluginConfig};

pub use domain::{
    ModelStore, OrderedTaskList, Task, TaskEntry, ValidationError, VolumeDriver,
};

pub use drivers::{DriverFactory, DriverRegistry, LvmDriver, VxvmDriver};

pub use error::{Error, Result};

pub use model::{
    Disk, FileSystem, ItemState, ModelDocument, ModelSnapshot, Node, PhysicalDevice,
    StorageProfile, System, VolumeDriverKind, VolumeGroup,
};

pub use plugin::VolMgrPlugin;

pub use units::size_to_mb;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
