//! Volume Drivers
//!
//! Technology-specific validation and task synthesis:
//! - LVM: extent and capacity rules, volume and mount tasks
//! - VxVM: registered, currently inert

pub mod lvm;
pub mod vxvm;

pub use lvm::*;
pub use vxvm::*;

use crate::config::PluginConfig;
use crate::domain::ports::VolumeDriver;
use crate::model::VolumeDriverKind;
use std::collections::BTreeMap;

/// Factory for creating volume drivers
pub struct DriverFactory;

impl DriverFactory {
    /// Create the driver for a technology
    pub fn create(kind: VolumeDriverKind, config: &PluginConfig) -> Box<dyn VolumeDriver> {
        match kind {
            VolumeDriverKind::Lvm => Box::new(LvmDriver::new(config.lvm.clone())),
            VolumeDriverKind::Vxvm => Box::new(VxvmDriver::new()),
        }
    }
}

/// Volume drivers keyed by technology
#[derive(Default)]
pub struct DriverRegistry {
    drivers: BTreeMap<VolumeDriverKind, Box<dyn VolumeDriver>>,
}

impl DriverRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding a driver for every known technology
    pub fn with_defaults(config: &PluginConfig) -> Self {
        let mut registry = Self::new();
        for kind in [VolumeDriverKind::Lvm, VolumeDriverKind::Vxvm] {
            registry.register(DriverFactory::create(kind, config));
        }
        registry
    }

    /// Register a driver, replacing any driver for the same technology
    pub fn register(&mut self, driver: Box<dyn VolumeDriver>) {
        self.drivers.insert(driver.kind(), driver);
    }

    pub fn get(&self, kind: VolumeDriverKind) -> Option<&dyn VolumeDriver> {
        self.drivers.get(&kind).map(|driver| driver.as_ref())
    }

    /// Registered drivers, in technology order
    pub fn iter(&self) -> impl Iterator<Item = &dyn VolumeDriver> {
        self.drivers.values().map(|driver| driver.as_ref())
    }

    pub fn len(&self) -> usize {
        self.drivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty()
    }
}

impl std::fmt::Debug for DriverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.drivers.keys()).finish()
    }
}
