//! Managed Nodes

use super::item::{ItemMeta, ModelItem};
use super::storage::StorageProfile;
use super::system::System;
use std::sync::Arc;

/// A managed node.
///
/// Systems and storage profiles are shared references: nodes linked to the
/// same profile hold the same instance.
#[derive(Debug, Clone)]
pub struct Node {
    pub meta: ItemMeta,
    pub hostname: String,
    pub system: Option<Arc<System>>,
    pub storage_profile: Option<Arc<StorageProfile>>,
}

impl ModelItem for Node {
    fn meta(&self) -> &ItemMeta {
        &self.meta
    }
}
