//! Domain Ports - Core trait definitions for the plugin
//!
//! These traits define the boundaries between the plugin logic and its
//! collaborators: the model store it reads and the volume drivers it
//! delegates technology-specific work to.

use crate::domain::task::TaskEntry;
use crate::domain::validation::ValidationError;
use crate::model::{Node, VolumeDriverKind, VolumeGroup};

// =============================================================================
// Model Store Port
// =============================================================================

/// Read-only access to the configuration model.
///
/// Implementations must return a consistent snapshot for the duration of a
/// validation or task generation pass.
pub trait ModelStore: Send + Sync {
    /// All managed nodes
    fn nodes(&self) -> &[Node];
}

// =============================================================================
// Volume Driver Port
// =============================================================================

/// Technology-specific validation and task generation.
///
/// Both operations must tolerate nodes and groups with nothing to do and
/// return an empty list rather than fail.
pub trait VolumeDriver: Send + Sync {
    /// Technology this driver serves
    fn kind(&self) -> VolumeDriverKind;

    /// Validate the driver's items on a node
    fn validate_node(&self, node: &Node) -> Vec<ValidationError>;

    /// Generate tasks for one volume group on a node
    fn generate_tasks_for_volume_group(&self, node: &Node, vg: &VolumeGroup) -> Vec<TaskEntry>;
}
