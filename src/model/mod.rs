//! Configuration Model
//!
//! Read-only snapshot of the storage configuration model:
//! - Node: a managed node linking one System and one StorageProfile
//! - System: the node's disks
//! - StorageProfile: volume groups, physical devices and file systems
//!
//! Items are produced by the model store and are never mutated here.

pub mod item;
pub mod system;
pub mod storage;
pub mod node;
pub mod document;
pub mod snapshot;

pub use item::*;
pub use system::*;
pub use storage::*;
pub use node::*;
pub use document::*;
pub use snapshot::*;
