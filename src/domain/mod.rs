//! Domain layer - Core value types and port definitions
//!
//! This module defines the traits (ports) that model stores and volume
//! drivers implement, plus the task and validation report types they
//! exchange with the plugin.

pub mod ports;
pub mod task;
pub mod validation;

pub use ports::*;
pub use task::*;
pub use validation::*;
