//! In-memory model store

use super::node::Node;
use crate::domain::ports::ModelStore;

/// An immutable snapshot of managed nodes and everything they link to
#[derive(Debug, Clone, Default)]
pub struct ModelSnapshot {
    nodes: Vec<Node>,
}

impl ModelSnapshot {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl ModelStore for ModelSnapshot {
    fn nodes(&self) -> &[Node] {
        &self.nodes
    }
}
