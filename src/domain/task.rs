//! Configuration Tasks
//!
//! Idempotent change requests for the configuration backend. A task list
//! holds independent entries; an [`OrderedTaskList`] must be applied
//! strictly in sequence.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// =============================================================================
// Task
// =============================================================================

/// A single configuration change for one resource on one node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Item identifier of the target node
    pub node: String,
    /// Model item the task realises
    pub item_path: String,
    /// Human readable description
    pub description: String,
    /// Backend resource type, e.g. `lvm::volume`
    pub resource_type: String,
    /// Backend resource title
    pub resource_title: String,
    /// Resource parameters, in declaration order
    pub params: IndexMap<String, String>,
}

impl Task {
    pub fn new(
        node: impl Into<String>,
        item_path: impl Into<String>,
        description: impl Into<String>,
        resource_type: impl Into<String>,
        resource_title: impl Into<String>,
    ) -> Self {
        Self {
            node: node.into(),
            item_path: item_path.into(),
            description: description.into(),
            resource_type: resource_type.into(),
            resource_title: resource_title.into(),
            params: IndexMap::new(),
        }
    }

    /// Add a resource parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn get_param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

impl std::fmt::Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}[{}] on {} ({})",
            self.resource_type, self.resource_title, self.node, self.description
        )
    }
}

// =============================================================================
// Ordered Task List
// =============================================================================

/// Tasks that must be applied in exactly the listed order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderedTaskList {
    /// Model item owning the sequence
    pub item_path: String,
    pub tasks: Vec<Task>,
}

impl OrderedTaskList {
    pub fn new(item_path: impl Into<String>, tasks: Vec<Task>) -> Self {
        Self {
            item_path: item_path.into(),
            tasks,
        }
    }
}

// =============================================================================
// Task Entry
// =============================================================================

/// One top-level element of a task list.
///
/// No ordering holds between entries; only the tasks inside an
/// [`TaskEntry::Ordered`] entry are sequenced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaskEntry {
    Single(Task),
    Ordered(OrderedTaskList),
}

impl TaskEntry {
    /// Tasks carried by this entry, in application order
    pub fn tasks(&self) -> &[Task] {
        match self {
            TaskEntry::Single(task) => std::slice::from_ref(task),
            TaskEntry::Ordered(list) => &list.tasks,
        }
    }

    pub fn is_ordered(&self) -> bool {
        matches!(self, TaskEntry::Ordered(_))
    }
}

impl From<Task> for TaskEntry {
    fn from(task: Task) -> Self {
        TaskEntry::Single(task)
    }
}

impl From<OrderedTaskList> for TaskEntry {
    fn from(list: OrderedTaskList) -> Self {
        TaskEntry::Ordered(list)
    }
}
