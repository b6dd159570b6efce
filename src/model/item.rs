//! Model Items
//!
//! Identity and lifecycle state shared by every model item.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a model item, as tracked by the model store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ItemState {
    /// Created but never applied
    #[default]
    Initial,
    /// Changed since it was last applied
    Updated,
    /// Converged
    Applied,
}

impl ItemState {
    pub fn is_initial(&self) -> bool {
        matches!(self, ItemState::Initial)
    }

    pub fn is_updated(&self) -> bool {
        matches!(self, ItemState::Updated)
    }

    /// Whether the item still needs configuration work
    pub fn needs_apply(&self) -> bool {
        self.is_initial() || self.is_updated()
    }
}

impl std::fmt::Display for ItemState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemState::Initial => write!(f, "initial"),
            ItemState::Updated => write!(f, "updated"),
            ItemState::Applied => write!(f, "applied"),
        }
    }
}

/// Identity of a model item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemMeta {
    /// Item identifier, unique among its siblings
    pub item_id: String,
    /// Path of the item in the model tree
    pub vpath: String,
    /// Lifecycle state
    pub state: ItemState,
}

impl ItemMeta {
    pub fn new(item_id: impl Into<String>, vpath: impl Into<String>, state: ItemState) -> Self {
        Self {
            item_id: item_id.into(),
            vpath: vpath.into(),
            state,
        }
    }

    /// Meta for an item nested under `parent` in the `collection` child list
    pub fn child_of(
        parent: &ItemMeta,
        collection: &str,
        item_id: impl Into<String>,
        state: ItemState,
    ) -> Self {
        let item_id = item_id.into();
        let vpath = format!("{}/{}/{}", parent.vpath, collection, item_id);
        Self::new(item_id, vpath, state)
    }
}

/// Common accessors for model items
pub trait ModelItem {
    fn meta(&self) -> &ItemMeta;

    fn item_id(&self) -> &str {
        &self.meta().item_id
    }

    fn vpath(&self) -> &str {
        &self.meta().vpath
    }

    fn state(&self) -> ItemState {
        self.meta().state
    }
}

/// True when any of the items is initial or updated
pub fn any_needs_apply(items: &[Option<&dyn ModelItem>]) -> bool {
    items.iter().flatten().any(|item| item.state().needs_apply())
}
