//! Test helpers

use crate::model::{ModelDocument, ModelSnapshot};

/// Build a snapshot from an inline YAML model document
pub(crate) fn snapshot(yaml: &str) -> ModelSnapshot {
    ModelDocument::from_yaml_str(yaml)
        .and_then(|doc| doc.build())
        .unwrap_or_else(|e| panic!("invalid test model: {}", e))
}
