//! Process-lifetime defaults.
//!
//! Settings kinds read these once at construction. Install custom defaults
//! at startup, before any settings or registry is built.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::BsonError;
use crate::guid::{GuidRepresentation, GuidRepresentationMode};

static INSTALLED: OnceLock<BsonDefaults> = OnceLock::new();

/// Values that every settings kind starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BsonDefaults {
    pub max_serialization_depth: usize,
    pub max_document_size: usize,
    pub guid_representation_mode: GuidRepresentationMode,
    /// Legacy-mode representation used by readers and writers.
    pub guid_representation: GuidRepresentation,
}

impl BsonDefaults {
    pub const DEFAULT: BsonDefaults = BsonDefaults {
        max_serialization_depth: 100,
        max_document_size: 16 * 1024 * 1024,
        guid_representation_mode: GuidRepresentationMode::Legacy,
        guid_representation: GuidRepresentation::CSharpLegacy,
    };

    /// The installed defaults, or [`BsonDefaults::DEFAULT`].
    pub fn global() -> &'static BsonDefaults {
        INSTALLED.get().unwrap_or(&Self::DEFAULT)
    }

    /// Installs process defaults. Succeeds once.
    pub fn install(self) -> Result<(), BsonError> {
        INSTALLED
            .set(self)
            .map_err(|_| BsonError::Configuration("defaults are already installed".into()))?;
        tracing::info!(
            mode = ?self.guid_representation_mode,
            representation = %self.guid_representation,
            max_serialization_depth = self.max_serialization_depth,
            max_document_size = self.max_document_size,
            "installed BSON defaults"
        );
        Ok(())
    }

    /// Parses defaults from JSON. Missing fields keep their default values.
    pub fn from_json_str(json: &str) -> Result<Self, BsonError> {
        serde_json::from_str(json).map_err(|e| BsonError::Configuration(e.to_string()))
    }
}

impl Default for BsonDefaults {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let d = BsonDefaults::from_json_str(r#"{"guidRepresentationMode":"modern"}"#).unwrap();
        assert_eq!(d.guid_representation_mode, GuidRepresentationMode::Modern);
        assert_eq!(d.max_serialization_depth, 100);
        assert_eq!(d.guid_representation, GuidRepresentation::CSharpLegacy);
    }

    #[test]
    fn bad_json_is_a_configuration_error() {
        assert!(matches!(
            BsonDefaults::from_json_str(r#"{"maxDocumentSize":"big"}"#),
            Err(BsonError::Configuration(_))
        ));
    }
}
