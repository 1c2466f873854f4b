//! Reader settings.

use crate::defaults::BsonDefaults;
use crate::error::BsonError;
use crate::guid::{GuidRepresentation, GuidRepresentationMode};

use super::settings::Freezable;

/// Options common to every reader.
#[derive(Debug, PartialEq, Eq)]
pub struct BsonReaderSettings {
    guid_representation_mode: GuidRepresentationMode,
    guid_representation: GuidRepresentation,
    max_serialization_depth: usize,
    frozen: bool,
}

impl BsonReaderSettings {
    pub const DEFAULTS: BsonReaderSettings = Self::from_defaults(&BsonDefaults::DEFAULT, true);

    pub fn new() -> Self {
        Self::with_defaults(BsonDefaults::global())
    }

    pub fn with_defaults(defaults: &BsonDefaults) -> Self {
        Self::from_defaults(defaults, false)
    }

    const fn from_defaults(defaults: &BsonDefaults, frozen: bool) -> Self {
        Self {
            guid_representation_mode: defaults.guid_representation_mode,
            guid_representation: match defaults.guid_representation_mode {
                GuidRepresentationMode::Legacy => defaults.guid_representation,
                GuidRepresentationMode::Modern => GuidRepresentation::Unspecified,
            },
            max_serialization_depth: defaults.max_serialization_depth,
            frozen,
        }
    }

    pub fn guid_representation_mode(&self) -> GuidRepresentationMode {
        self.guid_representation_mode
    }

    /// The representation legacy-subtype GUIDs are assumed to be in.
    /// Legacy mode only.
    pub fn guid_representation(&self) -> Result<GuidRepresentation, BsonError> {
        if !self.guid_representation_mode.is_legacy() {
            return Err(BsonError::LegacyModeOnly(
                "BsonReaderSettings::guid_representation",
            ));
        }
        Ok(self.guid_representation)
    }

    pub fn effective_guid_representation(&self) -> GuidRepresentation {
        if self.guid_representation_mode.is_legacy() {
            self.guid_representation
        } else {
            GuidRepresentation::Unspecified
        }
    }

    pub fn set_guid_representation(
        &mut self,
        representation: GuidRepresentation,
    ) -> Result<&mut Self, BsonError> {
        if self.frozen {
            return Err(BsonError::FrozenMutation(Self::NAME));
        }
        if !self.guid_representation_mode.is_legacy() {
            return Err(BsonError::LegacyModeOnly(
                "BsonReaderSettings::set_guid_representation",
            ));
        }
        self.guid_representation = representation;
        Ok(self)
    }

    /// Nesting limit for containers read from untrusted input.
    pub fn max_serialization_depth(&self) -> usize {
        self.max_serialization_depth
    }

    pub fn set_max_serialization_depth(&mut self, depth: usize) -> Result<&mut Self, BsonError> {
        if self.frozen {
            return Err(BsonError::FrozenMutation(Self::NAME));
        }
        self.max_serialization_depth = depth;
        Ok(self)
    }
}

impl Default for BsonReaderSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl Freezable for BsonReaderSettings {
    const NAME: &'static str = "BsonReaderSettings";

    fn is_frozen(&self) -> bool {
        self.frozen
    }

    fn freeze(&mut self) -> &mut Self {
        self.frozen = true;
        self
    }

    fn clone_unfrozen(&self) -> Self {
        Self {
            guid_representation_mode: self.guid_representation_mode,
            guid_representation: self.effective_guid_representation(),
            max_serialization_depth: self.max_serialization_depth,
            frozen: false,
        }
    }
}

/// Settings for [`BsonBinaryReader`](super::BsonBinaryReader).
#[derive(Debug, PartialEq, Eq)]
pub struct BsonBinaryReaderSettings {
    base: BsonReaderSettings,
    max_document_size: usize,
    fix_old_binary_subtype_on_input: bool,
}

impl BsonBinaryReaderSettings {
    pub const DEFAULTS: BsonBinaryReaderSettings = BsonBinaryReaderSettings {
        base: BsonReaderSettings::DEFAULTS,
        max_document_size: BsonDefaults::DEFAULT.max_document_size,
        fix_old_binary_subtype_on_input: true,
    };

    pub fn new() -> Self {
        Self::with_defaults(BsonDefaults::global())
    }

    pub fn with_defaults(defaults: &BsonDefaults) -> Self {
        Self {
            base: BsonReaderSettings::with_defaults(defaults),
            max_document_size: defaults.max_document_size,
            fix_old_binary_subtype_on_input: true,
        }
    }

    pub fn base(&self) -> &BsonReaderSettings {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut BsonReaderSettings {
        &mut self.base
    }

    pub fn max_document_size(&self) -> usize {
        self.max_document_size
    }

    pub fn set_max_document_size(&mut self, size: usize) -> Result<&mut Self, BsonError> {
        if self.base.frozen {
            return Err(BsonError::FrozenMutation(Self::NAME));
        }
        self.max_document_size = size;
        Ok(self)
    }

    /// Whether OldBinary (0x02) values are surfaced as generic Binary.
    pub fn fix_old_binary_subtype_on_input(&self) -> bool {
        self.fix_old_binary_subtype_on_input
    }

    pub fn set_fix_old_binary_subtype_on_input(
        &mut self,
        fix: bool,
    ) -> Result<&mut Self, BsonError> {
        if self.base.frozen {
            return Err(BsonError::FrozenMutation(Self::NAME));
        }
        self.fix_old_binary_subtype_on_input = fix;
        Ok(self)
    }
}

impl Default for BsonBinaryReaderSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl Freezable for BsonBinaryReaderSettings {
    const NAME: &'static str = "BsonBinaryReaderSettings";

    fn is_frozen(&self) -> bool {
        self.base.frozen
    }

    fn freeze(&mut self) -> &mut Self {
        self.base.freeze();
        self
    }

    fn clone_unfrozen(&self) -> Self {
        Self {
            base: self.base.clone_unfrozen(),
            max_document_size: self.max_document_size,
            fix_old_binary_subtype_on_input: self.fix_old_binary_subtype_on_input,
        }
    }
}

/// Settings for a textual (extended JSON) reader. No options beyond the
/// shared reader core.
#[derive(Debug, PartialEq, Eq)]
pub struct JsonReaderSettings {
    base: BsonReaderSettings,
}

impl JsonReaderSettings {
    pub const DEFAULTS: JsonReaderSettings = JsonReaderSettings {
        base: BsonReaderSettings::DEFAULTS,
    };

    pub fn new() -> Self {
        Self::with_defaults(BsonDefaults::global())
    }

    pub fn with_defaults(defaults: &BsonDefaults) -> Self {
        Self {
            base: BsonReaderSettings::with_defaults(defaults),
        }
    }

    pub fn base(&self) -> &BsonReaderSettings {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut BsonReaderSettings {
        &mut self.base
    }
}

impl Default for JsonReaderSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl Freezable for JsonReaderSettings {
    const NAME: &'static str = "JsonReaderSettings";

    fn is_frozen(&self) -> bool {
        self.base.frozen
    }

    fn freeze(&mut self) -> &mut Self {
        self.base.freeze();
        self
    }

    fn clone_unfrozen(&self) -> Self {
        Self {
            base: self.base.clone_unfrozen(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clone_of_frozen_is_independent() {
        let mut s = JsonReaderSettings::with_defaults(&BsonDefaults::DEFAULT);
        s.base_mut()
            .set_guid_representation(GuidRepresentation::JavaLegacy)
            .unwrap();
        s.freeze();
        let mut copy = s.clone_unfrozen();
        copy.base_mut()
            .set_guid_representation(GuidRepresentation::Standard)
            .unwrap();
        assert_eq!(
            s.base().guid_representation().unwrap(),
            GuidRepresentation::JavaLegacy
        );
        assert_eq!(
            copy.base().guid_representation().unwrap(),
            GuidRepresentation::Standard
        );
    }

    #[test]
    fn freeze_is_idempotent() {
        let mut s = BsonBinaryReaderSettings::with_defaults(&BsonDefaults::DEFAULT);
        s.freeze().freeze();
        assert!(s.is_frozen());
        assert_eq!(
            s.set_fix_old_binary_subtype_on_input(false).unwrap_err(),
            BsonError::FrozenMutation("BsonBinaryReaderSettings")
        );
    }

    #[test]
    fn depth_limit_follows_defaults_and_survives_clone() {
        let defaults = BsonDefaults {
            max_serialization_depth: 7,
            ..BsonDefaults::DEFAULT
        };
        let mut s = BsonBinaryReaderSettings::with_defaults(&defaults);
        assert_eq!(s.base().max_serialization_depth(), 7);
        s.base_mut().set_max_serialization_depth(3).unwrap();
        s.freeze();
        assert_eq!(
            s.base_mut().set_max_serialization_depth(4).unwrap_err(),
            BsonError::FrozenMutation("BsonReaderSettings")
        );
        assert_eq!(s.clone_unfrozen().base().max_serialization_depth(), 3);
        assert_eq!(BsonReaderSettings::DEFAULTS.max_serialization_depth(), 100);
    }
}
