//! Writer settings.

use crate::defaults::BsonDefaults;
use crate::error::BsonError;
use crate::guid::{GuidRepresentation, GuidRepresentationMode};

use super::settings::Freezable;

/// Options common to every writer.
#[derive(Debug, PartialEq, Eq)]
pub struct BsonWriterSettings {
    guid_representation_mode: GuidRepresentationMode,
    guid_representation: GuidRepresentation,
    max_serialization_depth: usize,
    frozen: bool,
}

impl BsonWriterSettings {
    pub const DEFAULTS: BsonWriterSettings = Self::from_defaults(&BsonDefaults::DEFAULT, true);

    /// Unfrozen settings built from [`BsonDefaults::global`].
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

    fn check_not_frozen(&self) -> Result<(), BsonError> {
        if self.frozen {
            return Err(BsonError::FrozenMutation(Self::NAME));
        }
        Ok(())
    }

    pub fn guid_representation_mode(&self) -> GuidRepresentationMode {
        self.guid_representation_mode
    }

    /// The representation GUIDs are written in. Legacy mode only.
    pub fn guid_representation(&self) -> Result<GuidRepresentation, BsonError> {
        if !self.guid_representation_mode.is_legacy() {
            return Err(BsonError::LegacyModeOnly(
                "BsonWriterSettings::guid_representation",
            ));
        }
        Ok(self.guid_representation)
    }

    /// Like [`Self::guid_representation`], but `Unspecified` in modern mode.
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
        self.check_not_frozen()?;
        if !self.guid_representation_mode.is_legacy() {
            return Err(BsonError::LegacyModeOnly(
                "BsonWriterSettings::set_guid_representation",
            ));
        }
        self.guid_representation = representation;
        Ok(self)
    }

    /// Nesting limit used to detect circular references.
    pub fn max_serialization_depth(&self) -> usize {
        self.max_serialization_depth
    }

    pub fn set_max_serialization_depth(&mut self, depth: usize) -> Result<&mut Self, BsonError> {
        self.check_not_frozen()?;
        self.max_serialization_depth = depth;
        Ok(self)
    }
}

impl Default for BsonWriterSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl Freezable for BsonWriterSettings {
    const NAME: &'static str = "BsonWriterSettings";

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
            guid_representation: if self.guid_representation_mode.is_legacy() {
                self.guid_representation
            } else {
                GuidRepresentation::Unspecified
            },
            max_serialization_depth: self.max_serialization_depth,
            frozen: false,
        }
    }
}

/// Settings for [`BsonBinaryWriter`](super::BsonBinaryWriter).
#[derive(Debug, PartialEq, Eq)]
pub struct BsonBinaryWriterSettings {
    base: BsonWriterSettings,
    max_document_size: usize,
    fix_old_binary_subtype_on_output: bool,
}

impl BsonBinaryWriterSettings {
    pub const DEFAULTS: BsonBinaryWriterSettings = BsonBinaryWriterSettings {
        base: BsonWriterSettings::DEFAULTS,
        max_document_size: BsonDefaults::DEFAULT.max_document_size,
        fix_old_binary_subtype_on_output: true,
    };

    pub fn new() -> Self {
        Self::with_defaults(BsonDefaults::global())
    }

    pub fn with_defaults(defaults: &BsonDefaults) -> Self {
        Self {
            base: BsonWriterSettings::with_defaults(defaults),
            max_document_size: defaults.max_document_size,
            fix_old_binary_subtype_on_output: true,
        }
    }

    pub fn base(&self) -> &BsonWriterSettings {
        &self.base
    }

    /// Shared options. Setters on the result still honor the frozen flag.
    pub fn base_mut(&mut self) -> &mut BsonWriterSettings {
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

    /// Whether OldBinary (0x02) values are written as generic Binary.
    pub fn fix_old_binary_subtype_on_output(&self) -> bool {
        self.fix_old_binary_subtype_on_output
    }

    pub fn set_fix_old_binary_subtype_on_output(
        &mut self,
        fix: bool,
    ) -> Result<&mut Self, BsonError> {
        if self.base.frozen {
            return Err(BsonError::FrozenMutation(Self::NAME));
        }
        self.fix_old_binary_subtype_on_output = fix;
        Ok(self)
    }
}

impl Default for BsonBinaryWriterSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl Freezable for BsonBinaryWriterSettings {
    const NAME: &'static str = "BsonBinaryWriterSettings";

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
            fix_old_binary_subtype_on_output: self.fix_old_binary_subtype_on_output,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn modern() -> BsonDefaults {
        BsonDefaults {
            guid_representation_mode: GuidRepresentationMode::Modern,
            ..BsonDefaults::DEFAULT
        }
    }

    #[test]
    fn defaults_constant_is_frozen() {
        assert!(BsonWriterSettings::DEFAULTS.is_frozen());
        assert!(BsonBinaryWriterSettings::DEFAULTS.is_frozen());
        assert_eq!(BsonWriterSettings::DEFAULTS.max_serialization_depth(), 100);
    }

    #[test]
    fn frozen_setters_fail() {
        let mut s = BsonWriterSettings::with_defaults(&BsonDefaults::DEFAULT);
        s.set_max_serialization_depth(5).unwrap();
        s.freeze();
        assert_eq!(
            s.set_max_serialization_depth(6).unwrap_err(),
            BsonError::FrozenMutation("BsonWriterSettings")
        );
        assert_eq!(s.max_serialization_depth(), 5);
    }

    #[test]
    fn frozen_check_comes_before_mode_check() {
        let mut s = BsonWriterSettings::with_defaults(&modern());
        s.freeze();
        assert!(matches!(
            s.set_guid_representation(GuidRepresentation::Standard),
            Err(BsonError::FrozenMutation(_))
        ));
    }

    #[test]
    fn guid_representation_is_legacy_only() {
        let mut s = BsonWriterSettings::with_defaults(&modern());
        assert!(matches!(
            s.guid_representation(),
            Err(BsonError::LegacyModeOnly(_))
        ));
        assert!(s.set_guid_representation(GuidRepresentation::Standard).is_err());
        assert_eq!(
            s.effective_guid_representation(),
            GuidRepresentation::Unspecified
        );
    }

    #[test]
    fn binary_settings_freeze_through_base() {
        let mut s = BsonBinaryWriterSettings::with_defaults(&BsonDefaults::DEFAULT);
        s.freeze();
        assert!(s.base().is_frozen());
        assert!(s.set_max_document_size(10).is_err());
        assert!(s.base_mut().set_max_serialization_depth(3).is_err());
        let copy = s.clone_unfrozen();
        assert!(!copy.is_frozen());
        assert_eq!(copy.max_document_size(), s.max_document_size());
    }
}
