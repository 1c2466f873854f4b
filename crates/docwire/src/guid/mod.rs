//! GUID representation compatibility layer.
//!
//! A 128-bit GUID has one canonical byte order (RFC 4122, [`Standard`]) and
//! several historical ones produced by older drivers. In [`Legacy`] mode the
//! historical layouts coexist and callers name the one they want at every
//! conversion; in [`Modern`] mode only the subtype decides.
//!
//! The mode is a plain value passed to each API that depends on it.
//! [`BsonDefaults::global`](crate::BsonDefaults::global) holds the process
//! default. Changing that default while conversions are in flight is not
//! supported.
//!
//! [`Standard`]: GuidRepresentation::Standard
//! [`Legacy`]: GuidRepresentationMode::Legacy
//! [`Modern`]: GuidRepresentationMode::Modern

pub mod converter;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use converter::{from_bytes, subtype_for, to_bytes};

/// Which GUID compatibility rules apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GuidRepresentationMode {
    /// Multiple historical byte layouts, tracked by a representation tag.
    #[default]
    Legacy,
    /// One canonical layout; binary values carry no representation tag.
    Modern,
}

impl GuidRepresentationMode {
    pub fn is_legacy(self) -> bool {
        matches!(self, Self::Legacy)
    }
}

/// Byte-layout convention for a GUID stored in a binary value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GuidRepresentation {
    /// Caller has not chosen. Never a legal conversion target.
    #[default]
    Unspecified,
    Standard,
    CSharpLegacy,
    JavaLegacy,
    PythonLegacy,
}

impl GuidRepresentation {
    /// `true` for the three historical layouts.
    pub fn is_legacy(self) -> bool {
        matches!(
            self,
            Self::CSharpLegacy | Self::JavaLegacy | Self::PythonLegacy
        )
    }
}

impl fmt::Display for GuidRepresentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
