//! Codec types and traits
//!
//! Defines the abstractions every union family plugs into.

use crate::error::Result;
use crate::types::{DecodeOptions, JsonValue};
use serde::{Serialize, Serializer};
use std::fmt;
use std::hash::Hash;

// ============================================================================
// Wire Tag
// ============================================================================

/// A discriminator value as it appears on the wire
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WireTag {
    /// String tag, e.g. `"uniqueness"` or a wrapper key like `"groupsAcl"`
    Text(String),
    /// Integer tag
    Integer(i64),
}

impl WireTag {
    /// Read a tag from a JSON scalar. Returns None for any other shape.
    pub fn from_json(value: &JsonValue) -> Option<Self> {
        match value {
            JsonValue::String(s) => Some(Self::Text(s.clone())),
            JsonValue::Number(n) => n.as_i64().map(Self::Integer),
            _ => None,
        }
    }

    /// Convert back to a JSON scalar
    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Text(s) => JsonValue::String(s.clone()),
            Self::Integer(n) => JsonValue::from(*n),
        }
    }

    /// Get the string form if this is a text tag
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Integer(_) => None,
        }
    }

    /// Whether this is a text or an integer tag
    pub fn kind(&self) -> TagKind {
        match self {
            Self::Text(_) => TagKind::Text,
            Self::Integer(_) => TagKind::Integer,
        }
    }
}

/// JSON type of every tag in a family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    Text,
    Integer,
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("a string"),
            Self::Integer => f.write_str("an integer"),
        }
    }
}

impl fmt::Display for WireTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Integer(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for WireTag {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i64> for WireTag {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

// ============================================================================
// Union Traits
// ============================================================================

/// Base contract of a tagged union family: every value knows its tag
pub trait TaggedUnion: Sized {
    /// The tag enumeration. Must serialize to a JSON string or integer.
    type Tag: Copy + Eq + Hash + fmt::Debug + Serialize + Send + Sync + 'static;

    /// Tag of the variant this value holds
    fn tag(&self) -> Self::Tag;
}

/// A union family that can decode and encode itself as a JSON document.
///
/// Implemented by every family in [`crate::models`]; the serde glue in
/// [`crate::codec::nested`] is written against this trait.
pub trait Union: Sized {
    /// Decode a raw document. `Ok(None)` means an unknown variant was dropped.
    fn decode_document(doc: JsonValue, options: &DecodeOptions) -> Result<Option<Self>>;

    /// Encode into a raw document, envelope included
    fn encode_document(&self) -> Result<JsonValue>;
}

/// Common surface of [`TaggedCodec`](super::TaggedCodec) and
/// [`UntaggedCodec`](super::UntaggedCodec)
pub trait UnionCodec<U> {
    /// Family name used in errors and logs
    fn family(&self) -> &'static str;

    /// Decode a raw document with explicit options
    fn decode_with(&self, doc: JsonValue, options: &DecodeOptions) -> Result<Option<U>>;

    /// Encode a value into a raw document
    fn encode(&self, value: &U) -> Result<JsonValue>;

    /// Name of the concrete variant type held by `value`
    fn variant_name(&self, value: &U) -> Option<&'static str>;

    /// Wire tag of `value`, if the family is tagged
    fn wire_tag(&self, value: &U) -> Option<WireTag>;

    /// Static description of the family
    fn describe(&self) -> FamilyDescription;
}

// ============================================================================
// Descriptions
// ============================================================================

/// Summary of a union family, for listings and diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FamilyDescription {
    /// Family name
    pub family: &'static str,
    /// Where the tag lives, or "untagged"
    pub envelope: String,
    /// Variants in registration order
    pub variants: Vec<VariantDescription>,
}

/// One registered variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariantDescription {
    /// Wire tag (absent for untagged candidates)
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "tag_as_json")]
    pub tag: Option<WireTag>,
    /// Concrete variant type
    pub variant: &'static str,
}

fn tag_as_json<S: Serializer>(
    tag: &Option<WireTag>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    tag.as_ref().map(WireTag::to_json).serialize(serializer)
}
