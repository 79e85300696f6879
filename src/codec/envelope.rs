//! Envelope strategies
//!
//! An envelope decides where a tagged union keeps its discriminator:
//! as a sibling field inside the payload object, or as the single key of
//! a wrapping object.

use super::types::WireTag;
use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue};
use std::fmt;

/// Placement of the tag in the wire format
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Envelope {
    /// Sibling field: `{"constraintType": "uniqueness", "properties": [...]}`
    Field(String),
    /// Single-key wrapper: `{"groupsAcl": {"actions": [...], "scope": {...}}}`
    SingleKey,
}

impl Envelope {
    /// Create a sibling-field envelope
    pub fn field(name: impl Into<String>) -> Self {
        Self::Field(name.into())
    }

    /// Remove the envelope from a document whose tag has already been read.
    ///
    /// Field mode drops the tag field; wrapper mode returns the inner value.
    pub(crate) fn strip(&self, doc: JsonValue) -> JsonValue {
        match (self, doc) {
            (Self::Field(field), JsonValue::Object(mut map)) => {
                map.remove(field.as_str());
                JsonValue::Object(map)
            }
            (Self::SingleKey, JsonValue::Object(map)) => map
                .into_iter()
                .next()
                .map_or(JsonValue::Null, |(_, inner)| inner),
            (_, other) => other,
        }
    }

    /// Put the envelope around an encoded payload
    pub(crate) fn enclose(
        &self,
        family: &str,
        variant: &str,
        tag: &WireTag,
        payload: JsonValue,
    ) -> Result<JsonValue> {
        match self {
            Self::Field(field) => match payload {
                JsonValue::Object(mut map) => {
                    map.insert(field.clone(), tag.to_json());
                    Ok(JsonValue::Object(map))
                }
                other => Err(Error::Encode {
                    family: family.to_string(),
                    variant: variant.to_string(),
                    message: format!(
                        "tag field '{field}' needs an object payload, got {}",
                        json_kind(&other)
                    ),
                }),
            },
            Self::SingleKey => {
                let mut map = JsonObject::new();
                map.insert(tag.to_string(), payload);
                Ok(JsonValue::Object(map))
            }
        }
    }
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(field) => write!(f, "field '{field}'"),
            Self::SingleKey => f.write_str("single-key wrapper"),
        }
    }
}

/// Short name of a JSON value's kind, for error messages
pub(crate) fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
