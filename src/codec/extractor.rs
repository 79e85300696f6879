//! Discriminator extraction
//!
//! Reads the tag out of a raw document without decoding the payload.

use super::envelope::{json_kind, Envelope};
use super::types::{TagKind, WireTag};
use crate::error::{Error, Result};
use crate::types::JsonValue;

/// A document split into its tag and its envelope-free payload
#[derive(Debug, Clone, PartialEq)]
pub struct Discriminated {
    /// Tag read from the envelope
    pub tag: WireTag,
    /// Payload with the envelope removed
    pub payload: JsonValue,
}

/// Read the tag of `doc` according to `envelope`.
///
/// Fails with `MalformedPayload` when the document is not an object, the tag
/// field is missing, the tag is not a string or integer, or a wrapper object
/// does not have exactly one key.
pub fn peek_tag(family: &str, envelope: &Envelope, doc: &JsonValue) -> Result<WireTag> {
    let map = doc.as_object().ok_or_else(|| {
        Error::malformed(
            family,
            format!("expected a JSON object, found {}", json_kind(doc)),
        )
    })?;

    match envelope {
        Envelope::Field(field) => {
            let raw = map.get(field.as_str()).ok_or_else(|| {
                Error::malformed(family, format!("missing discriminator field '{field}'"))
            })?;

            WireTag::from_json(raw).ok_or_else(|| {
                Error::malformed(
                    family,
                    format!(
                        "discriminator field '{field}' must be a string or integer, found {}",
                        json_kind(raw)
                    ),
                )
            })
        }
        Envelope::SingleKey => {
            if map.len() != 1 {
                return Err(Error::malformed(
                    family,
                    format!("wrapper object must have exactly one key, found {}", map.len()),
                ));
            }
            map.keys()
                .next()
                .map(|key| WireTag::Text(key.clone()))
                .ok_or_else(|| Error::malformed(family, "wrapper object is empty"))
        }
    }
}

/// Read the tag of `doc` and check it has the family's tag kind.
///
/// Wrapper keys are always JSON strings, so for integer families the key
/// must parse as an integer. Fails with `MalformedPayload` on a kind
/// mismatch, e.g. `{"constraintType": 5}`.
pub fn read_tag(
    family: &str,
    envelope: &Envelope,
    kind: TagKind,
    doc: &JsonValue,
) -> Result<WireTag> {
    let tag = peek_tag(family, envelope, doc)?;

    match (tag, kind) {
        (WireTag::Text(key), TagKind::Integer) if *envelope == Envelope::SingleKey => {
            key.parse().map(WireTag::Integer).map_err(|_| {
                Error::malformed(family, format!("wrapper key '{key}' is not an integer tag"))
            })
        }
        (tag, kind) if tag.kind() == kind => Ok(tag),
        (tag, kind) => Err(Error::malformed(
            family,
            format!("discriminator must be {kind}, found {}", tag.kind()),
        )),
    }
}

/// Split `doc` into its tag and payload, consuming the document
pub fn extract(family: &str, envelope: &Envelope, doc: JsonValue) -> Result<Discriminated> {
    let tag = peek_tag(family, envelope, &doc)?;
    let payload = envelope.strip(doc);
    Ok(Discriminated { tag, payload })
}
