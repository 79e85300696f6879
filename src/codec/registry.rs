//! Variant registry
//!
//! Maps wire tags to concrete variant codecs. A registry is built once per
//! union family and never mutated afterwards.

use super::types::{TagKind, TaggedUnion, WireTag};
use std::any::TypeId;
use crate::error::{Error, Result};
use crate::types::JsonValue;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;

/// Structural decode error with the JSON path of the failing field
pub(crate) type PathError = serde_path_to_error::Error<serde_json::Error>;

type DecodeFn<U> = Box<dyn Fn(&JsonValue) -> std::result::Result<U, PathError> + Send + Sync>;
type EncodeFn<U> = Box<dyn Fn(&U) -> Option<serde_json::Result<JsonValue>> + Send + Sync>;
type HoldsFn<U> = Box<dyn Fn(&U) -> bool + Send + Sync>;

// ============================================================================
// Variant Codec
// ============================================================================

/// Decode/encode functions for one variant of union `U`.
///
/// Built from the variant's constructor (`wrap`) and an accessor that borrows
/// the payload back out of the union (`project`).
pub struct VariantCodec<U> {
    name: &'static str,
    type_id: TypeId,
    decode: DecodeFn<U>,
    encode: EncodeFn<U>,
    holds: HoldsFn<U>,
}

impl<U: 'static> VariantCodec<U> {
    /// Create a codec for the variant whose payload type is `V`
    pub fn new<V>(wrap: fn(V) -> U, project: fn(&U) -> Option<&V>) -> Self
    where
        V: Serialize + DeserializeOwned + 'static,
    {
        Self {
            name: short_type_name::<V>(),
            type_id: TypeId::of::<V>(),
            decode: Box::new(move |doc: &JsonValue| {
                serde_path_to_error::deserialize::<_, V>(doc).map(wrap)
            }),
            encode: Box::new(move |value: &U| project(value).map(serde_json::to_value)),
            holds: Box::new(move |value: &U| project(value).is_some()),
        }
    }

    /// Name of the payload type
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Identity of the payload type; names can repeat across modules
    pub(crate) fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Whether `value` holds this variant
    pub fn holds(&self, value: &U) -> bool {
        (self.holds)(value)
    }

    /// Decode `doc` as this variant, keeping the raw path error
    pub(crate) fn try_decode(&self, doc: &JsonValue) -> std::result::Result<U, PathError> {
        (self.decode)(doc)
    }

    /// Decode `doc` as this variant
    pub fn decode(&self, family: &str, doc: &JsonValue) -> Result<U> {
        self.try_decode(doc).map_err(|e| Error::VariantDecode {
            family: family.to_string(),
            variant: self.name.to_string(),
            path: e.path().to_string(),
            message: e.inner().to_string(),
        })
    }

    /// Encode the payload of `value`, without any envelope
    pub fn encode(&self, family: &str, value: &U) -> Result<JsonValue> {
        match (self.encode)(value) {
            Some(Ok(payload)) => Ok(payload),
            Some(Err(e)) => Err(Error::Encode {
                family: family.to_string(),
                variant: self.name.to_string(),
                message: e.to_string(),
            }),
            None => Err(Error::unregistered(family, self.name)),
        }
    }
}

impl<U> std::fmt::Debug for VariantCodec<U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VariantCodec")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Type name without its module path, e.g. `Node<serde_json::value::Value>`
pub(crate) fn short_type_name<V>() -> &'static str {
    let full = std::any::type_name::<V>();
    let base = full.split('<').next().unwrap_or(full);
    let start = base.rfind("::").map_or(0, |i| i + 2);
    &full[start..]
}

// ============================================================================
// Registry
// ============================================================================

/// One registered (tag, variant) pair
#[derive(Debug)]
pub struct VariantEntry<U: TaggedUnion> {
    tag: U::Tag,
    wire: WireTag,
    codec: VariantCodec<U>,
}

impl<U: TaggedUnion> VariantEntry<U> {
    /// Tag enumeration member
    pub fn tag(&self) -> U::Tag {
        self.tag
    }

    /// Tag as it appears on the wire
    pub fn wire(&self) -> &WireTag {
        &self.wire
    }

    /// Codec of the variant
    pub fn codec(&self) -> &VariantCodec<U> {
        &self.codec
    }
}

/// Immutable tag → variant table for one tagged union family
#[derive(Debug)]
pub struct VariantRegistry<U: TaggedUnion> {
    family: &'static str,
    entries: Vec<VariantEntry<U>>,
    tag_kind: TagKind,
    by_wire: HashMap<WireTag, usize>,
    by_tag: HashMap<U::Tag, usize>,
}

impl<U: TaggedUnion + 'static> VariantRegistry<U> {
    /// Start building a registry
    pub fn builder(family: &'static str) -> RegistryBuilder<U> {
        RegistryBuilder {
            family,
            entries: Vec::new(),
            error: None,
        }
    }

    /// Family name
    pub fn family(&self) -> &'static str {
        self.family
    }

    /// JSON type shared by every tag of the family
    pub fn tag_kind(&self) -> TagKind {
        self.tag_kind
    }

    /// Find the entry for a wire tag
    pub fn lookup(&self, wire: &WireTag) -> Option<&VariantEntry<U>> {
        self.by_wire.get(wire).map(|&i| &self.entries[i])
    }

    /// Find the entry for a tag enumeration member
    pub fn get(&self, tag: U::Tag) -> Option<&VariantEntry<U>> {
        self.by_tag.get(&tag).map(|&i| &self.entries[i])
    }

    /// Find the entry a value was registered under.
    ///
    /// Returns None if the value's tag is unregistered or if the entry for
    /// that tag is a different variant than the one the value holds.
    pub fn reverse_lookup(&self, value: &U) -> Option<&VariantEntry<U>> {
        self.get(value.tag()).filter(|entry| entry.codec.holds(value))
    }

    /// Entries in registration order
    pub fn entries(&self) -> impl Iterator<Item = &VariantEntry<U>> {
        self.entries.iter()
    }

    /// Number of registered variants
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty (never true for a built registry)
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builder for [`VariantRegistry`]. Errors are reported by [`build`](Self::build).
pub struct RegistryBuilder<U: TaggedUnion> {
    family: &'static str,
    entries: Vec<VariantEntry<U>>,
    error: Option<Error>,
}

impl<U: TaggedUnion + 'static> RegistryBuilder<U> {
    /// Register the variant built by `wrap` under `tag`
    #[must_use]
    pub fn register<V>(
        mut self,
        tag: U::Tag,
        wrap: fn(V) -> U,
        project: fn(&U) -> Option<&V>,
    ) -> Self
    where
        V: Serialize + DeserializeOwned + 'static,
    {
        if self.error.is_some() {
            return self;
        }

        match wire_tag(self.family, &tag) {
            Ok(wire) => self.entries.push(VariantEntry {
                tag,
                wire,
                codec: VariantCodec::new(wrap, project),
            }),
            Err(e) => self.error = Some(e),
        }
        self
    }

    /// Finish the registry, rejecting duplicate tags and mixed tag kinds
    pub fn build(self) -> Result<VariantRegistry<U>> {
        if let Some(e) = self.error {
            return Err(e);
        }

        if self.entries.is_empty() {
            return Err(Error::EmptyRegistry {
                family: self.family.to_string(),
            });
        }

        let tag_kind = self.entries[0].wire.kind();
        if let Some(entry) = self.entries.iter().find(|e| e.wire.kind() != tag_kind) {
            return Err(Error::InvalidTag {
                family: self.family.to_string(),
                message: format!(
                    "tag {} is {} but earlier tags are {tag_kind}",
                    entry.wire,
                    entry.wire.kind()
                ),
            });
        }

        let mut by_wire = HashMap::with_capacity(self.entries.len());
        let mut by_tag = HashMap::with_capacity(self.entries.len());

        for (i, entry) in self.entries.iter().enumerate() {
            if by_wire.insert(entry.wire.clone(), i).is_some()
                || by_tag.insert(entry.tag, i).is_some()
            {
                return Err(Error::DuplicateTag {
                    family: self.family.to_string(),
                    tag: entry.wire.to_string(),
                });
            }
        }

        Ok(VariantRegistry {
            family: self.family,
            entries: self.entries,
            tag_kind,
            by_wire,
            by_tag,
        })
    }
}

/// Serialize a tag enumeration member into its wire form
fn wire_tag<K: Serialize>(family: &str, tag: &K) -> Result<WireTag> {
    let value = serde_json::to_value(tag).map_err(|e| Error::InvalidTag {
        family: family.to_string(),
        message: e.to_string(),
    })?;

    WireTag::from_json(&value).ok_or_else(|| Error::InvalidTag {
        family: family.to_string(),
        message: format!("tag {value} must serialize to a string or integer"),
    })
}
