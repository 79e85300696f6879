//! Tagged union codec
//!
//! Decodes by reading the discriminator and dispatching through the
//! registry; encodes by reversing the lookup and re-adding the envelope.

use super::envelope::Envelope;
use super::extractor::read_tag;
use super::registry::VariantRegistry;
use super::types::{FamilyDescription, TaggedUnion, UnionCodec, VariantDescription, WireTag};
use crate::error::{Error, Result};
use crate::types::{DecodeOptions, JsonValue, UnknownVariantPolicy};
use tracing::debug;

/// Codec for a union family resolved by an explicit discriminator
#[derive(Debug)]
pub struct TaggedCodec<U: TaggedUnion> {
    registry: VariantRegistry<U>,
    envelope: Envelope,
    options: DecodeOptions,
}

impl<U: TaggedUnion + 'static> TaggedCodec<U> {
    /// Create a codec with default (permissive) options
    pub fn new(registry: VariantRegistry<U>, envelope: Envelope) -> Self {
        Self {
            registry,
            envelope,
            options: DecodeOptions::default(),
        }
    }

    /// Replace the default decode options
    #[must_use]
    pub fn with_options(mut self, options: DecodeOptions) -> Self {
        self.options = options;
        self
    }

    /// Family name
    pub fn family(&self) -> &'static str {
        self.registry.family()
    }

    /// The variant registry
    pub fn registry(&self) -> &VariantRegistry<U> {
        &self.registry
    }

    /// The envelope strategy
    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    /// Default decode options
    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    // ------------------------------------------------------------------------
    // Decoding
    // ------------------------------------------------------------------------

    /// Read the wire tag of `doc`, checked against the family's tag kind
    pub fn peek_tag(&self, doc: &JsonValue) -> Result<WireTag> {
        read_tag(self.family(), &self.envelope, self.registry.tag_kind(), doc)
    }

    /// Resolve the tag of `doc` without decoding its payload
    pub fn resolve_tag(&self, doc: &JsonValue) -> Result<Option<U::Tag>> {
        let wire = self.peek_tag(doc)?;
        match self.registry.lookup(&wire) {
            Some(entry) => Ok(Some(entry.tag())),
            None => self.on_unknown(&wire, &self.options),
        }
    }

    /// Decode with the codec's default options
    pub fn decode_value(&self, doc: JsonValue) -> Result<Option<U>> {
        self.decode_value_with(doc, &self.options)
    }

    /// Decode with explicit options
    pub fn decode_value_with(&self, doc: JsonValue, options: &DecodeOptions) -> Result<Option<U>> {
        let tag = self.peek_tag(&doc)?;
        let payload = self.envelope.strip(doc);

        let Some(entry) = self.registry.lookup(&tag) else {
            return self.on_unknown(&tag, options);
        };

        entry.codec().decode(self.family(), &payload).map(Some)
    }

    /// Decode, treating an unknown tag as an error regardless of options
    pub fn decode_strict(&self, doc: JsonValue) -> Result<U> {
        let options = self
            .options
            .with_unknown_variants(UnknownVariantPolicy::Strict);

        self.decode_value_with(doc, &options)?
            .ok_or_else(|| Error::malformed(self.family(), "strict decode produced no value"))
    }

    /// Parse and decode a JSON string
    pub fn decode_str(&self, body: &str) -> Result<Option<U>> {
        let doc: JsonValue = serde_json::from_str(body)?;
        self.decode_value(doc)
    }

    /// Parse and decode JSON bytes
    pub fn decode_slice(&self, bytes: &[u8]) -> Result<Option<U>> {
        let doc: JsonValue = serde_json::from_slice(bytes)?;
        self.decode_value(doc)
    }

    fn on_unknown<T>(&self, tag: &WireTag, options: &DecodeOptions) -> Result<Option<T>> {
        match options.unknown_variants {
            UnknownVariantPolicy::Permissive => {
                debug!(family = self.family(), tag = %tag, "Skipping unknown variant");
                Ok(None)
            }
            UnknownVariantPolicy::Strict => {
                Err(Error::unknown_variant(self.family(), tag.to_string()))
            }
        }
    }

    // ------------------------------------------------------------------------
    // Encoding
    // ------------------------------------------------------------------------

    /// Encode into a raw document, envelope included
    pub fn encode_value(&self, value: &U) -> Result<JsonValue> {
        let entry = self
            .registry
            .reverse_lookup(value)
            .ok_or_else(|| Error::unregistered(self.family(), format!("{:?}", value.tag())))?;

        let payload = entry.codec().encode(self.family(), value)?;
        self.envelope
            .enclose(self.family(), entry.codec().name(), entry.wire(), payload)
    }

    /// Encode into a JSON string
    pub fn encode_string(&self, value: &U) -> Result<String> {
        let doc = self.encode_value(value)?;
        Ok(serde_json::to_string(&doc)?)
    }
}

impl<U: TaggedUnion + 'static> UnionCodec<U> for TaggedCodec<U> {
    fn family(&self) -> &'static str {
        self.registry.family()
    }

    fn decode_with(&self, doc: JsonValue, options: &DecodeOptions) -> Result<Option<U>> {
        self.decode_value_with(doc, options)
    }

    fn encode(&self, value: &U) -> Result<JsonValue> {
        self.encode_value(value)
    }

    fn variant_name(&self, value: &U) -> Option<&'static str> {
        self.registry
            .reverse_lookup(value)
            .map(|entry| entry.codec().name())
    }

    fn wire_tag(&self, value: &U) -> Option<WireTag> {
        self.registry
            .reverse_lookup(value)
            .map(|entry| entry.wire().clone())
    }

    fn describe(&self) -> FamilyDescription {
        FamilyDescription {
            family: self.registry.family(),
            envelope: self.envelope.to_string(),
            variants: self
                .registry
                .entries()
                .map(|entry| VariantDescription {
                    tag: Some(entry.wire().clone()),
                    variant: entry.codec().name(),
                })
                .collect(),
        }
    }
}
