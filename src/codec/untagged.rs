//! Untagged union codec
//!
//! There is no discriminator: candidates are tried in registration order and
//! the first one that decodes wins. Order is part of the family definition.

use super::registry::VariantCodec;
use super::types::{FamilyDescription, UnionCodec, VariantDescription, WireTag};
use crate::error::{Error, Result};
use crate::types::{AmbiguityPolicy, DecodeOptions, JsonValue};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, trace};

/// Codec for a union family resolved by structural trial
#[derive(Debug)]
pub struct UntaggedCodec<U> {
    family: &'static str,
    candidates: Vec<VariantCodec<U>>,
    options: DecodeOptions,
}

impl<U: 'static> UntaggedCodec<U> {
    /// Start building an ordered candidate list
    pub fn builder(family: &'static str) -> CandidateListBuilder<U> {
        CandidateListBuilder {
            family,
            candidates: Vec::new(),
            error: None,
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
        self.family
    }

    /// Candidate type names in trial order
    pub fn candidates(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.candidates.iter().map(VariantCodec::name)
    }

    /// Decode with the codec's default options
    pub fn decode_value(&self, doc: JsonValue) -> Result<U> {
        self.decode_value_with(&doc, &self.options)
    }

    /// Decode with explicit options.
    ///
    /// With `AmbiguityPolicy::FirstMatch` the first candidate that decodes is
    /// returned and later candidates are not tried. With `Reject`, every
    /// candidate is tried and more than one match is an error.
    pub fn decode_value_with(&self, doc: &JsonValue, options: &DecodeOptions) -> Result<U> {
        let mut resolved: Option<(&'static str, U)> = None;
        let mut also_matched = Vec::new();
        let mut failures = Vec::new();

        for candidate in &self.candidates {
            match candidate.try_decode(doc) {
                Ok(value) => {
                    if resolved.is_some() {
                        also_matched.push(candidate.name());
                        continue;
                    }
                    resolved = Some((candidate.name(), value));
                    if options.ambiguity == AmbiguityPolicy::FirstMatch {
                        break;
                    }
                }
                Err(e) => {
                    trace!(
                        family = self.family,
                        candidate = candidate.name(),
                        error = %e,
                        "Candidate rejected"
                    );
                    failures.push(format!("{} at {}: {}", candidate.name(), e.path(), e.inner()));
                }
            }
        }

        let Some((variant, value)) = resolved else {
            return Err(Error::NoMatchingVariant {
                family: self.family.to_string(),
                attempts: failures.join("; "),
            });
        };

        if !also_matched.is_empty() {
            let candidates = std::iter::once(variant)
                .chain(also_matched)
                .map(str::to_string)
                .collect();
            return Err(Error::AmbiguousVariant {
                family: self.family.to_string(),
                candidates,
            });
        }

        debug!(family = self.family, variant, "Resolved untagged variant");
        Ok(value)
    }

    /// Parse and decode a JSON string
    pub fn decode_str(&self, body: &str) -> Result<U> {
        let doc: JsonValue = serde_json::from_str(body)?;
        self.decode_value(doc)
    }

    /// Parse and decode JSON bytes
    pub fn decode_slice(&self, bytes: &[u8]) -> Result<U> {
        let doc: JsonValue = serde_json::from_slice(bytes)?;
        self.decode_value(doc)
    }

    /// Encode using the runtime variant's own shape, with no wrapping
    pub fn encode_value(&self, value: &U) -> Result<JsonValue> {
        let candidate = self
            .candidates
            .iter()
            .find(|candidate| candidate.holds(value))
            .ok_or_else(|| Error::unregistered(self.family, "unlisted candidate"))?;

        candidate.encode(self.family, value)
    }

    /// Encode into a JSON string
    pub fn encode_string(&self, value: &U) -> Result<String> {
        let doc = self.encode_value(value)?;
        Ok(serde_json::to_string(&doc)?)
    }
}

impl<U: 'static> UnionCodec<U> for UntaggedCodec<U> {
    fn family(&self) -> &'static str {
        self.family
    }

    fn decode_with(&self, doc: JsonValue, options: &DecodeOptions) -> Result<Option<U>> {
        self.decode_value_with(&doc, options).map(Some)
    }

    fn encode(&self, value: &U) -> Result<JsonValue> {
        self.encode_value(value)
    }

    fn variant_name(&self, value: &U) -> Option<&'static str> {
        self.candidates
            .iter()
            .find(|candidate| candidate.holds(value))
            .map(VariantCodec::name)
    }

    fn wire_tag(&self, _value: &U) -> Option<WireTag> {
        None
    }

    fn describe(&self) -> FamilyDescription {
        FamilyDescription {
            family: self.family,
            envelope: "untagged".to_string(),
            variants: self
                .candidates
                .iter()
                .map(|candidate| VariantDescription {
                    tag: None,
                    variant: candidate.name(),
                })
                .collect(),
        }
    }
}

/// Builder for [`UntaggedCodec`]
pub struct CandidateListBuilder<U> {
    family: &'static str,
    candidates: Vec<VariantCodec<U>>,
    error: Option<Error>,
}

impl<U: 'static> CandidateListBuilder<U> {
    /// Append a candidate. Candidates are tried in the order they are added.
    #[must_use]
    pub fn candidate<V>(mut self, wrap: fn(V) -> U, project: fn(&U) -> Option<&V>) -> Self
    where
        V: Serialize + DeserializeOwned + 'static,
    {
        if self.error.is_some() {
            return self;
        }

        let codec = VariantCodec::new(wrap, project);
        if self.candidates.iter().any(|c| c.type_id() == codec.type_id()) {
            self.error = Some(Error::DuplicateVariant {
                family: self.family.to_string(),
                variant: codec.name().to_string(),
            });
        } else {
            self.candidates.push(codec);
        }
        self
    }

    /// Finish the candidate list
    pub fn build(self) -> Result<UntaggedCodec<U>> {
        if let Some(e) = self.error {
            return Err(e);
        }

        if self.candidates.is_empty() {
            return Err(Error::EmptyRegistry {
                family: self.family.to_string(),
            });
        }

        Ok(UntaggedCodec {
            family: self.family,
            candidates: self.candidates,
            options: DecodeOptions::default(),
        })
    }
}
