//! Common types used throughout cognite-unions
//!
//! This module contains shared type aliases and the decode policies
//! that every union codec honours.

use serde::{Deserialize, Serialize};

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// Unknown Variant Policy
// ============================================================================

/// What a tagged codec does with a well-formed tag it has no variant for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownVariantPolicy {
    /// Decode to no value, so newer server-side variants don't break readers
    #[default]
    Permissive,
    /// Fail with `Error::UnknownVariant`
    Strict,
}

// ============================================================================
// Ambiguity Policy
// ============================================================================

/// How an untagged codec resolves a document that fits several candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmbiguityPolicy {
    /// The first candidate in registration order wins
    #[default]
    FirstMatch,
    /// Fail with `Error::AmbiguousVariant`
    Reject,
}

// ============================================================================
// Decode Options
// ============================================================================

/// Per-call decode settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
    /// Handling of unregistered tags (tagged unions)
    pub unknown_variants: UnknownVariantPolicy,
    /// Handling of multiple structural matches (untagged unions)
    pub ambiguity: AmbiguityPolicy,
}

impl DecodeOptions {
    /// Options that fail on anything the registry doesn't know for sure
    pub fn strict() -> Self {
        Self {
            unknown_variants: UnknownVariantPolicy::Strict,
            ambiguity: AmbiguityPolicy::Reject,
        }
    }

    /// Set the unknown variant policy
    #[must_use]
    pub fn with_unknown_variants(mut self, policy: UnknownVariantPolicy) -> Self {
        self.unknown_variants = policy;
        self
    }

    /// Set the ambiguity policy
    #[must_use]
    pub fn with_ambiguity(mut self, policy: AmbiguityPolicy) -> Self {
        self.ambiguity = policy;
        self
    }

    /// Whether unknown tags are dropped instead of rejected
    pub fn is_permissive(&self) -> bool {
        self.unknown_variants == UnknownVariantPolicy::Permissive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_options_default() {
        let options = DecodeOptions::default();
        assert_eq!(options.unknown_variants, UnknownVariantPolicy::Permissive);
        assert_eq!(options.ambiguity, AmbiguityPolicy::FirstMatch);
        assert!(options.is_permissive());
    }

    #[test]
    fn test_decode_options_strict() {
        let options = DecodeOptions::strict();
        assert!(!options.is_permissive());
        assert_eq!(options.ambiguity, AmbiguityPolicy::Reject);
    }

    #[test]
    fn test_policy_serde() {
        let policy: UnknownVariantPolicy = serde_json::from_str("\"strict\"").unwrap();
        assert_eq!(policy, UnknownVariantPolicy::Strict);

        let json = serde_json::to_string(&AmbiguityPolicy::FirstMatch).unwrap();
        assert_eq!(json, "\"first_match\"");
    }

    #[test]
    fn test_decode_options_partial_yaml() {
        let options: DecodeOptions = serde_yaml::from_str("unknown_variants: strict").unwrap();
        assert_eq!(options.unknown_variants, UnknownVariantPolicy::Strict);
        assert_eq!(options.ambiguity, AmbiguityPolicy::FirstMatch);
    }
}
