//! Codec configuration
//!
//! Decode policies can be set once for all families and overridden per family
//! in a YAML file:
//!
//! ```yaml
//! defaults:
//!   unknown_variants: strict
//! families:
//!   capability:
//!     unknown_variants: permissive
//!   dataModelView:
//!     ambiguity: reject
//! ```

use crate::error::{Error, Result};
use crate::models::Family;
use crate::types::{AmbiguityPolicy, DecodeOptions, UnknownVariantPolicy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

// ============================================================================
// Config Types
// ============================================================================

/// Decode policies for every union family
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CodecConfig {
    /// Policies applied to every family
    #[serde(default)]
    pub defaults: DecodeOptions,

    /// Per-family overrides, keyed by family name
    #[serde(default)]
    pub families: BTreeMap<String, FamilyOverride>,
}

/// Override of some policies for one family
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FamilyOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unknown_variants: Option<UnknownVariantPolicy>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ambiguity: Option<AmbiguityPolicy>,
}

impl CodecConfig {
    /// Effective options for `family`: defaults with its override applied
    pub fn options_for(&self, family: Family) -> DecodeOptions {
        let mut options = self.defaults;

        if let Some(overrides) = self.families.get(family.name()) {
            if let Some(policy) = overrides.unknown_variants {
                options.unknown_variants = policy;
            }
            if let Some(policy) = overrides.ambiguity {
                options.ambiguity = policy;
            }
        }

        options
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Load codec configuration from a YAML file
pub fn load_config(path: impl AsRef<Path>) -> Result<CodecConfig> {
    let path = path.as_ref();

    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound {
                path: path.display().to_string(),
            }
        } else {
            Error::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        }
    })?;

    load_config_from_str(&content)
}

/// Load codec configuration from a YAML string
pub fn load_config_from_str(yaml: &str) -> Result<CodecConfig> {
    // An empty file means "all defaults"
    if yaml.trim().is_empty() {
        return Ok(CodecConfig::default());
    }

    let config: CodecConfig = serde_yaml::from_str(yaml)
        .map_err(|e| Error::config(format!("Failed to parse codec config YAML: {e}")))?;

    validate_config(&config)?;
    Ok(config)
}

/// Validate family overrides
fn validate_config(config: &CodecConfig) -> Result<()> {
    for (name, overrides) in &config.families {
        let family = Family::from_name(name).ok_or_else(|| {
            let known: Vec<_> = Family::ALL.iter().map(|f| f.name()).collect();
            Error::config(format!(
                "Unknown union family '{name}'. Known families: {}",
                known.join(", ")
            ))
        })?;

        if family.name() != name.as_str() {
            return Err(Error::config(format!(
                "Family '{name}' must be written as '{}'",
                family.name()
            )));
        }

        // Policies only apply to the decode step they govern
        if family.is_tagged() && overrides.ambiguity.is_some() {
            return Err(Error::config(format!(
                "Family '{name}' is tagged; 'ambiguity' only applies to untagged families"
            )));
        }
        if !family.is_tagged() && overrides.unknown_variants.is_some() {
            return Err(Error::config(format!(
                "Family '{name}' is untagged; 'unknown_variants' only applies to tagged families"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str() {
        let yaml = r"
defaults:
  unknown_variants: strict
families:
  capability:
    unknown_variants: permissive
  dataModelView:
    ambiguity: reject
";

        let config = load_config_from_str(yaml).unwrap();
        assert_eq!(config.defaults.unknown_variants, UnknownVariantPolicy::Strict);
        assert_eq!(config.families.len(), 2);

        let capability = config.options_for(Family::Capability);
        assert_eq!(capability.unknown_variants, UnknownVariantPolicy::Permissive);

        let views = config.options_for(Family::DataModelView);
        assert_eq!(views.ambiguity, AmbiguityPolicy::Reject);
        assert_eq!(views.unknown_variants, UnknownVariantPolicy::Strict);

        let index = config.options_for(Family::Index);
        assert_eq!(index.unknown_variants, UnknownVariantPolicy::Strict);
        assert_eq!(index.ambiguity, AmbiguityPolicy::FirstMatch);
    }

    #[test]
    fn test_empty_config_is_default() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config, CodecConfig::default());
        assert_eq!(config.options_for(Family::Constraint), DecodeOptions::default());
    }

    #[test]
    fn test_unknown_family_rejected() {
        let yaml = r"
families:
  widget:
    unknown_variants: strict
";

        let err = load_config_from_str(yaml).unwrap_err();
        assert!(err.to_string().contains("Unknown union family 'widget'"));
    }

    #[test]
    fn test_cli_family_name_rejected_in_config() {
        let yaml = r"
families:
  property-type:
    unknown_variants: strict
";

        let err = load_config_from_str(yaml).unwrap_err();
        assert!(err.to_string().contains("'propertyType'"));
    }

    #[test]
    fn test_policy_for_wrong_kind_of_family_rejected() {
        let tagged = r"
families:
  constraint:
    ambiguity: reject
";
        assert!(load_config_from_str(tagged).is_err());

        let untagged = r"
families:
  viewProperty:
    unknown_variants: strict
";
        assert!(load_config_from_str(untagged).is_err());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let yaml = r"
default:
  unknown_variants: strict
";

        let err = load_config_from_str(yaml).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "defaults:\n  ambiguity: reject").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.defaults.ambiguity, AmbiguityPolicy::Reject);
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = load_config("/nonexistent/codec.yaml").unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }
}
