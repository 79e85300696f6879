//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, InputArgs};
use crate::config::{load_config, CodecConfig};
use crate::error::{Error, Result, ResultExt};
use crate::models::Family;
use crate::types::{AmbiguityPolicy, DecodeOptions, UnknownVariantPolicy};
use serde_json::{json, Value};
use std::fs;
use std::io;
use tracing::{info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Families => {
                self.output_message(&families_report()?);
                Ok(())
            }
            Commands::Decode { family, input } => {
                let doc = read_input(input)?;
                let options = self.decode_options(*family)?;
                self.output_message(&decode_report(*family, doc, &options)?);
                Ok(())
            }
            Commands::Tag { family, input } => {
                let doc = read_input(input)?;
                self.output_message(&tag_report(*family, &doc)?);
                Ok(())
            }
            Commands::Roundtrip { family, input } => {
                let doc = read_input(input)?;
                let options = self.decode_options(*family)?;
                let (report, matches) = roundtrip_report(*family, doc, &options)?;
                self.output_message(&report);

                if matches {
                    Ok(())
                } else {
                    Err(Error::Other(format!(
                        "Re-encoded '{family}' document differs from the input"
                    )))
                }
            }
        }
    }

    /// Load the codec configuration, or defaults when none is given
    fn load_codec_config(&self) -> Result<CodecConfig> {
        match &self.cli.config {
            Some(path) => {
                let config = load_config(path)?;
                info!(
                    "Loaded codec configuration from {} ({} family overrides)",
                    path.display(),
                    config.families.len()
                );
                Ok(config)
            }
            None => Ok(CodecConfig::default()),
        }
    }

    /// Options for `family`: configuration first, then command-line flags
    pub fn decode_options(&self, family: Family) -> Result<DecodeOptions> {
        let mut options = self.load_codec_config()?.options_for(family);

        if self.cli.strict {
            options.unknown_variants = UnknownVariantPolicy::Strict;
        }
        if self.cli.reject_ambiguous {
            options.ambiguity = AmbiguityPolicy::Reject;
        }

        Ok(options)
    }

    /// Output a message
    fn output_message(&self, msg: &Value) {
        if self.cli.pretty {
            println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
        } else {
            println!("{}", serde_json::to_string(msg).unwrap_or_default());
        }
    }
}

/// Read the input document from `--json`, `--file` or stdin
fn read_input(input: &InputArgs) -> Result<Value> {
    if let Some(inline) = &input.json {
        return serde_json::from_str(inline)
            .map_err(|e| Error::config(format!("Invalid inline JSON: {e}")));
    }

    let (content, source) = match &input.file {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(|e| {
                if e.kind() == io::ErrorKind::NotFound {
                    Error::FileNotFound {
                        path: path.display().to_string(),
                    }
                } else {
                    Error::Io(e)
                }
            })?;
            (content, path.display().to_string())
        }
        None => (io::read_to_string(io::stdin())?, "stdin".to_string()),
    };

    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {source}"))
}

/// Every family with its envelope and variants
pub fn families_report() -> Result<Value> {
    let families = Family::ALL
        .iter()
        .map(|family| family.describe())
        .collect::<Result<Vec<_>>>()?;

    Ok(json!({
        "type": "FAMILIES",
        "families": families
    }))
}

/// Decode `doc` and describe the outcome
pub fn decode_report(family: Family, doc: Value, options: &DecodeOptions) -> Result<Value> {
    let tag = family.peek_tag(&doc).ok().flatten();

    match family.decode(doc, options)? {
        Some(decoded) => Ok(json!({
            "type": "DECODED",
            "decoded": decoded
        })),
        None => {
            warn!(family = family.name(), "Unknown variant dropped");
            Ok(json!({
                "type": "DROPPED",
                "family": family,
                "tag": tag.map(|t| t.to_json()),
                "note": "unknown variant decodes to no value under the permissive policy; use --strict to fail instead"
            }))
        }
    }
}

/// Read only the discriminator of `doc`
pub fn tag_report(family: Family, doc: &Value) -> Result<Value> {
    match family.peek_tag(doc)? {
        Some(tag) => Ok(json!({
            "type": "TAG",
            "family": family,
            "envelope": family.envelope()?.map(|e| e.to_string()),
            "tag": tag.to_json()
        })),
        None => Ok(json!({
            "type": "TAG",
            "family": family,
            "tag": null,
            "note": "family is untagged; variants are resolved by structural trial"
        })),
    }
}

/// Decode and re-encode `doc`. Returns the report and whether the
/// re-encoding equals the input.
pub fn roundtrip_report(
    family: Family,
    doc: Value,
    options: &DecodeOptions,
) -> Result<(Value, bool)> {
    let Some(decoded) = family.decode(doc.clone(), options)? else {
        return Err(Error::Other(format!(
            "'{family}' document decoded to no value; nothing to re-encode"
        )));
    };

    let matches = decoded.value == doc;
    if !matches {
        warn!(
            family = family.name(),
            variant = decoded.variant,
            "Re-encoding differs from input"
        );
    }

    Ok((
        json!({
            "type": "ROUNDTRIP",
            "family": family,
            "variant": decoded.variant,
            "matches": matches,
            "input": doc,
            "encoded": decoded.value
        }),
        matches,
    ))
}
