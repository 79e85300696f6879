//! CLI commands and argument parsing

use crate::models::Family;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Inspect and validate CDF union payloads
#[derive(Parser, Debug)]
#[command(name = "cognite-unions")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Codec configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Fail on unknown tags instead of dropping the document
    #[arg(long, global = true)]
    pub strict: bool,

    /// Fail when an untagged document matches several variants
    #[arg(long, global = true)]
    pub reject_ambiguous: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List union families with their envelopes and variants
    Families,

    /// Decode a document and show the variant it resolves to
    Decode {
        /// Union family of the document
        #[arg(short = 'F', long)]
        family: Family,

        #[command(flatten)]
        input: InputArgs,
    },

    /// Read only the discriminator of a document
    Tag {
        /// Union family of the document
        #[arg(short = 'F', long)]
        family: Family,

        #[command(flatten)]
        input: InputArgs,
    },

    /// Decode, re-encode and compare with the input
    Roundtrip {
        /// Union family of the document
        #[arg(short = 'F', long)]
        family: Family,

        #[command(flatten)]
        input: InputArgs,
    },
}

/// Where to read the JSON document from (stdin when neither is given)
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// JSON file
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Inline JSON document
    #[arg(long, conflicts_with = "file")]
    pub json: Option<String>,
}
