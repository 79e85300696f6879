//! CLI module
//!
//! Command-line interface for inspecting union payloads.
//!
//! # Commands
//!
//! - `families` - List families, envelopes and variants
//! - `decode` - Resolve a document to its variant
//! - `tag` - Read the discriminator only
//! - `roundtrip` - Decode, re-encode and compare

mod commands;
mod runner;

pub use commands::{Cli, Commands, InputArgs};
pub use runner::{decode_report, families_report, roundtrip_report, tag_report, Runner};
