// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::large_enum_variant)]

//! # cognite-unions
//!
//! Polymorphic payloads of the Cognite Data Fusion API and the codec that
//! reads and writes them.
//!
//! ## Features
//!
//! - **Tagged unions**: discriminator in a sibling field or as a single-key wrapper
//! - **Untagged unions**: ordered structural trial with an opt-in ambiguity check
//! - **Forward compatibility**: unknown tags decode to no value unless strict
//! - **Serde glue**: union types nest as ordinary struct fields
//! - **Inspector CLI**: decode, tag lookup and round-trip checks from the shell
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cognite_unions::{Constraint, DecodeOptions, Result};
//!
//! fn main() -> Result<()> {
//!     let doc = serde_json::json!({"constraintType": "uniqueness", "properties": ["a"]});
//!
//!     // Permissive by default: unknown tags give `None`
//!     let constraint = Constraint::codec().decode_value(doc.clone())?;
//!
//!     // Strict per call
//!     let constraint = Constraint::codec().decode_value_with(doc, &DecodeOptions::strict())?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Union families (models)                  │
//! │ Constraint  Index  PropertyType  Instance*  FieldResolver   │
//! │ ViewProperty  DataModelView  TableExpression  Capability    │
//! └──────────────────────────────┬──────────────────────────────┘
//!                                │
//! ┌──────────────┬───────────────┴─┬──────────────┬─────────────┐
//! │   Registry   │    Envelope     │   Tagged     │  Untagged   │
//! ├──────────────┼─────────────────┼──────────────┼─────────────┤
//! │ tag → variant│ field 'x'       │ peek tag     │ try in order│
//! │ variant → tag│ single-key      │ decode/strip │ first wins  │
//! │ validation   │                 │ encode/inject│ or reject   │
//! └──────────────┴─────────────────┴──────────────┴─────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the codec and the union families
pub mod error;

/// Common types and decode policies
pub mod types;

/// Tagged and untagged union codec
pub mod codec;

/// Union families of the CDF API
pub mod models;

/// Codec configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use codec::{
    Envelope, FamilyDescription, TagKind, TaggedCodec, TaggedUnion, Union, UnionCodec,
    UntaggedCodec, VariantRegistry, WireTag,
};
pub use config::{load_config, load_config_from_str, CodecConfig, FamilyOverride};
pub use models::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
