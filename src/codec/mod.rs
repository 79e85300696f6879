//! Tagged union codec module
//!
//! Supports: sibling-field tags, single-key wrappers, untagged candidate lists
//!
//! # Overview
//!
//! A union family is one closed or open set of payload shapes that can appear
//! wherever a shared contract is expected (constraints, property types, ACL
//! capabilities, ...). Each family is defined by data, not by a hand-written
//! converter:
//!
//! - a [`VariantRegistry`] mapping wire tags to variant codecs, plus an
//!   [`Envelope`] saying where the tag lives, gives a [`TaggedCodec`]
//! - an ordered candidate list gives an [`UntaggedCodec`]
//!
//! Decoding goes through a raw [`serde_json::Value`] document: the
//! discriminator is read first ([`peek_tag`] / [`extract`]), then the same
//! document is decoded as the concrete variant. Encoding serializes the
//! variant and puts the envelope back.
//!
//! ```rust,ignore
//! let registry = VariantRegistry::builder("constraint")
//!     .register(ConstraintType::Requires, Constraint::Requires, Constraint::as_requires)
//!     .register(ConstraintType::Uniqueness, Constraint::Uniqueness, Constraint::as_uniqueness)
//!     .build()?;
//! let codec = TaggedCodec::new(registry, Envelope::field("constraintType"));
//!
//! let constraint = codec.decode_str(r#"{"constraintType":"uniqueness","properties":["a"]}"#)?;
//! ```

mod envelope;
mod extractor;
pub mod nested;
mod registry;
mod tagged;
mod types;
mod untagged;

pub use envelope::Envelope;
pub use extractor::{extract, peek_tag, read_tag, Discriminated};
pub use registry::{RegistryBuilder, VariantCodec, VariantEntry, VariantRegistry};
pub use tagged::TaggedCodec;
pub use types::{
    FamilyDescription, TagKind, TaggedUnion, Union, UnionCodec, VariantDescription, WireTag,
};
pub use untagged::{CandidateListBuilder, UntaggedCodec};

pub(crate) use nested::static_union;
