//! Catalog of every union family
//!
//! Lets callers that only know a family by name (configuration files, the
//! CLI) decode, inspect and describe documents without naming Rust types.
//! Instance families are handled with `serde_json::Value` as the property bag.

use super::capabilities::{Capability, Scope};
use super::constraints::Constraint;
use super::field_resolvers::FieldResolver;
use super::indexes::Index;
use super::instances::{InstanceCodec, SourceReference};
use super::property_types::PropertyType;
use super::query::TableExpression;
use super::views::{DataModelView, ViewProperty};
use crate::codec::{Envelope, FamilyDescription, UnionCodec, WireTag};
use crate::error::Result;
use crate::types::{DecodeOptions, JsonValue};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A union family known to this crate
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "camelCase")]
pub enum Family {
    Constraint,
    Index,
    PropertyType,
    InstanceWrite,
    InstanceRead,
    FieldResolver,
    ViewProperty,
    TableExpression,
    DataModelView,
    Capability,
    Scope,
    SourceReference,
}

impl Family {
    pub const ALL: [Family; 12] = [
        Family::Constraint,
        Family::Index,
        Family::PropertyType,
        Family::InstanceWrite,
        Family::InstanceRead,
        Family::FieldResolver,
        Family::ViewProperty,
        Family::TableExpression,
        Family::DataModelView,
        Family::Capability,
        Family::Scope,
        Family::SourceReference,
    ];

    /// Family name as used in errors, logs and configuration files
    pub fn name(self) -> &'static str {
        match self {
            Self::Constraint => "constraint",
            Self::Index => "index",
            Self::PropertyType => "propertyType",
            Self::InstanceWrite => "instanceWrite",
            Self::InstanceRead => "instanceRead",
            Self::FieldResolver => "fieldResolver",
            Self::ViewProperty => "viewProperty",
            Self::TableExpression => "tableExpression",
            Self::DataModelView => "dataModelView",
            Self::Capability => "capability",
            Self::Scope => "scope",
            Self::SourceReference => "sourceReference",
        }
    }

    /// Look up a family by its name or its kebab-case CLI name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|family| family.name() == name)
            .or_else(|| <Self as clap::ValueEnum>::from_str(name, false).ok())
    }

    /// Whether documents of this family carry a discriminator
    pub fn is_tagged(self) -> bool {
        !matches!(
            self,
            Self::ViewProperty | Self::TableExpression | Self::DataModelView
        )
    }

    /// Where the tag lives, or None for untagged families
    pub fn envelope(self) -> Result<Option<Envelope>> {
        let envelope = match self {
            Self::Constraint => Constraint::codec().envelope().clone(),
            Self::Index => Index::codec().envelope().clone(),
            Self::PropertyType => PropertyType::codec().envelope().clone(),
            Self::InstanceWrite => InstanceCodec::<JsonValue>::new()?.write().envelope().clone(),
            Self::InstanceRead => InstanceCodec::<JsonValue>::new()?.read().envelope().clone(),
            Self::FieldResolver => FieldResolver::codec().envelope().clone(),
            Self::Capability => Capability::codec().envelope().clone(),
            Self::Scope => Scope::codec().envelope().clone(),
            Self::SourceReference => SourceReference::codec().envelope().clone(),
            Self::ViewProperty | Self::TableExpression | Self::DataModelView => return Ok(None),
        };
        Ok(Some(envelope))
    }

    /// Read the tag of `doc` without decoding it. None for untagged families.
    pub fn peek_tag(self, doc: &JsonValue) -> Result<Option<WireTag>> {
        let tag = match self {
            Self::Constraint => Constraint::codec().peek_tag(doc)?,
            Self::Index => Index::codec().peek_tag(doc)?,
            Self::PropertyType => PropertyType::codec().peek_tag(doc)?,
            Self::InstanceWrite => InstanceCodec::<JsonValue>::new()?.write().peek_tag(doc)?,
            Self::InstanceRead => InstanceCodec::<JsonValue>::new()?.read().peek_tag(doc)?,
            Self::FieldResolver => FieldResolver::codec().peek_tag(doc)?,
            Self::Capability => Capability::codec().peek_tag(doc)?,
            Self::Scope => Scope::codec().peek_tag(doc)?,
            Self::SourceReference => SourceReference::codec().peek_tag(doc)?,
            Self::ViewProperty | Self::TableExpression | Self::DataModelView => return Ok(None),
        };
        Ok(Some(tag))
    }

    /// Registered tags or ordered candidates
    pub fn describe(self) -> Result<FamilyDescription> {
        let description = match self {
            Self::Constraint => Constraint::codec().describe(),
            Self::Index => Index::codec().describe(),
            Self::PropertyType => PropertyType::codec().describe(),
            Self::InstanceWrite => InstanceCodec::<JsonValue>::new()?.write().describe(),
            Self::InstanceRead => InstanceCodec::<JsonValue>::new()?.read().describe(),
            Self::FieldResolver => FieldResolver::codec().describe(),
            Self::ViewProperty => ViewProperty::codec().describe(),
            Self::TableExpression => TableExpression::codec().describe(),
            Self::DataModelView => DataModelView::codec().describe(),
            Self::Capability => Capability::codec().describe(),
            Self::Scope => Scope::codec().describe(),
            Self::SourceReference => SourceReference::codec().describe(),
        };
        Ok(description)
    }

    /// Decode `doc` and report what it resolved to.
    ///
    /// `Ok(None)` means the permissive policy dropped an unknown variant.
    pub fn decode(self, doc: JsonValue, options: &DecodeOptions) -> Result<Option<Decoded>> {
        match self {
            Self::Constraint => inspect(self, Constraint::codec(), doc, options),
            Self::Index => inspect(self, Index::codec(), doc, options),
            Self::PropertyType => inspect(self, PropertyType::codec(), doc, options),
            Self::InstanceWrite => {
                let instances = InstanceCodec::<JsonValue>::new()?;
                inspect(self, instances.write(), doc, options)
            }
            Self::InstanceRead => {
                let instances = InstanceCodec::<JsonValue>::new()?;
                inspect(self, instances.read(), doc, options)
            }
            Self::FieldResolver => inspect(self, FieldResolver::codec(), doc, options),
            Self::ViewProperty => inspect(self, ViewProperty::codec(), doc, options),
            Self::TableExpression => inspect(self, TableExpression::codec(), doc, options),
            Self::DataModelView => inspect(self, DataModelView::codec(), doc, options),
            Self::Capability => inspect(self, Capability::codec(), doc, options),
            Self::Scope => inspect(self, Scope::codec(), doc, options),
            Self::SourceReference => inspect(self, SourceReference::codec(), doc, options),
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of decoding a document through [`Family::decode`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decoded {
    pub family: Family,
    /// Concrete variant type
    pub variant: &'static str,
    /// Wire tag, absent for untagged families
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<JsonValue>,
    /// Canonical re-encoding of the decoded value
    pub value: JsonValue,
}

fn inspect<U, C>(
    family: Family,
    codec: &C,
    doc: JsonValue,
    options: &DecodeOptions,
) -> Result<Option<Decoded>>
where
    C: UnionCodec<U>,
{
    let Some(value) = codec.decode_with(doc, options)? else {
        return Ok(None);
    };

    Ok(Some(Decoded {
        family,
        variant: codec.variant_name(&value).unwrap_or("unknown"),
        tag: codec.wire_tag(&value).as_ref().map(WireTag::to_json),
        value: codec.encode(&value)?,
    }))
}
