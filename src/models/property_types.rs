//! Container property types
//!
//! Tagged by `type`. Primitive types share one payload shape but are distinct
//! variants, so each keeps its own tag on the wire.

use super::common::{ContainerReference, ViewReference};
use crate::codec::{static_union, Envelope, TaggedCodec, TaggedUnion, VariantRegistry};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Property type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyTypeVariant {
    Text,
    Boolean,
    Float32,
    Float64,
    Int32,
    Int64,
    Timestamp,
    Date,
    Json,
    Direct,
}

impl PropertyTypeVariant {
    /// Whether this tag uses the [`PrimitiveProperty`] payload
    pub fn is_primitive(self) -> bool {
        !matches!(self, Self::Text | Self::Direct)
    }
}

/// Text property
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextProperty {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collation: Option<String>,
}

/// Payload of every primitive property type
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimitiveProperty {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list: Option<bool>,
}

/// Direct relation to another node
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectRelationProperty {
    /// Container the target node must have data in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<ContainerReference>,
    /// View the target node is expected to implement
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ViewReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list: Option<bool>,
}

/// Type of a container or view property
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyType {
    Text(TextProperty),
    Boolean(PrimitiveProperty),
    Float32(PrimitiveProperty),
    Float64(PrimitiveProperty),
    Int32(PrimitiveProperty),
    Int64(PrimitiveProperty),
    Timestamp(PrimitiveProperty),
    Date(PrimitiveProperty),
    Json(PrimitiveProperty),
    Direct(DirectRelationProperty),
}

impl PropertyType {
    /// Plain text property
    pub fn text() -> Self {
        Self::Text(TextProperty::default())
    }

    /// Direct relation without target constraints
    pub fn direct() -> Self {
        Self::Direct(DirectRelationProperty::default())
    }

    /// Build a primitive property. Returns None for `Text` and `Direct`.
    pub fn primitive(variant: PropertyTypeVariant, list: bool) -> Option<Self> {
        let payload = PrimitiveProperty {
            list: list.then_some(true),
        };
        let value = match variant {
            PropertyTypeVariant::Boolean => Self::Boolean(payload),
            PropertyTypeVariant::Float32 => Self::Float32(payload),
            PropertyTypeVariant::Float64 => Self::Float64(payload),
            PropertyTypeVariant::Int32 => Self::Int32(payload),
            PropertyTypeVariant::Int64 => Self::Int64(payload),
            PropertyTypeVariant::Timestamp => Self::Timestamp(payload),
            PropertyTypeVariant::Date => Self::Date(payload),
            PropertyTypeVariant::Json => Self::Json(payload),
            PropertyTypeVariant::Text | PropertyTypeVariant::Direct => return None,
        };
        Some(value)
    }

    pub fn variant(&self) -> PropertyTypeVariant {
        self.tag()
    }

    /// Whether the property holds a list of values
    pub fn is_list(&self) -> bool {
        let list = match self {
            Self::Text(p) => p.list,
            Self::Direct(p) => p.list,
            Self::Boolean(p)
            | Self::Float32(p)
            | Self::Float64(p)
            | Self::Int32(p)
            | Self::Int64(p)
            | Self::Timestamp(p)
            | Self::Date(p)
            | Self::Json(p) => p.list,
        };
        list.unwrap_or(false)
    }

    pub fn codec() -> &'static TaggedCodec<PropertyType> {
        &PROPERTY_TYPES
    }
}

impl TaggedUnion for PropertyType {
    type Tag = PropertyTypeVariant;

    fn tag(&self) -> PropertyTypeVariant {
        match self {
            Self::Text(_) => PropertyTypeVariant::Text,
            Self::Boolean(_) => PropertyTypeVariant::Boolean,
            Self::Float32(_) => PropertyTypeVariant::Float32,
            Self::Float64(_) => PropertyTypeVariant::Float64,
            Self::Int32(_) => PropertyTypeVariant::Int32,
            Self::Int64(_) => PropertyTypeVariant::Int64,
            Self::Timestamp(_) => PropertyTypeVariant::Timestamp,
            Self::Date(_) => PropertyTypeVariant::Date,
            Self::Json(_) => PropertyTypeVariant::Json,
            Self::Direct(_) => PropertyTypeVariant::Direct,
        }
    }
}

static PROPERTY_TYPES: LazyLock<TaggedCodec<PropertyType>> = LazyLock::new(|| {
    use PropertyTypeVariant as V;

    let registry = VariantRegistry::builder("propertyType")
        .register(V::Text, PropertyType::Text, |p| match p {
            PropertyType::Text(t) => Some(t),
            _ => None,
        })
        .register(V::Boolean, PropertyType::Boolean, |p| match p {
            PropertyType::Boolean(t) => Some(t),
            _ => None,
        })
        .register(V::Float32, PropertyType::Float32, |p| match p {
            PropertyType::Float32(t) => Some(t),
            _ => None,
        })
        .register(V::Float64, PropertyType::Float64, |p| match p {
            PropertyType::Float64(t) => Some(t),
            _ => None,
        })
        .register(V::Int32, PropertyType::Int32, |p| match p {
            PropertyType::Int32(t) => Some(t),
            _ => None,
        })
        .register(V::Int64, PropertyType::Int64, |p| match p {
            PropertyType::Int64(t) => Some(t),
            _ => None,
        })
        .register(V::Timestamp, PropertyType::Timestamp, |p| match p {
            PropertyType::Timestamp(t) => Some(t),
            _ => None,
        })
        .register(V::Date, PropertyType::Date, |p| match p {
            PropertyType::Date(t) => Some(t),
            _ => None,
        })
        .register(V::Json, PropertyType::Json, |p| match p {
            PropertyType::Json(t) => Some(t),
            _ => None,
        })
        .register(V::Direct, PropertyType::Direct, |p| match p {
            PropertyType::Direct(t) => Some(t),
            _ => None,
        })
        .build()
        .expect("property type registry is well-formed");
    TaggedCodec::new(registry, Envelope::field("type"))
});

static_union!(PropertyType, PROPERTY_TYPES);
