//! Field resolvers of templated data models
//!
//! A resolver tells the template engine where a field's value comes from.
//! Tagged by `type`. `asset`, `timeSeries` and `event` resolve a single
//! resource by external id and share [`ReferenceResolver`].

use crate::codec::{static_union, Envelope, TaggedCodec, TaggedUnion, VariantRegistry};
use crate::types::JsonValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Resolver tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldResolverType {
    Constant,
    Raw,
    SyntheticTimeSeries,
    View,
    Asset,
    TimeSeries,
    Event,
}

/// A fixed value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstantResolver {
    pub value: JsonValue,
}

/// A column of a RAW table row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawResolver {
    pub db_name: String,
    pub table_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_key: Option<String>,
    /// Column to read; the whole row when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_name: Option<String>,
}

/// A time series computed from an expression over other series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyntheticTimeSeriesResolver {
    pub expression: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_step: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_string: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

/// Another view, optionally fed by a nested resolver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewResolver {
    pub external_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<Box<FieldResolver>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceResolver {
    pub external_id: String,
}

impl ReferenceResolver {
    pub fn new(external_id: impl Into<String>) -> Self {
        Self {
            external_id: external_id.into(),
        }
    }
}

/// Source of a templated field's value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldResolver {
    Constant(ConstantResolver),
    Raw(RawResolver),
    SyntheticTimeSeries(SyntheticTimeSeriesResolver),
    View(ViewResolver),
    Asset(ReferenceResolver),
    TimeSeries(ReferenceResolver),
    Event(ReferenceResolver),
}

impl FieldResolver {
    pub fn constant(value: impl Into<JsonValue>) -> Self {
        Self::Constant(ConstantResolver {
            value: value.into(),
        })
    }

    pub fn resolver_type(&self) -> FieldResolverType {
        self.tag()
    }

    /// External id of the referenced resource, for the reference kinds and `view`
    pub fn external_id(&self) -> Option<&str> {
        match self {
            Self::Asset(r) | Self::TimeSeries(r) | Self::Event(r) => Some(&r.external_id),
            Self::View(v) => Some(&v.external_id),
            _ => None,
        }
    }

    pub fn codec() -> &'static TaggedCodec<FieldResolver> {
        &FIELD_RESOLVERS
    }
}

impl TaggedUnion for FieldResolver {
    type Tag = FieldResolverType;

    fn tag(&self) -> FieldResolverType {
        match self {
            Self::Constant(_) => FieldResolverType::Constant,
            Self::Raw(_) => FieldResolverType::Raw,
            Self::SyntheticTimeSeries(_) => FieldResolverType::SyntheticTimeSeries,
            Self::View(_) => FieldResolverType::View,
            Self::Asset(_) => FieldResolverType::Asset,
            Self::TimeSeries(_) => FieldResolverType::TimeSeries,
            Self::Event(_) => FieldResolverType::Event,
        }
    }
}

static FIELD_RESOLVERS: LazyLock<TaggedCodec<FieldResolver>> = LazyLock::new(|| {
    use FieldResolverType as T;

    let registry = VariantRegistry::builder("fieldResolver")
        .register(T::Constant, FieldResolver::Constant, |r| match r {
            FieldResolver::Constant(c) => Some(c),
            _ => None,
        })
        .register(T::Raw, FieldResolver::Raw, |r| match r {
            FieldResolver::Raw(c) => Some(c),
            _ => None,
        })
        .register(T::SyntheticTimeSeries, FieldResolver::SyntheticTimeSeries, |r| match r {
            FieldResolver::SyntheticTimeSeries(c) => Some(c),
            _ => None,
        })
        .register(T::View, FieldResolver::View, |r| match r {
            FieldResolver::View(c) => Some(c),
            _ => None,
        })
        .register(T::Asset, FieldResolver::Asset, |r| match r {
            FieldResolver::Asset(c) => Some(c),
            _ => None,
        })
        .register(T::TimeSeries, FieldResolver::TimeSeries, |r| match r {
            FieldResolver::TimeSeries(c) => Some(c),
            _ => None,
        })
        .register(T::Event, FieldResolver::Event, |r| match r {
            FieldResolver::Event(c) => Some(c),
            _ => None,
        })
        .build()
        .expect("field resolver registry is well-formed");
    TaggedCodec::new(registry, Envelope::field("type"))
});

static_union!(FieldResolver, FIELD_RESOLVERS);
