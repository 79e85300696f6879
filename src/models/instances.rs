//! Nodes and edges
//!
//! Instances are generic over the property bag `T` chosen by the caller, so
//! their codecs cannot be process-wide statics. [`InstanceCodec`] builds the
//! write and read registries for one concrete `T`; build it once where the
//! type is known and reuse it.
//!
//! Both families are tagged by `instanceType` (`node` / `edge`).

use super::common::{present, ContainerReference, InstanceId, ViewReference};
use crate::codec::{
    nested, static_union, Envelope, TaggedCodec, TaggedUnion, Union, UnionCodec, VariantRegistry,
};
use crate::error::Result;
use crate::types::{DecodeOptions, JsonValue};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::sync::LazyLock;

/// Instance tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstanceType {
    Node,
    Edge,
}

// ============================================================================
// Property Sources
// ============================================================================

/// Source tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    View,
    Container,
}

/// The view or container that a set of instance properties belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceReference {
    View(ViewReference),
    Container(ContainerReference),
}

impl SourceReference {
    pub fn view(
        space: impl Into<String>,
        external_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self::View(ViewReference::new(space, external_id, version))
    }

    pub fn container(space: impl Into<String>, external_id: impl Into<String>) -> Self {
        Self::Container(ContainerReference::new(space, external_id))
    }

    pub fn as_view(&self) -> Option<&ViewReference> {
        match self {
            Self::View(v) => Some(v),
            Self::Container(_) => None,
        }
    }

    pub fn as_container(&self) -> Option<&ContainerReference> {
        match self {
            Self::Container(c) => Some(c),
            Self::View(_) => None,
        }
    }

    pub fn codec() -> &'static TaggedCodec<SourceReference> {
        &SOURCES
    }
}

impl TaggedUnion for SourceReference {
    type Tag = SourceType;

    fn tag(&self) -> SourceType {
        match self {
            Self::View(_) => SourceType::View,
            Self::Container(_) => SourceType::Container,
        }
    }
}

static SOURCES: LazyLock<TaggedCodec<SourceReference>> = LazyLock::new(|| {
    let registry = VariantRegistry::builder("sourceReference")
        .register(SourceType::View, SourceReference::View, SourceReference::as_view)
        .register(
            SourceType::Container,
            SourceReference::Container,
            SourceReference::as_container,
        )
        .build()
        .expect("source registry is well-formed");
    TaggedCodec::new(registry, Envelope::field("type"))
});

static_union!(SourceReference, SOURCES);

/// Property values written through one source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceData<T> {
    pub source: SourceReference,
    pub properties: T,
}

// ============================================================================
// Write Shapes
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct NodeWrite<T> {
    pub space: String,
    pub external_id: String,
    /// Optimistic concurrency guard; the write fails if the stored version differs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub existing_version: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<InstanceData<T>>,
}

impl<T> NodeWrite<T> {
    pub fn new(space: impl Into<String>, external_id: impl Into<String>) -> Self {
        Self {
            space: space.into(),
            external_id: external_id.into(),
            existing_version: None,
            sources: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: SourceReference, properties: T) -> Self {
        self.sources.push(InstanceData { source, properties });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct EdgeWrite<T> {
    pub space: String,
    pub external_id: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub edge_type: Option<InstanceId>,
    pub start_node: InstanceId,
    pub end_node: InstanceId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub existing_version: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<InstanceData<T>>,
}

impl<T> EdgeWrite<T> {
    pub fn new(
        space: impl Into<String>,
        external_id: impl Into<String>,
        start_node: InstanceId,
        end_node: InstanceId,
    ) -> Self {
        Self {
            space: space.into(),
            external_id: external_id.into(),
            edge_type: None,
            start_node,
            end_node,
            existing_version: None,
            sources: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_type(mut self, edge_type: InstanceId) -> Self {
        self.edge_type = Some(edge_type);
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: SourceReference, properties: T) -> Self {
        self.sources.push(InstanceData { source, properties });
        self
    }
}

/// A node or edge to create or update
#[derive(Debug, Clone, PartialEq)]
pub enum InstanceWrite<T> {
    Node(NodeWrite<T>),
    Edge(EdgeWrite<T>),
}

impl<T> InstanceWrite<T> {
    pub fn as_node(&self) -> Option<&NodeWrite<T>> {
        match self {
            Self::Node(n) => Some(n),
            Self::Edge(_) => None,
        }
    }

    pub fn as_edge(&self) -> Option<&EdgeWrite<T>> {
        match self {
            Self::Edge(e) => Some(e),
            Self::Node(_) => None,
        }
    }

    pub fn id(&self) -> InstanceId {
        match self {
            Self::Node(n) => InstanceId::new(&n.space, &n.external_id),
            Self::Edge(e) => InstanceId::new(&e.space, &e.external_id),
        }
    }
}

impl<T> TaggedUnion for InstanceWrite<T> {
    type Tag = InstanceType;

    fn tag(&self) -> InstanceType {
        match self {
            Self::Node(_) => InstanceType::Node,
            Self::Edge(_) => InstanceType::Edge,
        }
    }
}

impl<T> From<NodeWrite<T>> for InstanceWrite<T> {
    fn from(value: NodeWrite<T>) -> Self {
        Self::Node(value)
    }
}

impl<T> From<EdgeWrite<T>> for InstanceWrite<T> {
    fn from(value: EdgeWrite<T>) -> Self {
        Self::Edge(value)
    }
}

// ============================================================================
// Read Shapes
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: DeserializeOwned"))]
pub struct Node<T> {
    pub space: String,
    pub external_id: String,
    #[serde(default)]
    pub version: i64,
    #[serde(default)]
    pub created_time: i64,
    #[serde(default)]
    pub last_updated_time: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_time: Option<i64>,
    /// Properties keyed by space, then by `view/version`
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub properties: Option<T>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: DeserializeOwned"))]
pub struct Edge<T> {
    pub space: String,
    pub external_id: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub edge_type: Option<InstanceId>,
    pub start_node: InstanceId,
    pub end_node: InstanceId,
    #[serde(default)]
    pub version: i64,
    #[serde(default)]
    pub created_time: i64,
    #[serde(default)]
    pub last_updated_time: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_time: Option<i64>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub properties: Option<T>,
}

/// A node or edge as returned by the API
#[derive(Debug, Clone, PartialEq)]
pub enum InstanceRead<T> {
    Node(Node<T>),
    Edge(Edge<T>),
}

impl<T> InstanceRead<T> {
    pub fn as_node(&self) -> Option<&Node<T>> {
        match self {
            Self::Node(n) => Some(n),
            Self::Edge(_) => None,
        }
    }

    pub fn as_edge(&self) -> Option<&Edge<T>> {
        match self {
            Self::Edge(e) => Some(e),
            Self::Node(_) => None,
        }
    }

    pub fn id(&self) -> InstanceId {
        match self {
            Self::Node(n) => InstanceId::new(&n.space, &n.external_id),
            Self::Edge(e) => InstanceId::new(&e.space, &e.external_id),
        }
    }

    pub fn properties(&self) -> Option<&T> {
        match self {
            Self::Node(n) => n.properties.as_ref(),
            Self::Edge(e) => e.properties.as_ref(),
        }
    }

    pub fn is_deleted(&self) -> bool {
        match self {
            Self::Node(n) => n.deleted_time.is_some(),
            Self::Edge(e) => e.deleted_time.is_some(),
        }
    }
}

impl<T> TaggedUnion for InstanceRead<T> {
    type Tag = InstanceType;

    fn tag(&self) -> InstanceType {
        match self {
            Self::Node(_) => InstanceType::Node,
            Self::Edge(_) => InstanceType::Edge,
        }
    }
}

// ============================================================================
// Codec
// ============================================================================

/// Write and read codecs for instances with property bag `T`
#[derive(Debug)]
pub struct InstanceCodec<T> {
    write: TaggedCodec<InstanceWrite<T>>,
    read: TaggedCodec<InstanceRead<T>>,
}

impl<T> InstanceCodec<T>
where
    T: Serialize + DeserializeOwned + 'static,
{
    /// Build both registries for `T`
    pub fn new() -> Result<Self> {
        let write = VariantRegistry::<InstanceWrite<T>>::builder("instanceWrite")
            .register(InstanceType::Node, InstanceWrite::Node, InstanceWrite::as_node)
            .register(InstanceType::Edge, InstanceWrite::Edge, InstanceWrite::as_edge)
            .build()?;

        let read = VariantRegistry::<InstanceRead<T>>::builder("instanceRead")
            .register(InstanceType::Node, InstanceRead::Node, InstanceRead::as_node)
            .register(InstanceType::Edge, InstanceRead::Edge, InstanceRead::as_edge)
            .build()?;

        Ok(Self {
            write: TaggedCodec::new(write, Envelope::field("instanceType")),
            read: TaggedCodec::new(read, Envelope::field("instanceType")),
        })
    }

    /// Apply `options` to both codecs
    #[must_use]
    pub fn with_options(self, options: DecodeOptions) -> Self {
        Self {
            write: self.write.with_options(options),
            read: self.read.with_options(options),
        }
    }

    pub fn write(&self) -> &TaggedCodec<InstanceWrite<T>> {
        &self.write
    }

    pub fn read(&self) -> &TaggedCodec<InstanceRead<T>> {
        &self.read
    }

    pub fn decode_write(&self, doc: JsonValue) -> Result<Option<InstanceWrite<T>>> {
        self.write.decode_value(doc)
    }

    pub fn decode_read(&self, doc: JsonValue) -> Result<Option<InstanceRead<T>>> {
        self.read.decode_value(doc)
    }

    pub fn encode_write(&self, value: &InstanceWrite<T>) -> Result<JsonValue> {
        self.write.encode_value(value)
    }

    pub fn encode_read(&self, value: &InstanceRead<T>) -> Result<JsonValue> {
        self.read.encode_value(value)
    }
}

// Nested use (e.g. `Vec<InstanceWrite<T>>` in a request body) builds a codec
// per value, since there is no shared registry for an arbitrary `T`.

impl<T> Union for InstanceWrite<T>
where
    T: Serialize + DeserializeOwned + 'static,
{
    fn decode_document(doc: JsonValue, options: &DecodeOptions) -> Result<Option<Self>> {
        InstanceCodec::<T>::new()?.write().decode_with(doc, options)
    }

    fn encode_document(&self) -> Result<JsonValue> {
        InstanceCodec::<T>::new()?.write().encode(self)
    }
}

impl<T> Union for InstanceRead<T>
where
    T: Serialize + DeserializeOwned + 'static,
{
    fn decode_document(doc: JsonValue, options: &DecodeOptions) -> Result<Option<Self>> {
        InstanceCodec::<T>::new()?.read().decode_with(doc, options)
    }

    fn encode_document(&self) -> Result<JsonValue> {
        InstanceCodec::<T>::new()?.read().encode(self)
    }
}

impl<T> Serialize for InstanceWrite<T>
where
    T: Serialize + DeserializeOwned + 'static,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        nested::serialize(self, serializer)
    }
}

impl<'de, T> Deserialize<'de> for InstanceWrite<T>
where
    T: Serialize + DeserializeOwned + 'static,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        nested::deserialize(deserializer)
    }
}

impl<T> Serialize for InstanceRead<T>
where
    T: Serialize + DeserializeOwned + 'static,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        nested::serialize(self, serializer)
    }
}

impl<'de, T> Deserialize<'de> for InstanceRead<T>
where
    T: Serialize + DeserializeOwned + 'static,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        nested::deserialize(deserializer)
    }
}
