//! Views and view properties
//!
//! Both families here are untagged. A view property is either a property
//! definition (its `type` is a [`PropertyType`]) or a connection definition
//! (its `type` is an edge type and it carries a `direction`). A view in a data
//! model is either a full definition or a bare reference.

use super::common::{present, ContainerReference, Direction, InstanceId, ViewReference};
use super::property_types::PropertyType;
use crate::codec::{nested, static_union, UntaggedCodec};
use crate::types::JsonValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

// ============================================================================
// View Properties
// ============================================================================

/// A property mapped from a container property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewPropertyDefinition {
    /// None when the server sent a property type this crate doesn't know.
    /// The field itself is still required.
    #[serde(rename = "type", deserialize_with = "nested::permissive")]
    pub property_type: Option<PropertyType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<ContainerReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_property_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_increment: Option<bool>,
    /// `Some(Null)` when the server sent an explicit null default
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_value: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ViewPropertyDefinition {
    pub fn new(property_type: PropertyType) -> Self {
        Self {
            property_type: Some(property_type),
            container: None,
            container_property_identifier: None,
            nullable: None,
            auto_increment: None,
            default_value: None,
            name: None,
            description: None,
        }
    }
}

/// A property backed by edges of type `edge_type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionDefinition {
    #[serde(rename = "type")]
    pub edge_type: InstanceId,
    pub direction: Direction,
    /// View of the nodes at the other end
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ViewReference>,
    /// View of the edges themselves
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_source: Option<ViewReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ConnectionDefinition {
    pub fn new(edge_type: InstanceId, direction: Direction) -> Self {
        Self {
            edge_type,
            direction,
            source: None,
            edge_source: None,
            name: None,
            description: None,
        }
    }
}

/// A property of a view
#[derive(Debug, Clone, PartialEq)]
pub enum ViewProperty {
    Definition(ViewPropertyDefinition),
    Connection(ConnectionDefinition),
}

impl ViewProperty {
    pub fn as_definition(&self) -> Option<&ViewPropertyDefinition> {
        match self {
            Self::Definition(p) => Some(p),
            Self::Connection(_) => None,
        }
    }

    pub fn as_connection(&self) -> Option<&ConnectionDefinition> {
        match self {
            Self::Connection(c) => Some(c),
            Self::Definition(_) => None,
        }
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Candidates are tried as [definition, connection]
    pub fn codec() -> &'static UntaggedCodec<ViewProperty> {
        &VIEW_PROPERTIES
    }
}

impl From<ViewPropertyDefinition> for ViewProperty {
    fn from(value: ViewPropertyDefinition) -> Self {
        Self::Definition(value)
    }
}

impl From<ConnectionDefinition> for ViewProperty {
    fn from(value: ConnectionDefinition) -> Self {
        Self::Connection(value)
    }
}

static VIEW_PROPERTIES: LazyLock<UntaggedCodec<ViewProperty>> = LazyLock::new(|| {
    UntaggedCodec::builder("viewProperty")
        .candidate(ViewProperty::Definition, ViewProperty::as_definition)
        .candidate(ViewProperty::Connection, ViewProperty::as_connection)
        .build()
        .expect("view property candidates are well-formed")
});

static_union!(ViewProperty, VIEW_PROPERTIES);

// ============================================================================
// Data Model Views
// ============================================================================

/// Full view definition as returned by the data models endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewDefinition {
    pub space: String,
    pub external_id: String,
    pub version: String,
    pub properties: BTreeMap<String, ViewProperty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub implements: Vec<ViewReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub writable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated_time: Option<i64>,
}

impl ViewDefinition {
    /// Reference to this definition
    pub fn reference(&self) -> ViewReference {
        ViewReference::new(&self.space, &self.external_id, &self.version)
    }
}

/// A view listed in a data model: inlined or referenced
#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone, PartialEq)]
pub enum DataModelView {
    Definition(ViewDefinition),
    Reference(ViewReference),
}

impl DataModelView {
    pub fn as_definition(&self) -> Option<&ViewDefinition> {
        match self {
            Self::Definition(v) => Some(v),
            Self::Reference(_) => None,
        }
    }

    pub fn as_reference(&self) -> Option<&ViewReference> {
        match self {
            Self::Reference(r) => Some(r),
            Self::Definition(_) => None,
        }
    }

    /// Reference to the view, whichever shape was received
    pub fn reference(&self) -> ViewReference {
        match self {
            Self::Definition(v) => v.reference(),
            Self::Reference(r) => r.clone(),
        }
    }

    /// Candidates are tried as [definition, reference]. Every definition also
    /// fits the reference shape, so the order matters here.
    pub fn codec() -> &'static UntaggedCodec<DataModelView> {
        &DATA_MODEL_VIEWS
    }
}

impl From<ViewDefinition> for DataModelView {
    fn from(value: ViewDefinition) -> Self {
        Self::Definition(value)
    }
}

impl From<ViewReference> for DataModelView {
    fn from(value: ViewReference) -> Self {
        Self::Reference(value)
    }
}

static DATA_MODEL_VIEWS: LazyLock<UntaggedCodec<DataModelView>> = LazyLock::new(|| {
    UntaggedCodec::builder("dataModelView")
        .candidate(DataModelView::Definition, DataModelView::as_definition)
        .candidate(DataModelView::Reference, DataModelView::as_reference)
        .build()
        .expect("data model view candidates are well-formed")
});

static_union!(DataModelView, DATA_MODEL_VIEWS);

/// A data model and its views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataModel {
    pub space: String,
    pub external_id: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub views: Vec<DataModelView>,
}
