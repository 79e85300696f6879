//! Reference types shared by several union families

use crate::types::JsonValue;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};

/// Identifier of a node or edge; also used for direct relations and edge types
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceId {
    pub space: String,
    pub external_id: String,
}

impl InstanceId {
    pub fn new(space: impl Into<String>, external_id: impl Into<String>) -> Self {
        Self {
            space: space.into(),
            external_id: external_id.into(),
        }
    }
}

/// Reference to a container
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerReference {
    pub space: String,
    pub external_id: String,
}

impl ContainerReference {
    pub fn new(space: impl Into<String>, external_id: impl Into<String>) -> Self {
        Self {
            space: space.into(),
            external_id: external_id.into(),
        }
    }
}

/// Reference to a specific version of a view
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewReference {
    pub space: String,
    pub external_id: String,
    pub version: String,
}

impl ViewReference {
    pub fn new(
        space: impl Into<String>,
        external_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            space: space.into(),
            external_id: external_id.into(),
            version: version.into(),
        }
    }
}

/// Direction of a connection or a graph traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Outwards,
    Inwards,
}

/// Deserialize an optional field that keeps an explicit `null`.
///
/// Use with `#[serde(default, deserialize_with = "present")]`: an absent
/// field is `None`, a `null` is `Some` when `T` accepts null (e.g.
/// `JsonValue`) and `None` otherwise.
pub(crate) fn present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: DeserializeOwned,
    D: Deserializer<'de>,
{
    let value = JsonValue::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(T::deserialize(JsonValue::Null).ok());
    }
    T::deserialize(value).map(Some).map_err(D::Error::custom)
}
