//! Graph query table expressions
//!
//! Each named result set of a query is either a node expression or an edge
//! expression. There is no tag: the shape is recognized by its `nodes` or
//! `edges` member.

use super::common::{Direction, ViewReference};
use crate::codec::{static_union, UntaggedCodec};
use crate::types::JsonValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Which end of an edge a chained node expression follows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainTo {
    Source,
    Destination,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortSpec {
    /// Property path, e.g. `["space", "view/version", "name"]`
    pub property: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<SortDirection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nulls_first: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Node selection, optionally chained from another result set
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodesQuery {
    /// Name of the result set to chain from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_to: Option<ChainTo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub through: Option<ViewReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<JsonValue>,
}

/// Edge traversal
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgesQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_to: Option<ChainTo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_distance: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_filter: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub termination_filter: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit_each: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<JsonValue>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeExpression {
    pub nodes: NodesQuery,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<SortSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeExpression {
    pub edges: EdgesQuery,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<SortSpec>,
    /// Sort applied after the traversal limit
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub post_sort: Vec<SortSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// One named result set of a query
#[derive(Debug, Clone, PartialEq)]
pub enum TableExpression {
    Nodes(NodeExpression),
    Edges(EdgeExpression),
}

impl TableExpression {
    pub fn as_nodes(&self) -> Option<&NodeExpression> {
        match self {
            Self::Nodes(n) => Some(n),
            Self::Edges(_) => None,
        }
    }

    pub fn as_edges(&self) -> Option<&EdgeExpression> {
        match self {
            Self::Edges(e) => Some(e),
            Self::Nodes(_) => None,
        }
    }

    pub fn limit(&self) -> Option<u32> {
        match self {
            Self::Nodes(n) => n.limit,
            Self::Edges(e) => e.limit,
        }
    }

    /// Result set this expression chains from
    pub fn chained_from(&self) -> Option<&str> {
        match self {
            Self::Nodes(n) => n.nodes.from.as_deref(),
            Self::Edges(e) => e.edges.from.as_deref(),
        }
    }

    pub fn codec() -> &'static UntaggedCodec<TableExpression> {
        &TABLE_EXPRESSIONS
    }
}

impl From<NodeExpression> for TableExpression {
    fn from(value: NodeExpression) -> Self {
        Self::Nodes(value)
    }
}

impl From<EdgeExpression> for TableExpression {
    fn from(value: EdgeExpression) -> Self {
        Self::Edges(value)
    }
}

static TABLE_EXPRESSIONS: LazyLock<UntaggedCodec<TableExpression>> = LazyLock::new(|| {
    UntaggedCodec::builder("tableExpression")
        .candidate(TableExpression::Nodes, TableExpression::as_nodes)
        .candidate(TableExpression::Edges, TableExpression::as_edges)
        .build()
        .expect("table expression candidates are well-formed")
});

static_union!(TableExpression, TABLE_EXPRESSIONS);

/// A graph query: named result sets and what to return from each
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    pub with: BTreeMap<String, TableExpression>,
    #[serde(default)]
    pub select: BTreeMap<String, JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursors: Option<BTreeMap<String, String>>,
}

impl Query {
    /// Result set names referenced through `from` that the query does not define
    pub fn dangling_references(&self) -> Vec<&str> {
        self.with
            .values()
            .filter_map(TableExpression::chained_from)
            .filter(|from| !self.with.contains_key(*from))
            .collect()
    }
}
