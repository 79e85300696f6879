//! Container indexes
//!
//! Tagged by `indexType`. Only `btree` is registered; other server-side index
//! kinds decode to no value under the default policy.

use crate::codec::{static_union, Envelope, TaggedCodec, TaggedUnion, VariantRegistry};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Index tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndexType {
    #[serde(rename = "btree")]
    BTree,
}

/// B-tree index over one or more container properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BTreeIndex {
    pub properties: Vec<String>,
    /// Whether the index supports cursor-based pagination
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursorable: Option<bool>,
}

/// A container index
#[derive(Debug, Clone, PartialEq)]
pub enum Index {
    BTree(BTreeIndex),
}

impl Index {
    pub fn index_type(&self) -> IndexType {
        self.tag()
    }

    pub fn as_btree(&self) -> Option<&BTreeIndex> {
        match self {
            Self::BTree(index) => Some(index),
        }
    }

    pub fn codec() -> &'static TaggedCodec<Index> {
        &INDEXES
    }
}

impl TaggedUnion for Index {
    type Tag = IndexType;

    fn tag(&self) -> IndexType {
        match self {
            Self::BTree(_) => IndexType::BTree,
        }
    }
}

impl From<BTreeIndex> for Index {
    fn from(value: BTreeIndex) -> Self {
        Self::BTree(value)
    }
}

static INDEXES: LazyLock<TaggedCodec<Index>> = LazyLock::new(|| {
    let registry = VariantRegistry::builder("index")
        .register(IndexType::BTree, Index::BTree, Index::as_btree)
        .build()
        .expect("index registry is well-formed");
    TaggedCodec::new(registry, Envelope::field("indexType"))
});

static_union!(Index, INDEXES);
