//! ACL capabilities and scopes
//!
//! Both families use the single-key wrapper envelope: the only key of the
//! object is the tag and its value is the payload.
//!
//! ```json
//! {"groupsAcl": {"actions": ["LIST"], "scope": {"all": {}}}}
//! ```

use crate::codec::{nested, static_union, Envelope, TaggedCodec, TaggedUnion, VariantRegistry};
use crate::types::JsonValue;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::debug;

// ============================================================================
// Scopes
// ============================================================================

/// Scope tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScopeType {
    #[serde(rename = "all")]
    All,
    #[serde(rename = "currentuserscope")]
    CurrentUser,
    #[serde(rename = "datasetScope")]
    DataSet,
    #[serde(rename = "idScope")]
    Id,
    #[serde(rename = "assetRootIdScope")]
    AssetRootId,
    #[serde(rename = "tableScope")]
    Table,
    #[serde(rename = "spaceIdScope")]
    SpaceId,
    #[serde(rename = "extractionPipelineScope")]
    ExtractionPipeline,
}

/// Scope without parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EmptyScope {}

/// Scope over resources or data sets by internal id
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdScope {
    pub ids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRootIdScope {
    pub root_ids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableList {
    pub tables: Vec<String>,
}

/// RAW databases, each limited to the listed tables (all tables when empty)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableScope {
    pub dbs_to_tables: BTreeMap<String, TableList>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpaceIdScope {
    pub space_ids: Vec<String>,
}

/// Resources an ACL applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    All(EmptyScope),
    CurrentUser(EmptyScope),
    DataSet(IdScope),
    Id(IdScope),
    AssetRootId(AssetRootIdScope),
    Table(TableScope),
    SpaceId(SpaceIdScope),
    ExtractionPipeline(IdScope),
}

impl Scope {
    pub fn all() -> Self {
        Self::All(EmptyScope {})
    }

    pub fn current_user() -> Self {
        Self::CurrentUser(EmptyScope {})
    }

    pub fn data_sets(ids: impl IntoIterator<Item = i64>) -> Self {
        Self::DataSet(IdScope {
            ids: ids.into_iter().collect(),
        })
    }

    pub fn spaces<S: Into<String>>(space_ids: impl IntoIterator<Item = S>) -> Self {
        Self::SpaceId(SpaceIdScope {
            space_ids: space_ids.into_iter().map(Into::into).collect(),
        })
    }

    pub fn scope_type(&self) -> ScopeType {
        self.tag()
    }

    pub fn codec() -> &'static TaggedCodec<Scope> {
        &SCOPES
    }
}

impl TaggedUnion for Scope {
    type Tag = ScopeType;

    fn tag(&self) -> ScopeType {
        match self {
            Self::All(_) => ScopeType::All,
            Self::CurrentUser(_) => ScopeType::CurrentUser,
            Self::DataSet(_) => ScopeType::DataSet,
            Self::Id(_) => ScopeType::Id,
            Self::AssetRootId(_) => ScopeType::AssetRootId,
            Self::Table(_) => ScopeType::Table,
            Self::SpaceId(_) => ScopeType::SpaceId,
            Self::ExtractionPipeline(_) => ScopeType::ExtractionPipeline,
        }
    }
}

static SCOPES: LazyLock<TaggedCodec<Scope>> = LazyLock::new(|| {
    let registry = VariantRegistry::builder("scope")
        .register(ScopeType::All, Scope::All, |s| match s {
            Scope::All(inner) => Some(inner),
            _ => None,
        })
        .register(ScopeType::CurrentUser, Scope::CurrentUser, |s| match s {
            Scope::CurrentUser(inner) => Some(inner),
            _ => None,
        })
        .register(ScopeType::DataSet, Scope::DataSet, |s| match s {
            Scope::DataSet(inner) => Some(inner),
            _ => None,
        })
        .register(ScopeType::Id, Scope::Id, |s| match s {
            Scope::Id(inner) => Some(inner),
            _ => None,
        })
        .register(ScopeType::AssetRootId, Scope::AssetRootId, |s| match s {
            Scope::AssetRootId(inner) => Some(inner),
            _ => None,
        })
        .register(ScopeType::Table, Scope::Table, |s| match s {
            Scope::Table(inner) => Some(inner),
            _ => None,
        })
        .register(ScopeType::SpaceId, Scope::SpaceId, |s| match s {
            Scope::SpaceId(inner) => Some(inner),
            _ => None,
        })
        .register(ScopeType::ExtractionPipeline, Scope::ExtractionPipeline, |s| match s {
            Scope::ExtractionPipeline(inner) => Some(inner),
            _ => None,
        })
        .build()
        .expect("scope registry is well-formed");
    TaggedCodec::new(registry, Envelope::SingleKey)
});

static_union!(Scope, SCOPES);

// ============================================================================
// Capabilities
// ============================================================================

/// Action granted by an ACL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AclAction {
    Read,
    Write,
    List,
    Create,
    Update,
    Delete,
    Owner,
    Memberof,
    Execute,
    Use,
    WriteProperties,
}

/// Payload shared by every capability: what may be done, and where
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Acl {
    pub actions: Vec<AclAction>,
    pub scope: Scope,
}

impl Acl {
    pub fn new(actions: impl IntoIterator<Item = AclAction>, scope: Scope) -> Self {
        Self {
            actions: actions.into_iter().collect(),
            scope,
        }
    }

    pub fn allows(&self, action: AclAction) -> bool {
        self.actions.contains(&action)
    }
}

/// Declares the capability tag enum, the union and its registry from one
/// `Variant => "wireName"` list.
macro_rules! capabilities {
    ($($variant:ident => $wire:literal),+ $(,)?) => {
        /// Capability tag, i.e. the wrapper key
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum CapabilityType {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl CapabilityType {
            /// Every capability in registration order
            pub const ALL: &'static [CapabilityType] = &[$(CapabilityType::$variant),+];

            /// Wire name, e.g. `groupsAcl`
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }
        }

        /// A capability granted to a group
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum Capability {
            $($variant(Acl),)+
        }

        impl Capability {
            pub fn new(capability_type: CapabilityType, acl: Acl) -> Self {
                match capability_type {
                    $(CapabilityType::$variant => Self::$variant(acl),)+
                }
            }

            pub fn acl(&self) -> &Acl {
                match self {
                    $(Self::$variant(acl))|+ => acl,
                }
            }
        }

        impl TaggedUnion for Capability {
            type Tag = CapabilityType;

            fn tag(&self) -> CapabilityType {
                match self {
                    $(Self::$variant(_) => CapabilityType::$variant,)+
                }
            }
        }

        static CAPABILITIES: LazyLock<TaggedCodec<Capability>> = LazyLock::new(|| {
            let registry = VariantRegistry::builder("capability")
                $(
                    .register(CapabilityType::$variant, Capability::$variant, |c| match c {
                        Capability::$variant(acl) => Some(acl),
                        _ => None,
                    })
                )+
                .build()
                .expect("capability registry is well-formed");
            TaggedCodec::new(registry, Envelope::SingleKey)
        });
    };
}

capabilities! {
    Groups => "groupsAcl",
    Assets => "assetsAcl",
    Events => "eventsAcl",
    Files => "filesAcl",
    TimeSeries => "timeSeriesAcl",
    DataSets => "datasetsAcl",
    Raw => "rawAcl",
    Sequences => "sequencesAcl",
    Relationships => "relationshipsAcl",
    Labels => "labelsAcl",
    SecurityCategories => "securityCategoriesAcl",
    ExtractionPipelines => "extractionPipelinesAcl",
    ExtractionRuns => "extractionRunsAcl",
    ExtractionConfigs => "extractionConfigsAcl",
    Transformations => "transformationsAcl",
    DataModels => "dataModelsAcl",
    DataModelInstances => "dataModelInstancesAcl",
    Functions => "functionsAcl",
    Projects => "projectsAcl",
    Sessions => "sessionsAcl",
}

impl Capability {
    pub fn capability_type(&self) -> CapabilityType {
        self.tag()
    }

    pub fn codec() -> &'static TaggedCodec<Capability> {
        &CAPABILITIES
    }
}

static_union!(Capability, CAPABILITIES);

/// An access group.
///
/// Capabilities the registry doesn't know, and capabilities scoped by a scope
/// it doesn't know, are dropped when a group is read, so groups edited by
/// newer tooling still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    /// Group id in the external identity provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    #[serde(default, deserialize_with = "known_capabilities")]
    pub capabilities: Vec<Capability>,
}

impl Group {
    /// Capabilities of the given type
    pub fn capabilities_of(&self, capability_type: CapabilityType) -> impl Iterator<Item = &Acl> {
        self.capabilities
            .iter()
            .filter(move |c| c.tag() == capability_type)
            .map(Capability::acl)
    }
}

fn known_capabilities<'de, D>(deserializer: D) -> Result<Vec<Capability>, D::Error>
where
    D: Deserializer<'de>,
{
    let docs = Vec::<JsonValue>::deserialize(deserializer)?;
    let known = docs
        .into_iter()
        .filter(|doc| !has_unknown_scope(doc))
        .collect();

    nested::permissive_vec(JsonValue::Array(known)).map_err(D::Error::custom)
}

/// True when `doc` is a wrapped ACL whose scope tag is well-formed but unregistered
fn has_unknown_scope(doc: &JsonValue) -> bool {
    let Some(scope) = doc
        .as_object()
        .filter(|wrapper| wrapper.len() == 1)
        .and_then(|wrapper| wrapper.values().next())
        .and_then(|acl| acl.get("scope"))
    else {
        return false;
    };

    if matches!(Scope::codec().resolve_tag(scope), Ok(None)) {
        debug!(scope = %scope, "Dropping capability with unknown scope");
        return true;
    }
    false
}
