//! Union families of the CDF API
//!
//! Each family is a Rust enum plus a codec definition:
//!
//! | Family | Envelope | Module |
//! |--------|----------|--------|
//! | constraint | field `constraintType` | [`constraints`] |
//! | index | field `indexType` | [`indexes`] |
//! | propertyType | field `type` | [`property_types`] |
//! | instanceWrite / instanceRead | field `instanceType` | [`instances`] |
//! | sourceReference | field `type` | [`instances`] |
//! | fieldResolver | field `type` | [`field_resolvers`] |
//! | viewProperty / dataModelView | untagged | [`views`] |
//! | tableExpression | untagged | [`query`] |
//! | capability / scope | single-key wrapper | [`capabilities`] |
//!
//! All of them except the instance families use a process-wide codec and
//! implement `Serialize`/`Deserialize`, so they can be used as fields of
//! ordinary structs.

pub mod capabilities;
pub mod catalog;
pub mod common;
pub mod constraints;
pub mod field_resolvers;
pub mod indexes;
pub mod instances;
pub mod property_types;
pub mod query;
pub mod views;

pub use capabilities::{
    Acl, AclAction, AssetRootIdScope, Capability, CapabilityType, EmptyScope, Group, IdScope,
    Scope, ScopeType, SpaceIdScope, TableList, TableScope,
};
pub use catalog::{Decoded, Family};
pub use common::{ContainerReference, Direction, InstanceId, ViewReference};
pub use constraints::{Constraint, ConstraintType, RequiresConstraint, UniquenessConstraint};
pub use field_resolvers::{
    ConstantResolver, FieldResolver, FieldResolverType, RawResolver, ReferenceResolver,
    SyntheticTimeSeriesResolver, ViewResolver,
};
pub use indexes::{BTreeIndex, Index, IndexType};
pub use instances::{
    Edge, EdgeWrite, InstanceCodec, InstanceData, InstanceRead, InstanceType, InstanceWrite, Node,
    NodeWrite, SourceReference, SourceType,
};
pub use property_types::{
    DirectRelationProperty, PrimitiveProperty, PropertyType, PropertyTypeVariant, TextProperty,
};
pub use query::{
    ChainTo, EdgeExpression, EdgesQuery, NodeExpression, NodesQuery, Query, SortDirection,
    SortSpec, TableExpression,
};
pub use views::{
    ConnectionDefinition, DataModel, DataModelView, ViewDefinition, ViewProperty,
    ViewPropertyDefinition,
};

#[cfg(test)]
mod tests;
