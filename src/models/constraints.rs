//! Container constraints
//!
//! Tagged by `constraintType`: `requires` or `uniqueness`.

use super::common::ContainerReference;
use crate::codec::{static_union, Envelope, TaggedCodec, TaggedUnion, VariantRegistry};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Constraint tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConstraintType {
    Requires,
    Uniqueness,
}

/// Instances with data in this container must also have data in `require`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequiresConstraint {
    pub require: ContainerReference,
}

/// The combination of `properties` must be unique
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniquenessConstraint {
    pub properties: Vec<String>,
}

/// A container constraint
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    Requires(RequiresConstraint),
    Uniqueness(UniquenessConstraint),
}

impl Constraint {
    pub fn constraint_type(&self) -> ConstraintType {
        self.tag()
    }

    pub fn as_requires(&self) -> Option<&RequiresConstraint> {
        match self {
            Self::Requires(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_uniqueness(&self) -> Option<&UniquenessConstraint> {
        match self {
            Self::Uniqueness(c) => Some(c),
            _ => None,
        }
    }

    /// The process-wide codec for constraints
    pub fn codec() -> &'static TaggedCodec<Constraint> {
        &CONSTRAINTS
    }
}

impl TaggedUnion for Constraint {
    type Tag = ConstraintType;

    fn tag(&self) -> ConstraintType {
        match self {
            Self::Requires(_) => ConstraintType::Requires,
            Self::Uniqueness(_) => ConstraintType::Uniqueness,
        }
    }
}

impl From<RequiresConstraint> for Constraint {
    fn from(value: RequiresConstraint) -> Self {
        Self::Requires(value)
    }
}

impl From<UniquenessConstraint> for Constraint {
    fn from(value: UniquenessConstraint) -> Self {
        Self::Uniqueness(value)
    }
}

static CONSTRAINTS: LazyLock<TaggedCodec<Constraint>> = LazyLock::new(|| {
    let registry = VariantRegistry::builder("constraint")
        .register(ConstraintType::Requires, Constraint::Requires, Constraint::as_requires)
        .register(
            ConstraintType::Uniqueness,
            Constraint::Uniqueness,
            Constraint::as_uniqueness,
        )
        .build()
        .expect("constraint registry is well-formed");
    TaggedCodec::new(registry, Envelope::field("constraintType"))
});

static_union!(Constraint, CONSTRAINTS);
