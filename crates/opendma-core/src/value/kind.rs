use derive_more::{Display, FromStr};
use serde::{Deserialize, Serialize};
use std::fmt;

///
/// DataKind
///
/// Closed set of data kinds a property can be declared with. The kind fixes
/// the native representation of one element; whether a property holds one
/// element or a sequence is the orthogonal [`Cardinality`].
///

#[remain::sorted]
#[derive(
    Clone, Copy, Debug, Deserialize, Display, Eq, FromStr, Hash, PartialEq, Serialize,
)]
pub enum DataKind {
    Blob,
    Boolean,
    Content,
    DateTime,
    Double,
    Float,
    Guid,
    Id,
    Integer,
    Long,
    Reference,
    Short,
    String,
}

impl DataKind {
    pub const ALL: [Self; 13] = [
        Self::Blob,
        Self::Boolean,
        Self::Content,
        Self::DateTime,
        Self::Double,
        Self::Float,
        Self::Guid,
        Self::Id,
        Self::Integer,
        Self::Long,
        Self::Reference,
        Self::Short,
        Self::String,
    ];

    #[must_use]
    pub const fn is_reference(self) -> bool {
        matches!(self, Self::Reference)
    }

    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::Double | Self::Float | Self::Integer | Self::Long | Self::Short
        )
    }
}

///
/// Cardinality
///
/// Single holds at most one element (absence is legal); Multi always holds
/// a sequence, with emptiness standing in for absence.
///

#[derive(
    Clone, Copy, Debug, Deserialize, Display, Eq, FromStr, Hash, PartialEq, Serialize,
)]
pub enum Cardinality {
    Single,
    Multi,
}

impl Cardinality {
    #[must_use]
    pub const fn is_multi(self) -> bool {
        matches!(self, Self::Multi)
    }
}

///
/// Shape
///
/// A (kind, cardinality) pair: the declared contract of a property cell,
/// and equally the request a typed accessor implies.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Shape {
    pub kind: DataKind,
    pub cardinality: Cardinality,
}

impl Shape {
    #[must_use]
    pub const fn new(kind: DataKind, cardinality: Cardinality) -> Self {
        Self { kind, cardinality }
    }

    #[must_use]
    pub const fn single(kind: DataKind) -> Self {
        Self::new(kind, Cardinality::Single)
    }

    #[must_use]
    pub const fn multi(kind: DataKind) -> Self {
        Self::new(kind, Cardinality::Multi)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.cardinality, self.kind)
    }
}
