mod kind;
mod shape;


use crate::types::{Blob, Content, Guid, ObjectId, ObjectRef, ReferenceList, Timestamp};
use std::fmt;

// re-exports
pub use kind::{Cardinality, DataKind, Shape};
pub use shape::ValueShape;

///
/// Value
///
/// Closed union over every native representation a property can hold. One
/// variant per scalar data kind, plus the two sequence forms: `List` for
/// materialized multi-valued scalars and `References` for lazily-iterable
/// reference sequences. Absence is `Option<Value>` at the call sites, never
/// an in-band null.
///

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Blob(Blob),
    Boolean(bool),
    Content(Content),
    DateTime(Timestamp),
    Double(f64),
    Float(f32),
    Guid(Guid),
    Id(ObjectId),
    Integer(i32),
    /// Ordered list of scalar elements.
    /// Element order is preserved; contract checks are elementwise.
    List(Vec<Self>),
    Long(i64),
    Reference(ObjectRef),
    /// Reference sequence; elements may be paged in on iteration.
    References(ReferenceList),
    Short(i16),
    String(String),
}

impl Value {
    /// The data kind of a scalar value; `None` for the sequence variants.
    #[must_use]
    pub const fn scalar_kind(&self) -> Option<DataKind> {
        match self {
            Self::Blob(_) => Some(DataKind::Blob),
            Self::Boolean(_) => Some(DataKind::Boolean),
            Self::Content(_) => Some(DataKind::Content),
            Self::DateTime(_) => Some(DataKind::DateTime),
            Self::Double(_) => Some(DataKind::Double),
            Self::Float(_) => Some(DataKind::Float),
            Self::Guid(_) => Some(DataKind::Guid),
            Self::Id(_) => Some(DataKind::Id),
            Self::Integer(_) => Some(DataKind::Integer),
            Self::Long(_) => Some(DataKind::Long),
            Self::Reference(_) => Some(DataKind::Reference),
            Self::Short(_) => Some(DataKind::Short),
            Self::String(_) => Some(DataKind::String),
            Self::List(_) | Self::References(_) => None,
        }
    }

    /// Shape of this value as seen by a contract check.
    #[must_use]
    pub fn shape(&self) -> ValueShape {
        match self {
            Self::List(items) => ValueShape::List(items.len()),
            Self::References(_) => ValueShape::ReferenceSeq,
            other => match other.scalar_kind() {
                Some(kind) => ValueShape::Scalar(kind),
                // sequence variants handled above
                None => ValueShape::Missing,
            },
        }
    }

    #[must_use]
    pub const fn is_sequence(&self) -> bool {
        matches!(self, Self::List(_) | Self::References(_))
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_references(&self) -> Option<&ReferenceList> {
        match self {
            Self::References(list) => Some(list),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blob(v) => v.fmt(f),
            Self::Boolean(v) => v.fmt(f),
            Self::Content(v) => v.fmt(f),
            Self::DateTime(v) => v.fmt(f),
            Self::Double(v) => v.fmt(f),
            Self::Float(v) => v.fmt(f),
            Self::Guid(v) => v.fmt(f),
            Self::Id(v) => v.fmt(f),
            Self::Integer(v) => v.fmt(f),
            Self::Long(v) => v.fmt(f),
            Self::Reference(v) => write!(f, "ref:{}", v.id()),
            Self::References(v) => write!(f, "{v:?}"),
            Self::Short(v) => v.fmt(f),
            Self::String(v) => f.write_str(v),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    item.fmt(f)?;
                }
                f.write_str("]")
            }
        }
    }
}

macro_rules! impl_from_for {
    ( $( $type:ty => $variant:ident ),* $(,)? ) => {
        $(
            impl From<$type> for Value {
                fn from(v: $type) -> Self {
                    Self::$variant(v.into())
                }
            }
        )*
    };
}

impl_from_for! {
    Blob          => Blob,
    bool          => Boolean,
    Content       => Content,
    Timestamp     => DateTime,
    f64           => Double,
    f32           => Float,
    Guid          => Guid,
    ObjectId      => Id,
    i32           => Integer,
    i64           => Long,
    ObjectRef     => Reference,
    ReferenceList => References,
    i16           => Short,
    &str          => String,
    String        => String,
    Vec<u8>       => Blob,
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}
