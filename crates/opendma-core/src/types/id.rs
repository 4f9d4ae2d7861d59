use derive_more::{Display, FromStr};
use serde::{Deserialize, Serialize};
use ulid::Ulid as WrappedUlid;

///
/// ObjectId
///
/// Repository-scoped object identifier (the Id data kind). ULID-backed, so
/// the lexicographic order of the canonical string form follows creation
/// time.
///

#[derive(
    Clone,
    Copy,
    Debug,
    Display,
    Eq,
    FromStr,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
    Deserialize,
)]
#[repr(transparent)]
pub struct ObjectId(WrappedUlid);

impl ObjectId {
    #[must_use]
    pub const fn nil() -> Self {
        Self(WrappedUlid::nil())
    }

    /// Fresh identifier from the current timestamp and system randomness.
    #[must_use]
    pub fn generate() -> Self {
        Self(WrappedUlid::new())
    }

    #[must_use]
    pub const fn from_u128(value: u128) -> Self {
        Self(WrappedUlid(value))
    }

    #[must_use]
    pub const fn is_nil(self) -> bool {
        self.0.0 == 0
    }
}

impl From<WrappedUlid> for ObjectId {
    fn from(ulid: WrappedUlid) -> Self {
        Self(ulid)
    }
}
