use crate::value::{DataKind, Shape};
use serde::{Deserialize, Serialize};
use std::fmt;

///
/// ValueShape
///
/// What a contract check actually found, for error reporting: the shape of
/// a runtime value, one offending list element, or the declared shape of a
/// differently-typed cell.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum ValueShape {
    /// No value at all.
    Missing,
    /// A scalar of the given kind.
    Scalar(DataKind),
    /// A general list with the given length.
    List(usize),
    /// A list element of the wrong kind; `found` is `None` when the element
    /// is itself a sequence.
    Element { index: usize, found: Option<DataKind> },
    /// A lazily-iterable reference sequence.
    ReferenceSeq,
    /// The declared shape of a cell, when the mismatch is against the
    /// declaration rather than a runtime value.
    Declared(Shape),
}

impl fmt::Display for ValueShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => f.write_str("no value"),
            Self::Scalar(kind) => write!(f, "single {kind}"),
            Self::List(len) => write!(f, "list of {len}"),
            Self::Element {
                index,
                found: Some(kind),
            } => write!(f, "element {index} of kind {kind}"),
            Self::Element { index, found: None } => write!(f, "element {index} (a sequence)"),
            Self::ReferenceSeq => f.write_str("reference sequence"),
            Self::Declared(shape) => write!(f, "declared {shape}"),
        }
    }
}
