//! Core object model for OpenDMA: qualified names, typed property cells,
//! generic objects, the method-dispatch facade, and observability hooks.

// public exports are one module level down
pub mod cell;
pub mod dispatch;
pub mod error;
pub mod obs;
pub mod object;
pub mod qname;
pub mod types;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, registries, or metric helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        cell::PropertyCell,
        dispatch::Facade,
        object::{DmsObject, GenericObject},
        qname::QualifiedName,
        value::{Cardinality, DataKind, Shape, Value},
    };
}
