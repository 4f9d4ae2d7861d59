//! Metamodel for OpenDMA: class, aspect, property, and choice-list
//! definitions, the global catalog with validate-once bootstrap,
//! inheritance traversal, and the accessor interfaces synthesized from
//! declarations.

// public exports are one module level down
pub mod catalog;
pub mod interfaces;
pub mod node;
pub mod system;
pub mod traverse;
pub mod validate;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
///

pub mod prelude {
    pub use crate::{
        catalog::Catalog,
        node::{AspectDef, Choice, ChoiceListDef, ChoiceValue, ClassDef, PropertyDecl},
        traverse::effective_properties,
    };
}
