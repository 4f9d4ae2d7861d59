//! OpenDMA — a vendor-neutral typed object and property model for
//! document management systems.
//!
//! This is the public meta-crate. Downstream users depend on **opendma**
//! only.
//!
//! ## Crate layout
//! - `core`: qualified names, the value model, typed property cells,
//!   generic objects, and the dispatch facade.
//! - `schema`: class/aspect/property definitions, the system catalog,
//!   inheritance traversal, and the synthesized accessor interfaces.
//!
//! This crate adds the public error taxonomy, the session boundary
//! contracts, and an in-memory repository binding. The `prelude` module
//! mirrors the surface used by client code.

pub use opendma_core as core;
pub use opendma_schema as schema;

pub mod error;
pub mod memory;
pub mod session;

pub use error::{Error, ErrorKind, ErrorOrigin};

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
/// using _ brings traits into scope and avoids name conflicts
///

pub mod prelude {
    pub use crate::{
        core::{
            cell::PropertyCell,
            dispatch::Facade,
            object::{DmsObject, GenericObject, PropertyMap},
            qname::QualifiedName,
            types::*,
            value::{Cardinality, DataKind, Value},
        },
        error::Error,
        memory::{MemoryConnection, MemoryRepository, MemorySession},
        schema::{
            node::{AspectDef, ChoiceListDef, ClassDef, PropertyDecl},
            system::sys,
        },
        session::{Connection as _, Repository as _, Session as _},
    };
    pub use serde::{Deserialize, Serialize};
}
