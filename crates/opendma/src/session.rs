//! Boundary contracts a repository binding implements: connection,
//! session, and repository lookups. Kept deliberately thin; persistence,
//! search, and authorization live behind them.

use crate::error::Error;
use opendma_core::{
    dispatch::Facade,
    object::GenericObject,
    qname::QualifiedName,
    types::{Guid, ObjectId},
};
use opendma_schema::{interfaces::system_interfaces, node::ClassDef};
use std::rc::Rc;

///
/// Connection
///

pub trait Connection {
    type Session: Session;

    fn open_session(&self) -> Result<Self::Session, Error>;
}

///
/// Session
///
/// One interactive scope over a repository. Lookup returns shared object
/// handles; `facade` wires a handle to the system method table.
///

pub trait Session {
    type Repository: Repository;

    fn repository(&self) -> &Self::Repository;

    fn object_by_id(&self, id: ObjectId) -> Result<Rc<dyn GenericObject>, Error>;

    fn object_by_guid(&self, guid: Guid) -> Result<Rc<dyn GenericObject>, Error>;

    /// Dispatch facade over one object for the requested class and aspect
    /// names, resolved against the system interfaces.
    fn facade<'a>(
        &self,
        object: &'a dyn GenericObject,
        requested: &[QualifiedName],
    ) -> Result<Facade<'a>, Error> {
        let registry = system_interfaces()?;

        Facade::new(object, requested, registry).map_err(Error::from)
    }
}

///
/// Repository
///

pub trait Repository {
    fn name(&self) -> &str;

    /// Class definition by name; owned so callers outlive catalog guards.
    fn class(&self, qname: &QualifiedName) -> Result<ClassDef, Error>;

    fn classes(&self) -> Result<Vec<QualifiedName>, Error>;
}
