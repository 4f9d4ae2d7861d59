//! In-memory repository binding: a reference implementation of the session
//! contracts, and the fixture the end-to-end tests run against.

use crate::{
    error::Error,
    session::{Connection, Repository, Session},
};
use opendma_core::{
    cell::PropertyCell,
    object::{DmsObject, GenericObject, PropertyMap},
    qname::QualifiedName,
    types::{Guid, ObjectId, ReferenceList, Timestamp},
    value::{DataKind, Value},
};
use opendma_schema::{
    node::{ClassDef, PropertyDecl},
    system::{SYSTEM_NAMESPACE, system_catalog},
    traverse::effective_properties,
};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

///
/// MemoryRepository
///
/// Objects instantiated from the system catalog, held by id with a guid
/// side index. Shared handles; no persistence.
///

pub struct MemoryRepository {
    name: String,
    objects: RefCell<BTreeMap<ObjectId, Rc<DmsObject>>>,
    by_guid: RefCell<BTreeMap<Guid, ObjectId>>,
}

impl MemoryRepository {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            objects: RefCell::new(BTreeMap::new()),
            by_guid: RefCell::new(BTreeMap::new()),
        }
    }

    /// Instantiate an object of the given class: every effective property
    /// declaration becomes a cell, and the system identity properties are
    /// populated before the handle is shared.
    pub fn create_object(
        &self,
        class_qname: &QualifiedName,
        object_qname: &QualifiedName,
    ) -> Result<Rc<DmsObject>, Error> {
        let catalog = system_catalog()?;

        let class = catalog
            .class(class_qname)
            .ok_or_else(|| Error::not_found(format!("no class '{class_qname}'")))?;
        if !class.instantiable {
            return Err(Error::unsupported(format!(
                "class '{class_qname}' is not instantiable"
            )));
        }

        let id = ObjectId::generate();
        let guid = Guid::generate();

        let mut properties = PropertyMap::new();
        for decl in effective_properties(&catalog, class_qname)? {
            properties.insert(instantiate_cell(decl, id, guid, object_qname)?)?;
        }

        let object = Rc::new(DmsObject::new(id, class_qname.clone(), properties));

        self.objects.borrow_mut().insert(id, Rc::clone(&object));
        self.by_guid.borrow_mut().insert(guid, id);

        Ok(object)
    }

    #[must_use]
    pub fn object(&self, id: ObjectId) -> Option<Rc<DmsObject>> {
        self.objects.borrow().get(&id).cloned()
    }

    #[must_use]
    pub fn object_by_guid(&self, guid: Guid) -> Option<Rc<DmsObject>> {
        let id = *self.by_guid.borrow().get(&guid)?;
        self.object(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.borrow().is_empty()
    }
}

impl Repository for MemoryRepository {
    fn name(&self) -> &str {
        &self.name
    }

    fn class(&self, qname: &QualifiedName) -> Result<ClassDef, Error> {
        let catalog = system_catalog()?;

        catalog
            .class(qname)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("no class '{qname}'")))
    }

    fn classes(&self) -> Result<Vec<QualifiedName>, Error> {
        let catalog = system_catalog()?;

        Ok(catalog.classes().map(|class| class.qname.clone()).collect())
    }
}

/// Initial cell for one declaration. Multi-valued properties start as
/// empty sequences, system identity and audit stamps are filled in, and
/// everything else starts absent.
fn instantiate_cell(
    decl: &PropertyDecl,
    id: ObjectId,
    guid: Guid,
    object_qname: &QualifiedName,
) -> Result<PropertyCell, Error> {
    let initial = initial_value(decl, id, guid, object_qname);

    PropertyCell::new(
        decl.qname.clone(),
        decl.kind,
        decl.cardinality,
        decl.read_only,
        initial,
    )
    .map_err(Error::from)
}

fn initial_value(
    decl: &PropertyDecl,
    id: ObjectId,
    guid: Guid,
    object_qname: &QualifiedName,
) -> Option<Value> {
    if decl.cardinality.is_multi() {
        return Some(empty_sequence(decl.kind));
    }

    if decl.qname.namespace() != SYSTEM_NAMESPACE {
        return None;
    }

    match decl.qname.local() {
        "Id" => Some(Value::Id(id)),
        "Guid" => Some(Value::Guid(guid)),
        "Namespace" => Some(Value::from(object_qname.namespace())),
        "Name" => Some(Value::from(object_qname.local())),
        "CheckedOut" => Some(Value::Boolean(false)),
        "CreatedAt" | "ModifiedAt" => Some(Value::DateTime(Timestamp::now())),
        "CreatedBy" | "ModifiedBy" => Some(Value::from("system")),
        _ => None,
    }
}

fn empty_sequence(kind: DataKind) -> Value {
    if kind.is_reference() {
        Value::References(ReferenceList::from_vec(Vec::new()))
    } else {
        Value::List(Vec::new())
    }
}

///
/// MemoryConnection
///

pub struct MemoryConnection {
    repository: Rc<MemoryRepository>,
}

impl MemoryConnection {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            repository: Rc::new(MemoryRepository::new(name)),
        }
    }

    #[must_use]
    pub fn repository(&self) -> &MemoryRepository {
        &self.repository
    }
}

impl Connection for MemoryConnection {
    type Session = MemorySession;

    fn open_session(&self) -> Result<MemorySession, Error> {
        Ok(MemorySession {
            repository: Rc::clone(&self.repository),
        })
    }
}

///
/// MemorySession
///

pub struct MemorySession {
    repository: Rc<MemoryRepository>,
}

impl Session for MemorySession {
    type Repository = MemoryRepository;

    fn repository(&self) -> &MemoryRepository {
        &self.repository
    }

    fn object_by_id(&self, id: ObjectId) -> Result<Rc<dyn GenericObject>, Error> {
        match self.repository.object(id) {
            Some(object) => Ok(object),
            None => Err(Error::not_found(format!("no object with id {id}"))),
        }
    }

    fn object_by_guid(&self, guid: Guid) -> Result<Rc<dyn GenericObject>, Error> {
        match self.repository.object_by_guid(guid) {
            Some(object) => Ok(object),
            None => Err(Error::not_found(format!("no object with guid {guid}"))),
        }
    }
}
