use crate::{
    cell::PropertyCell,
    error::{ObjectError, PropertyError},
    qname::QualifiedName,
    types::ObjectId,
    value::Value,
};
use std::collections::BTreeMap;
use std::fmt;

///
/// PropertyMap
///
/// Per-object store of property cells keyed by qualified name. Declaring
/// the same name twice is a setup bug and is rejected; lookups never
/// allocate.
///

#[derive(Debug, Default)]
pub struct PropertyMap(BTreeMap<QualifiedName, PropertyCell>);

impl PropertyMap {
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn insert(&mut self, cell: PropertyCell) -> Result<(), ObjectError> {
        let qname = cell.qname().clone();
        if self.0.contains_key(&qname) {
            return Err(ObjectError::AlreadyDeclared { qname });
        }

        self.0.insert(qname, cell);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, qname: &QualifiedName) -> Option<&PropertyCell> {
        self.0.get(qname)
    }

    #[must_use]
    pub fn contains(&self, qname: &QualifiedName) -> bool {
        self.0.contains_key(qname)
    }

    pub fn qnames(&self) -> impl Iterator<Item = &QualifiedName> {
        self.0.keys()
    }

    pub fn cells(&self) -> impl Iterator<Item = &PropertyCell> {
        self.0.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether any cell holds an unsaved write.
    #[must_use]
    pub fn any_dirty(&self) -> bool {
        self.cells().any(PropertyCell::is_dirty)
    }
}

///
/// GenericObject
///
/// Minimal dynamic contract every repository object satisfies: identity,
/// class, and name-keyed property access. Typed access and the capability
/// facades are layered on top of this.
///

pub trait GenericObject: std::fmt::Debug {
    fn id(&self) -> ObjectId;

    fn class_qname(&self) -> &QualifiedName;

    /// Look up a property cell by qualified name.
    fn property(&self, qname: &QualifiedName) -> Result<&PropertyCell, ObjectError>;

    /// Qualified names of every declared property.
    fn property_names(&self) -> Vec<QualifiedName>;

    /// Generic write through the cell's validated path.
    fn set_property(&self, qname: &QualifiedName, value: Option<Value>) -> Result<(), ObjectError> {
        let cell = self.property(qname)?;
        cell.set_value(value)
            .map_err(|err| ObjectError::from_write(qname, err))
    }

    /// Generic read of the current value.
    fn property_value(&self, qname: &QualifiedName) -> Result<Option<Value>, ObjectError> {
        let cell = self.property(qname)?;
        cell.value().map_err(ObjectError::Property)
    }
}

///
/// DmsObject
///
/// In-memory generic object: an identity, a class name and the cells. The
/// declaration set is fixed at construction; values move through the cells.
///

pub struct DmsObject {
    id: ObjectId,
    class_qname: QualifiedName,
    properties: PropertyMap,
}

impl DmsObject {
    #[must_use]
    pub const fn new(id: ObjectId, class_qname: QualifiedName, properties: PropertyMap) -> Self {
        Self {
            id,
            class_qname,
            properties,
        }
    }

    #[must_use]
    pub const fn properties(&self) -> &PropertyMap {
        &self.properties
    }

    /// Typed cell access without going through the trait object.
    pub fn cell(&self, qname: &QualifiedName) -> Result<&PropertyCell, ObjectError> {
        self.properties
            .get(qname)
            .ok_or_else(|| ObjectError::NotDeclared {
                qname: qname.clone(),
            })
    }
}

impl GenericObject for DmsObject {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn class_qname(&self) -> &QualifiedName {
        &self.class_qname
    }

    fn property(&self, qname: &QualifiedName) -> Result<&PropertyCell, ObjectError> {
        self.cell(qname)
    }

    fn property_names(&self) -> Vec<QualifiedName> {
        self.properties.qnames().cloned().collect()
    }
}

impl fmt::Debug for DmsObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DmsObject")
            .field("id", &self.id)
            .field("class", &self.class_qname)
            .field("properties", &self.properties.len())
            .finish()
    }
}
