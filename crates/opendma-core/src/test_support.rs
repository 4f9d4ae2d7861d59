//! Shared fixtures for in-crate tests.

use crate::{
    cell::PropertyCell,
    error::ObjectError,
    object::{GenericObject, PropertyMap},
    qname::QualifiedName,
    types::{Blob, Content, Guid, ObjectId, ObjectRef, ReferenceList, Timestamp},
    value::{Cardinality, DataKind, Value},
};
use std::rc::Rc;

pub fn qn(local: &str) -> QualifiedName {
    QualifiedName::new("test", local)
}

/// Minimal object with an id and no properties; enough to build references.
#[derive(Debug)]
pub struct StubObject {
    id: ObjectId,
    class_qname: QualifiedName,
    properties: PropertyMap,
}

impl StubObject {
    pub fn new(id: ObjectId) -> Self {
        Self {
            id,
            class_qname: qn("Stub"),
            properties: PropertyMap::new(),
        }
    }
}

impl GenericObject for StubObject {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn class_qname(&self) -> &QualifiedName {
        &self.class_qname
    }

    fn property(&self, qname: &QualifiedName) -> Result<&PropertyCell, ObjectError> {
        self.properties
            .get(qname)
            .ok_or_else(|| ObjectError::NotDeclared {
                qname: qname.clone(),
            })
    }

    fn property_names(&self) -> Vec<QualifiedName> {
        self.properties.qnames().cloned().collect()
    }
}

pub fn fixture_ref(seed: u128) -> ObjectRef {
    ObjectRef::new(Rc::new(StubObject::new(ObjectId::from_u128(seed))))
}

pub fn fixture_refs(len: usize) -> Vec<ObjectRef> {
    (0..len).map(|n| fixture_ref(n as u128 + 1)).collect()
}

/// One representative scalar per data kind.
pub fn sample_value(kind: DataKind) -> Value {
    match kind {
        DataKind::Blob => Value::Blob(Blob::from_vec(vec![1, 2, 3])),
        DataKind::Boolean => Value::Boolean(true),
        DataKind::Content => Value::Content(Content::from_bytes("text/plain", b"body".as_slice())),
        DataKind::DateTime => Value::DateTime(Timestamp::from_seconds(1_700_000_000)),
        DataKind::Double => Value::Double(2.5),
        DataKind::Float => Value::Float(1.5),
        DataKind::Guid => Value::Guid(Guid::from_u128(42)),
        DataKind::Id => Value::Id(ObjectId::from_u128(42)),
        DataKind::Integer => Value::Integer(7),
        DataKind::Long => Value::Long(7_000_000_000),
        DataKind::Reference => Value::Reference(fixture_ref(9)),
        DataKind::Short => Value::Short(3),
        DataKind::String => Value::String("sample".to_string()),
    }
}

/// A two-element sequence of the given kind, in the cell's native form.
pub fn sample_sequence(kind: DataKind) -> Value {
    if kind == DataKind::Reference {
        Value::References(ReferenceList::from_vec(fixture_refs(2)))
    } else {
        Value::List(vec![sample_value(kind), sample_value(kind)])
    }
}

pub fn writable_cell(local: &str, kind: DataKind, cardinality: Cardinality) -> PropertyCell {
    let initial = match cardinality {
        Cardinality::Single => None,
        Cardinality::Multi => Some(empty_sequence(kind)),
    };

    PropertyCell::new(qn(local), kind, cardinality, false, initial)
        .expect("fixture cell must accept its initial value")
}

pub fn empty_sequence(kind: DataKind) -> Value {
    if kind == DataKind::Reference {
        Value::References(ReferenceList::from_vec(Vec::new()))
    } else {
        Value::List(Vec::new())
    }
}
