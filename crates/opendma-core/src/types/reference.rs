use crate::{object::GenericObject, types::ObjectId};
use std::fmt;
use std::rc::Rc;

///
/// ObjectRef
///
/// Handle to another repository object (the Reference data kind). Cloning
/// shares the underlying object; equality compares object identity, never
/// object state.
///

#[derive(Clone)]
pub struct ObjectRef(Rc<dyn GenericObject>);

impl ObjectRef {
    #[must_use]
    pub fn new(object: Rc<dyn GenericObject>) -> Self {
        Self(object)
    }

    #[must_use]
    pub fn id(&self) -> ObjectId {
        self.0.id()
    }

    #[must_use]
    pub fn object(&self) -> &Rc<dyn GenericObject> {
        &self.0
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectRef({})", self.id())
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for ObjectRef {}

impl From<Rc<dyn GenericObject>> for ObjectRef {
    fn from(object: Rc<dyn GenericObject>) -> Self {
        Self::new(object)
    }
}

///
/// ReferenceSeq
///
/// Sequence contract behind every multi-valued reference property. An
/// implementation may hold a materialized vector or page elements in from a
/// server; `iter` restarts from the first element on every call.
///

pub trait ReferenceSeq {
    fn iter(&self) -> RefIter<'_>;

    /// Element count, when the implementation knows it without iterating.
    fn size_hint(&self) -> Option<usize> {
        None
    }
}

pub type RefIter<'a> = Box<dyn Iterator<Item = ObjectRef> + 'a>;

impl ReferenceSeq for Vec<ObjectRef> {
    fn iter(&self) -> RefIter<'_> {
        Box::new(self.as_slice().iter().cloned())
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.len())
    }
}

///
/// ReferenceList
///
/// Cheap-to-clone handle on a reference sequence; clones share the same
/// underlying sequence. Equality iterates both sides and compares element
/// ids, so avoid it on unbounded sequences.
///

#[derive(Clone)]
pub struct ReferenceList(Rc<dyn ReferenceSeq>);

impl ReferenceList {
    #[must_use]
    pub fn new(seq: Rc<dyn ReferenceSeq>) -> Self {
        Self(seq)
    }

    #[must_use]
    pub fn from_vec(refs: Vec<ObjectRef>) -> Self {
        Self(Rc::new(refs))
    }

    #[must_use]
    pub fn iter(&self) -> RefIter<'_> {
        self.0.iter()
    }

    #[must_use]
    pub fn size_hint(&self) -> Option<usize> {
        self.0.size_hint()
    }

    /// Materialize the whole sequence.
    #[must_use]
    pub fn to_vec(&self) -> Vec<ObjectRef> {
        self.iter().collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self.size_hint() {
            Some(len) => len == 0,
            None => self.iter().next().is_none(),
        }
    }
}

impl fmt::Debug for ReferenceList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.size_hint() {
            Some(len) => write!(f, "ReferenceList(len={len})"),
            None => write!(f, "ReferenceList(unsized)"),
        }
    }
}

impl PartialEq for ReferenceList {
    fn eq(&self, other: &Self) -> bool {
        let mut a = self.iter();
        let mut b = other.iter();

        loop {
            match (a.next(), b.next()) {
                (None, None) => return true,
                (Some(x), Some(y)) if x == y => {}
                _ => return false,
            }
        }
    }
}

impl From<Vec<ObjectRef>> for ReferenceList {
    fn from(refs: Vec<ObjectRef>) -> Self {
        Self::from_vec(refs)
    }
}
