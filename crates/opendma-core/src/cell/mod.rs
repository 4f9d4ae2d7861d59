#[cfg(test)]
mod tests;

use crate::{
    error::PropertyError,
    obs,
    qname::QualifiedName,
    types::{Blob, Content, Guid, ObjectId, ObjectRef, ReferenceList, Timestamp},
    value::{Cardinality, DataKind, Shape, Value, ValueShape},
};
use std::cell::{Cell, RefCell};
use std::fmt;

///
/// ValueProvider
///
/// One-shot deferred producer for a cell's initial value. Invoked at most
/// once, on the first read that needs it; the produced value passes the
/// same contract check as an explicit write.
///

pub struct ValueProvider(Box<dyn FnOnce() -> Option<Value>>);

impl ValueProvider {
    pub fn new(f: impl FnOnce() -> Option<Value> + 'static) -> Self {
        Self(Box::new(f))
    }

    fn produce(self) -> Option<Value> {
        (self.0)()
    }
}

impl fmt::Debug for ValueProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ValueProvider")
    }
}

///
/// CellState
///
/// Pending holds the not-yet-invoked provider; every other moment of the
/// cell's life is Resolved. There is no third state: a provider that fails
/// its contract still leaves the cell Resolved (empty) and consumed.
///

#[derive(Debug)]
enum CellState {
    Resolved(Option<Value>),
    Pending(ValueProvider),
}

///
/// PropertyCell
///
/// One property slot on one object: the declared (kind, cardinality)
/// contract, the read-only flag, and the current value or the provider that
/// will produce it. The contract is enforced on construction, on every
/// write and on provider resolution; reads trust prior enforcement.
///
/// Interior mutability keeps reads `&self` while allowing the one-shot
/// resolution and dirty tracking; the `RefCell` makes the type `!Sync`,
/// which is the intended single-owner concurrency model.
///

#[derive(Debug)]
pub struct PropertyCell {
    qname: QualifiedName,
    kind: DataKind,
    cardinality: Cardinality,
    read_only: bool,
    dirty: Cell<bool>,
    state: RefCell<CellState>,
}

impl PropertyCell {
    ///
    /// CONSTRUCTION
    ///

    /// Cell with an immediately-known value. The initial value must satisfy
    /// the declared contract; read-only cells take their value here too.
    pub fn new(
        qname: QualifiedName,
        kind: DataKind,
        cardinality: Cardinality,
        read_only: bool,
        initial: Option<Value>,
    ) -> Result<Self, PropertyError> {
        check_assignable(&qname, Shape::new(kind, cardinality), initial.as_ref())?;

        Ok(Self {
            qname,
            kind,
            cardinality,
            read_only,
            dirty: Cell::new(false),
            state: RefCell::new(CellState::Resolved(initial)),
        })
    }

    /// Cell whose value is produced on first read. The provider's output is
    /// validated at resolution time, not here.
    #[must_use]
    pub fn deferred(
        qname: QualifiedName,
        kind: DataKind,
        cardinality: Cardinality,
        read_only: bool,
        provider: ValueProvider,
    ) -> Self {
        Self {
            qname,
            kind,
            cardinality,
            read_only,
            dirty: Cell::new(false),
            state: RefCell::new(CellState::Pending(provider)),
        }
    }

    ///
    /// INTROSPECTION
    ///

    #[must_use]
    pub const fn qname(&self) -> &QualifiedName {
        &self.qname
    }

    #[must_use]
    pub const fn kind(&self) -> DataKind {
        self.kind
    }

    #[must_use]
    pub const fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    #[must_use]
    pub const fn shape(&self) -> Shape {
        Shape::new(self.kind, self.cardinality)
    }

    #[must_use]
    pub const fn is_read_only(&self) -> bool {
        self.read_only
    }

    #[must_use]
    pub const fn is_multi_valued(&self) -> bool {
        self.cardinality.is_multi()
    }

    /// Whether the cell has been written since construction or the last
    /// `mark_clean`. Provider resolution does not set this.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    /// Whether a deferred provider is still pending.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(&*self.state.borrow(), CellState::Pending(_))
    }

    /// Reset the dirty flag after a successful save.
    pub fn mark_clean(&self) {
        self.dirty.set(false);
    }

    ///
    /// GENERIC ACCESS
    ///

    /// Current value, forcing a pending provider first. A provider whose
    /// output violates the contract is still consumed; the failure surfaces
    /// as `ResolveContract` and later reads see an empty cell.
    pub fn value(&self) -> Result<Option<Value>, PropertyError> {
        {
            let state = self.state.borrow();
            if let CellState::Resolved(value) = &*state {
                return Ok(value.clone());
            }
        }

        // Pending: take the provider out, leaving the cell empty while it
        // runs. One-shot by construction.
        let provider = match self.state.replace(CellState::Resolved(None)) {
            CellState::Pending(provider) => provider,
            CellState::Resolved(value) => return Ok(value),
        };

        let produced = provider.produce();
        if let Err(err) = check_assignable(&self.qname, self.shape(), produced.as_ref()) {
            obs::record(obs::ModelEvent::ProviderResolved { ok: false });
            return Err(PropertyError::ResolveContract {
                qname: self.qname.clone(),
                source: Box::new(err),
            });
        }

        obs::record(obs::ModelEvent::ProviderResolved { ok: true });
        self.state.replace(CellState::Resolved(produced.clone()));
        self.dirty.set(false);
        Ok(produced)
    }

    /// Validated write. Denial is checked before the contract, the contract
    /// before any mutation, so a failed write leaves the cell untouched
    /// except that it never resurrects an already-consumed provider.
    pub fn set_value(&self, value: Option<Value>) -> Result<(), PropertyError> {
        if self.read_only {
            return Err(PropertyError::AccessDenied {
                qname: self.qname.clone(),
            });
        }

        check_assignable(&self.qname, self.shape(), value.as_ref())?;

        // A pending provider is discarded unresolved; the write supersedes it.
        self.state.replace(CellState::Resolved(value));
        self.dirty.set(true);
        Ok(())
    }

    ///
    /// TYPED ACCESS
    ///

    /// Typed read for a Multi Reference cell: the lazily-iterable sequence
    /// handle, shared with the cell rather than copied out of it.
    pub fn reference_list(&self) -> Result<ReferenceList, PropertyError> {
        let requested = Shape::multi(DataKind::Reference);
        self.expect_shape(requested)?;

        match self.value()? {
            None => Ok(ReferenceList::from_vec(Vec::new())),
            Some(Value::References(list)) => Ok(list),
            Some(other) => Err(mismatch(&self.qname, requested, other.shape())),
        }
    }

    /// Guard for a typed accessor: the declared shape must match the
    /// requested one exactly. The stored value is never consulted, and a
    /// pending provider is not resolved for a request that cannot succeed.
    fn expect_shape(&self, requested: Shape) -> Result<(), PropertyError> {
        if self.shape() == requested {
            Ok(())
        } else {
            Err(mismatch(
                &self.qname,
                requested,
                ValueShape::Declared(self.shape()),
            ))
        }
    }
}

/// Validate a candidate value against a declared shape. Shared by
/// construction, provider resolution and every write.
fn check_assignable(
    qname: &QualifiedName,
    shape: Shape,
    value: Option<&Value>,
) -> Result<(), PropertyError> {
    let Some(value) = value else {
        // Absence is legal only for single-valued slots; a multi-valued
        // slot expresses "no values" as an empty sequence.
        return if shape.cardinality.is_multi() {
            Err(mismatch(qname, shape, ValueShape::Missing))
        } else {
            Ok(())
        };
    };

    match shape.cardinality {
        Cardinality::Single => {
            if value.scalar_kind() == Some(shape.kind) {
                Ok(())
            } else {
                Err(mismatch(qname, shape, value.shape()))
            }
        }
        Cardinality::Multi if shape.kind == DataKind::Reference => {
            // Reference sequences keep their lazy form; elements are not
            // enumerated here.
            if matches!(value, Value::References(_)) {
                Ok(())
            } else {
                Err(mismatch(qname, shape, value.shape()))
            }
        }
        Cardinality::Multi => {
            let Value::List(items) = value else {
                return Err(mismatch(qname, shape, value.shape()));
            };

            for (index, item) in items.iter().enumerate() {
                if item.scalar_kind() != Some(shape.kind) {
                    return Err(mismatch(
                        qname,
                        shape,
                        ValueShape::Element {
                            index,
                            found: item.scalar_kind(),
                        },
                    ));
                }
            }

            Ok(())
        }
    }
}

fn mismatch(qname: &QualifiedName, expected: Shape, found: ValueShape) -> PropertyError {
    PropertyError::InvalidDataType {
        qname: qname.clone(),
        expected,
        found,
    }
}

/// Generate the narrow typed accessors: one single-valued and one
/// list-valued reader per scalar kind. Each is a guarded cast over the
/// generic `value` path.
macro_rules! typed_accessors {
    ( $( ($kind:ident, $single:ident, $list:ident, $ty:ty) ),* $(,)? ) => {
        impl PropertyCell {
            $(
                pub fn $single(&self) -> Result<Option<$ty>, PropertyError> {
                    let requested = Shape::single(DataKind::$kind);
                    self.expect_shape(requested)?;

                    match self.value()? {
                        None => Ok(None),
                        Some(Value::$kind(inner)) => Ok(Some(inner)),
                        Some(other) => Err(mismatch(&self.qname, requested, other.shape())),
                    }
                }

                pub fn $list(&self) -> Result<Vec<$ty>, PropertyError> {
                    let requested = Shape::multi(DataKind::$kind);
                    self.expect_shape(requested)?;

                    match self.value()? {
                        None => Ok(Vec::new()),
                        Some(Value::List(items)) => {
                            let mut out = Vec::with_capacity(items.len());
                            for (index, item) in items.into_iter().enumerate() {
                                match item {
                                    Value::$kind(inner) => out.push(inner),
                                    other => {
                                        return Err(mismatch(
                                            &self.qname,
                                            requested,
                                            ValueShape::Element {
                                                index,
                                                found: other.scalar_kind(),
                                            },
                                        ));
                                    }
                                }
                            }
                            Ok(out)
                        }
                        Some(other) => Err(mismatch(&self.qname, requested, other.shape())),
                    }
                }
            )*
        }
    };
}

typed_accessors! {
    (Blob,     blob,      blob_list,      Blob),
    (Boolean,  boolean,   boolean_list,   bool),
    (Content,  content,   content_list,   Content),
    (DateTime, date_time, date_time_list, Timestamp),
    (Double,   double,    double_list,    f64),
    (Float,    float,     float_list,     f32),
    (Guid,     guid,      guid_list,      Guid),
    (Id,       id,        id_list,        ObjectId),
    (Integer,  integer,   integer_list,   i32),
    (Long,     long,      long_list,      i64),
    (Short,    short,     short_list,     i16),
    (String,   string,    string_list,    String),
}

impl PropertyCell {
    /// Typed read for a Single Reference cell.
    pub fn reference(&self) -> Result<Option<ObjectRef>, PropertyError> {
        let requested = Shape::single(DataKind::Reference);
        self.expect_shape(requested)?;

        match self.value()? {
            None => Ok(None),
            Some(Value::Reference(inner)) => Ok(Some(inner)),
            Some(other) => Err(mismatch(&self.qname, requested, other.shape())),
        }
    }
}
