use crate::{
    cell::{PropertyCell, ValueProvider},
    error::PropertyError,
    test_support::{
        empty_sequence, fixture_refs, qn, sample_sequence, sample_value, writable_cell,
    },
    types::{ReferenceList, Timestamp},
    value::{Cardinality, DataKind, Shape, Value, ValueShape},
};
use proptest::prelude::*;
use std::cell::Cell;
use std::rc::Rc;

// ---- helpers -----------------------------------------------------------

fn counting_provider(
    calls: &Rc<Cell<usize>>,
    produced: Option<Value>,
) -> ValueProvider {
    let calls = Rc::clone(calls);
    ValueProvider::new(move || {
        calls.set(calls.get() + 1);
        produced
    })
}

fn other_kind(kind: DataKind) -> DataKind {
    if kind == DataKind::String {
        DataKind::Integer
    } else {
        DataKind::String
    }
}

// ---- construction ------------------------------------------------------

#[test]
fn single_cells_accept_their_own_kind_and_absence() {
    for kind in DataKind::ALL {
        let with_value = PropertyCell::new(
            qn("P"),
            kind,
            Cardinality::Single,
            false,
            Some(sample_value(kind)),
        );
        assert!(with_value.is_ok(), "kind {kind}");

        let absent = PropertyCell::new(qn("P"), kind, Cardinality::Single, false, None);
        assert!(absent.is_ok(), "kind {kind}");
    }
}

#[test]
fn multi_cells_require_a_sequence() {
    for kind in DataKind::ALL {
        let ok = PropertyCell::new(
            qn("P"),
            kind,
            Cardinality::Multi,
            false,
            Some(sample_sequence(kind)),
        );
        assert!(ok.is_ok(), "kind {kind}");

        let absent = PropertyCell::new(qn("P"), kind, Cardinality::Multi, false, None);
        assert!(
            matches!(absent, Err(PropertyError::InvalidDataType { .. })),
            "kind {kind}"
        );

        let scalar = PropertyCell::new(
            qn("P"),
            kind,
            Cardinality::Multi,
            false,
            Some(sample_value(kind)),
        );
        assert!(
            matches!(scalar, Err(PropertyError::InvalidDataType { .. })),
            "kind {kind}"
        );
    }
}

#[test]
fn construction_rejects_a_mismatched_kind() {
    let err = PropertyCell::new(
        qn("Title"),
        DataKind::String,
        Cardinality::Single,
        false,
        Some(Value::Integer(42)),
    )
    .unwrap_err();

    assert_eq!(
        err,
        PropertyError::InvalidDataType {
            qname: qn("Title"),
            expected: Shape::single(DataKind::String),
            found: ValueShape::Scalar(DataKind::Integer),
        }
    );
}

#[test]
fn new_cells_start_clean() {
    let cell = writable_cell("Title", DataKind::String, Cardinality::Single);
    assert!(!cell.is_dirty());
    assert!(!cell.is_pending());
}

// ---- generic writes ----------------------------------------------------

#[test]
fn write_then_read_round_trips_every_kind() {
    for kind in DataKind::ALL {
        let cell = writable_cell("P", kind, Cardinality::Single);
        let value = sample_value(kind);

        cell.set_value(Some(value.clone())).unwrap();
        assert_eq!(cell.value().unwrap(), Some(value), "kind {kind}");
        assert!(cell.is_dirty(), "kind {kind}");
    }
}

#[test]
fn write_of_the_wrong_kind_is_rejected_and_atomic() {
    let cell = writable_cell("Title", DataKind::String, Cardinality::Single);
    cell.set_value(Some(Value::from("kept"))).unwrap();
    cell.mark_clean();

    let err = cell.set_value(Some(Value::Integer(42))).unwrap_err();
    assert_eq!(
        err,
        PropertyError::InvalidDataType {
            qname: qn("Title"),
            expected: Shape::single(DataKind::String),
            found: ValueShape::Scalar(DataKind::Integer),
        }
    );

    // the failed write changed nothing
    assert_eq!(cell.value().unwrap(), Some(Value::from("kept")));
    assert!(!cell.is_dirty());
}

#[test]
fn clearing_a_single_cell_is_a_write() {
    let cell = writable_cell("Title", DataKind::String, Cardinality::Single);
    cell.set_value(Some(Value::from("x"))).unwrap();
    cell.set_value(None).unwrap();

    assert_eq!(cell.value().unwrap(), None);
    assert!(cell.is_dirty());
}

#[test]
fn clearing_a_multi_cell_is_rejected() {
    let cell = writable_cell("Tags", DataKind::String, Cardinality::Multi);
    let err = cell.set_value(None).unwrap_err();

    assert_eq!(
        err,
        PropertyError::InvalidDataType {
            qname: qn("Tags"),
            expected: Shape::multi(DataKind::String),
            found: ValueShape::Missing,
        }
    );
}

#[test]
fn single_cell_rejects_a_sequence() {
    let cell = writable_cell("Title", DataKind::String, Cardinality::Single);
    let err = cell
        .set_value(Some(Value::List(vec![Value::from("a")])))
        .unwrap_err();

    assert!(matches!(
        err,
        PropertyError::InvalidDataType {
            found: ValueShape::List(1),
            ..
        }
    ));
}

#[test]
fn multi_write_reports_the_offending_element() {
    let cell = writable_cell("Tags", DataKind::String, Cardinality::Multi);
    let err = cell
        .set_value(Some(Value::List(vec![
            Value::from("ok"),
            Value::Boolean(true),
            Value::from("later"),
        ])))
        .unwrap_err();

    assert_eq!(
        err,
        PropertyError::InvalidDataType {
            qname: qn("Tags"),
            expected: Shape::multi(DataKind::String),
            found: ValueShape::Element {
                index: 1,
                found: Some(DataKind::Boolean),
            },
        }
    );
}

#[test]
fn multi_reference_cells_take_sequences_not_lists() {
    let cell = writable_cell("Parents", DataKind::Reference, Cardinality::Multi);

    // a materialized list of references is still the wrong shape
    let err = cell
        .set_value(Some(Value::List(
            fixture_refs(2).into_iter().map(Value::Reference).collect(),
        )))
        .unwrap_err();
    assert!(matches!(err, PropertyError::InvalidDataType { .. }));

    cell.set_value(Some(Value::References(ReferenceList::from_vec(
        fixture_refs(2),
    ))))
    .unwrap();
    assert_eq!(cell.reference_list().unwrap().size_hint(), Some(2));
}

#[test]
fn read_only_denial_takes_precedence_over_the_contract() {
    let cell = PropertyCell::new(
        qn("Id"),
        DataKind::Id,
        Cardinality::Single,
        true,
        Some(sample_value(DataKind::Id)),
    )
    .unwrap();

    // even a type-invalid argument reports denial, not mismatch
    let err = cell.set_value(Some(Value::Boolean(false))).unwrap_err();
    assert_eq!(err, PropertyError::AccessDenied { qname: qn("Id") });

    // the stored value is untouched and still readable
    assert_eq!(cell.value().unwrap(), Some(sample_value(DataKind::Id)));
    assert!(!cell.is_dirty());
}

// ---- typed accessors ---------------------------------------------------

#[test]
fn typed_reads_return_native_values() {
    let title = writable_cell("Title", DataKind::String, Cardinality::Single);
    title.set_value(Some(Value::from("Annual Report"))).unwrap();
    assert_eq!(title.string().unwrap(), Some("Annual Report".to_string()));

    let count = writable_cell("Count", DataKind::Integer, Cardinality::Single);
    count.set_value(Some(Value::Integer(3))).unwrap();
    assert_eq!(count.integer().unwrap(), Some(3));

    let flag = writable_cell("Hidden", DataKind::Boolean, Cardinality::Single);
    flag.set_value(Some(Value::Boolean(true))).unwrap();
    assert_eq!(flag.boolean().unwrap(), Some(true));

    let at = writable_cell("CreatedAt", DataKind::DateTime, Cardinality::Single);
    at.set_value(Some(Value::DateTime(Timestamp::from_seconds(5))))
        .unwrap();
    assert_eq!(at.date_time().unwrap(), Some(Timestamp::from_seconds(5)));

    let empty = writable_cell("Missing", DataKind::Double, Cardinality::Single);
    assert_eq!(empty.double().unwrap(), None);
}

#[test]
fn typed_list_reads_return_native_vectors() {
    let tags = writable_cell("Tags", DataKind::String, Cardinality::Multi);
    tags.set_value(Some(Value::List(vec![
        Value::from("a"),
        Value::from("b"),
    ])))
    .unwrap();

    assert_eq!(tags.string_list().unwrap(), vec!["a".to_string(), "b".to_string()]);

    let scores = writable_cell("Scores", DataKind::Long, Cardinality::Multi);
    scores
        .set_value(Some(Value::List(vec![Value::Long(10), Value::Long(20)])))
        .unwrap();
    assert_eq!(scores.long_list().unwrap(), vec![10, 20]);
}

#[test]
fn accessor_shape_mismatch_names_both_sides() {
    let cell = writable_cell("Title", DataKind::String, Cardinality::Single);

    let err = cell.integer().unwrap_err();
    assert_eq!(
        err,
        PropertyError::InvalidDataType {
            qname: qn("Title"),
            expected: Shape::single(DataKind::Integer),
            found: ValueShape::Declared(Shape::single(DataKind::String)),
        }
    );

    // cardinality alone is enough to mismatch
    let err = cell.string_list().unwrap_err();
    assert_eq!(
        err,
        PropertyError::InvalidDataType {
            qname: qn("Title"),
            expected: Shape::multi(DataKind::String),
            found: ValueShape::Declared(Shape::single(DataKind::String)),
        }
    );
}

#[test]
fn every_kind_rejects_every_other_accessor_kind() {
    for kind in DataKind::ALL {
        let cell = writable_cell("P", kind, Cardinality::Single);
        let err = match other_kind(kind) {
            DataKind::Integer => cell.integer().unwrap_err(),
            _ => cell.string().unwrap_err(),
        };
        assert!(
            matches!(err, PropertyError::InvalidDataType { .. }),
            "kind {kind}"
        );
    }
}

// ---- deferred resolution -----------------------------------------------

#[test]
fn provider_is_not_invoked_at_construction() {
    let calls = Rc::new(Cell::new(0));
    let cell = PropertyCell::deferred(
        qn("Title"),
        DataKind::String,
        Cardinality::Single,
        false,
        counting_provider(&calls, Some(Value::from("lazy"))),
    );

    assert!(cell.is_pending());
    assert_eq!(calls.get(), 0);
}

#[test]
fn provider_runs_once_and_the_value_is_cached() {
    let calls = Rc::new(Cell::new(0));
    let cell = PropertyCell::deferred(
        qn("Title"),
        DataKind::String,
        Cardinality::Single,
        false,
        counting_provider(&calls, Some(Value::from("lazy"))),
    );

    assert_eq!(cell.value().unwrap(), Some(Value::from("lazy")));
    assert_eq!(cell.value().unwrap(), Some(Value::from("lazy")));
    assert_eq!(calls.get(), 1);
    assert!(!cell.is_pending());
    assert!(!cell.is_dirty(), "resolution is a load, not a write");
}

#[test]
fn write_before_first_read_discards_the_provider_unresolved() {
    let calls = Rc::new(Cell::new(0));
    let cell = PropertyCell::deferred(
        qn("Title"),
        DataKind::String,
        Cardinality::Single,
        false,
        counting_provider(&calls, Some(Value::from("never seen"))),
    );

    cell.set_value(Some(Value::from("explicit"))).unwrap();
    assert_eq!(cell.value().unwrap(), Some(Value::from("explicit")));
    assert_eq!(calls.get(), 0);
}

#[test]
fn provider_contract_violation_is_a_resolve_fault() {
    let calls = Rc::new(Cell::new(0));
    let cell = PropertyCell::deferred(
        qn("Title"),
        DataKind::String,
        Cardinality::Single,
        false,
        counting_provider(&calls, Some(Value::Integer(42))),
    );

    let err = cell.value().unwrap_err();
    match err {
        PropertyError::ResolveContract { qname, source } => {
            assert_eq!(qname, qn("Title"));
            assert!(matches!(*source, PropertyError::InvalidDataType { .. }));
        }
        other => panic!("expected resolve fault, got {other:?}"),
    }

    // consumed: later reads see an empty cell, no second invocation
    assert_eq!(cell.value().unwrap(), None);
    assert_eq!(calls.get(), 1);
}

#[test]
fn multi_provider_returning_absence_is_a_resolve_fault() {
    let calls = Rc::new(Cell::new(0));
    let cell = PropertyCell::deferred(
        qn("Tags"),
        DataKind::String,
        Cardinality::Multi,
        false,
        counting_provider(&calls, None),
    );

    let err = cell.value().unwrap_err();
    assert!(matches!(err, PropertyError::ResolveContract { .. }));
    assert_eq!(calls.get(), 1);
}

#[test]
fn mismatched_accessor_does_not_resolve_the_provider() {
    let calls = Rc::new(Cell::new(0));
    let cell = PropertyCell::deferred(
        qn("Title"),
        DataKind::String,
        Cardinality::Single,
        false,
        counting_provider(&calls, Some(Value::from("lazy"))),
    );

    assert!(cell.integer().is_err());
    assert_eq!(calls.get(), 0);
    assert!(cell.is_pending());
}

#[test]
fn lazy_reference_sequence_materializes_once() {
    let calls = Rc::new(Cell::new(0));
    let refs = fixture_refs(3);
    let cell = PropertyCell::deferred(
        qn("Parents"),
        DataKind::Reference,
        Cardinality::Multi,
        true,
        counting_provider(
            &calls,
            Some(Value::References(ReferenceList::from_vec(refs.clone()))),
        ),
    );

    let first = cell.reference_list().unwrap();
    assert_eq!(first.to_vec(), refs);
    assert_eq!(calls.get(), 1);

    // second read shares the cached sequence; nothing re-runs
    let second = cell.reference_list().unwrap();
    assert_eq!(second, first);
    assert_eq!(calls.get(), 1);
}

// ---- dirty tracking ----------------------------------------------------

#[test]
fn dirty_lifecycle() {
    let cell = writable_cell("Title", DataKind::String, Cardinality::Single);
    assert!(!cell.is_dirty());

    cell.set_value(Some(Value::from("a"))).unwrap();
    assert!(cell.is_dirty());

    cell.mark_clean();
    assert!(!cell.is_dirty());

    // rewriting the same value still counts as a write
    cell.set_value(Some(Value::from("a"))).unwrap();
    assert!(cell.is_dirty());
}

// ---- property-based ----------------------------------------------------

fn arb_kind() -> impl Strategy<Value = DataKind> {
    (0..DataKind::ALL.len()).prop_map(|i| DataKind::ALL[i])
}

proptest! {
    #[test]
    fn matching_scalar_writes_always_succeed(kind in arb_kind()) {
        let cell = writable_cell("P", kind, Cardinality::Single);
        prop_assert!(cell.set_value(Some(sample_value(kind))).is_ok());
    }

    #[test]
    fn mismatched_scalar_writes_always_fail(declared in arb_kind(), written in arb_kind()) {
        prop_assume!(declared != written);

        let cell = writable_cell("P", declared, Cardinality::Single);
        let err = cell.set_value(Some(sample_value(written))).unwrap_err();
        prop_assert!(
            matches!(err, PropertyError::InvalidDataType { .. }),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn lists_of_a_foreign_kind_never_enter_a_multi_cell(
        declared in arb_kind(),
        written in arb_kind(),
        len in 1usize..4,
    ) {
        prop_assume!(declared != written);
        prop_assume!(declared != DataKind::Reference && written != DataKind::Reference);

        let cell = writable_cell("P", declared, Cardinality::Multi);
        let items = (0..len).map(|_| sample_value(written)).collect();
        let err = cell.set_value(Some(Value::List(items))).unwrap_err();
        prop_assert!(
            matches!(err, PropertyError::InvalidDataType { .. }),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn empty_sequences_are_always_acceptable(kind in arb_kind()) {
        let cell = writable_cell("P", kind, Cardinality::Multi);
        prop_assert!(cell.set_value(Some(empty_sequence(kind))).is_ok());
        prop_assert_eq!(cell.value().unwrap(), Some(empty_sequence(kind)));
    }
}
