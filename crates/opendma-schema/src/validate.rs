//! Catalog validation: one pass that collects every structural problem
//! before bootstrap hands the catalog out.

use crate::{
    catalog::{Catalog, CatalogError},
    node::{ClassDef, PropertyDecl},
    traverse::{TraverseError, superclass_chain},
};
use opendma_core::{qname::QualifiedName, value::DataKind};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error as ThisError;

///
/// ValidationIssue
///

#[remain::sorted]
#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ValidationIssue {
    #[error("property '{property}' is {kind} but choice list '{choices}' holds {list_kind} choices")]
    ChoiceKindMismatch {
        property: QualifiedName,
        kind: DataKind,
        choices: QualifiedName,
        list_kind: DataKind,
    },

    #[error("property '{property}' is {kind}, which cannot carry a choice list")]
    ChoicesNotAllowed { property: QualifiedName, kind: DataKind },

    #[error("inheritance cycle through class '{class}'")]
    Cycle { class: QualifiedName },

    #[error("'{owner}' declares property '{property}' more than once")]
    DuplicateProperty {
        owner: QualifiedName,
        property: QualifiedName,
    },

    #[error("choice list '{choices}' mixes integer and string values")]
    MixedChoiceKinds { choices: QualifiedName },

    #[error("class '{class}' includes unknown aspect '{aspect}'")]
    UnknownAspect {
        class: QualifiedName,
        aspect: QualifiedName,
    },

    #[error("property '{property}' points at unknown choice list '{choices}'")]
    UnknownChoiceList {
        property: QualifiedName,
        choices: QualifiedName,
    },

    #[error("class '{class}' extends unknown class '{super_class}'")]
    UnknownSuperClass {
        class: QualifiedName,
        super_class: QualifiedName,
    },
}

///
/// ValidationReport
///
/// Flat list of everything wrong with a catalog, collected in one pass so
/// a bootstrap failure names every problem at once.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ValidationReport {
    issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    #[must_use]
    pub const fn new() -> Self {
        Self { issues: Vec::new() }
    }

    pub fn push(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    #[must_use]
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// An empty report passes; anything else becomes the bootstrap error.
    pub fn result(self) -> Result<(), CatalogError> {
        if self.issues.is_empty() {
            Ok(())
        } else {
            Err(CatalogError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, issue) in self.issues.iter().enumerate() {
            if index > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

/// Run full catalog validation in a staged, deterministic order.
#[must_use]
pub fn validate_catalog(catalog: &Catalog) -> ValidationReport {
    let mut report = ValidationReport::new();

    // Phase 1: per-definition structural checks.
    for class in catalog.classes() {
        validate_class(catalog, class, &mut report);
    }
    for aspect in catalog.aspects() {
        validate_owner_properties(catalog, &aspect.qname, &aspect.properties, &mut report);
    }
    for list in catalog.choice_lists() {
        if !list.is_uniform() {
            report.push(ValidationIssue::MixedChoiceKinds {
                choices: list.qname.clone(),
            });
        }
    }

    // Phase 2: inheritance shape over the whole hierarchy.
    let mut cycle_reported: BTreeSet<QualifiedName> = BTreeSet::new();
    for class in catalog.classes() {
        for step in superclass_chain(catalog, &class.qname) {
            match step {
                Ok(_) => {}
                Err(TraverseError::CycleDetected { qname }) => {
                    if cycle_reported.insert(qname.clone()) {
                        report.push(ValidationIssue::Cycle { class: qname });
                    }
                    break;
                }
                // dangling edges are reported per class in phase 1
                Err(_) => break,
            }
        }
    }

    report
}

fn validate_class(catalog: &Catalog, class: &ClassDef, report: &mut ValidationReport) {
    if let Some(super_class) = &class.super_class {
        if catalog.class(super_class).is_none() {
            report.push(ValidationIssue::UnknownSuperClass {
                class: class.qname.clone(),
                super_class: super_class.clone(),
            });
        }
    }

    for aspect in &class.aspects {
        if catalog.aspect(aspect).is_none() {
            report.push(ValidationIssue::UnknownAspect {
                class: class.qname.clone(),
                aspect: aspect.clone(),
            });
        }
    }

    validate_owner_properties(catalog, &class.qname, &class.properties, report);
}

fn validate_owner_properties(
    catalog: &Catalog,
    owner: &QualifiedName,
    properties: &[PropertyDecl],
    report: &mut ValidationReport,
) {
    let mut seen: BTreeSet<&QualifiedName> = BTreeSet::new();

    for decl in properties {
        if !seen.insert(&decl.qname) {
            report.push(ValidationIssue::DuplicateProperty {
                owner: owner.clone(),
                property: decl.qname.clone(),
            });
        }

        validate_choices(catalog, decl, report);
    }
}

fn validate_choices(catalog: &Catalog, decl: &PropertyDecl, report: &mut ValidationReport) {
    let Some(choices) = &decl.choices else {
        return;
    };

    if !matches!(decl.kind, DataKind::Integer | DataKind::String) {
        report.push(ValidationIssue::ChoicesNotAllowed {
            property: decl.qname.clone(),
            kind: decl.kind,
        });
        return;
    }

    let Some(list) = catalog.choice_list(choices) else {
        report.push(ValidationIssue::UnknownChoiceList {
            property: decl.qname.clone(),
            choices: choices.clone(),
        });
        return;
    };

    if !list.is_uniform() {
        // the mixed list is reported once in the list pass
        return;
    }

    if let Some(list_kind) = list.value_kind() {
        if list_kind != decl.kind {
            report.push(ValidationIssue::ChoiceKindMismatch {
                property: decl.qname.clone(),
                kind: decl.kind,
                choices: choices.clone(),
                list_kind,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{AspectDef, Choice, ChoiceListDef};

    fn qn(local: &str) -> QualifiedName {
        QualifiedName::new("test", local)
    }

    #[test]
    fn a_well_formed_catalog_passes() {
        let mut catalog = Catalog::new();
        catalog
            .insert_aspect(
                AspectDef::new(qn("Audited"), "Audited")
                    .declare(PropertyDecl::single(qn("CreatedAt"), DataKind::DateTime)),
            )
            .unwrap();
        catalog
            .insert_class(
                ClassDef::new(qn("Base"), "Base")
                    .declare(PropertyDecl::single(qn("Name"), DataKind::String)),
            )
            .unwrap();
        catalog
            .insert_class(
                ClassDef::new(qn("Leaf"), "Leaf")
                    .extends(qn("Base"))
                    .with_aspect(qn("Audited")),
            )
            .unwrap();

        assert!(validate_catalog(&catalog).is_empty());
    }

    #[test]
    fn dangling_references_are_collected_not_short_circuited() {
        let mut catalog = Catalog::new();
        catalog
            .insert_class(
                ClassDef::new(qn("Broken"), "Broken")
                    .extends(qn("GoneClass"))
                    .with_aspect(qn("GoneAspect"))
                    .declare(
                        PropertyDecl::single(qn("Size"), DataKind::Integer)
                            .with_choices(qn("GoneChoices")),
                    ),
            )
            .unwrap();

        let report = validate_catalog(&catalog);
        assert_eq!(report.len(), 3);
        assert!(matches!(
            report.issues()[0],
            ValidationIssue::UnknownSuperClass { .. }
        ));
        assert!(matches!(
            report.issues()[1],
            ValidationIssue::UnknownAspect { .. }
        ));
        assert!(matches!(
            report.issues()[2],
            ValidationIssue::UnknownChoiceList { .. }
        ));
    }

    #[test]
    fn duplicate_declarations_within_one_owner_are_issues() {
        let mut catalog = Catalog::new();
        catalog
            .insert_class(
                ClassDef::new(qn("Thing"), "Thing")
                    .declare(PropertyDecl::single(qn("Name"), DataKind::String))
                    .declare(PropertyDecl::single(qn("Name"), DataKind::Long)),
            )
            .unwrap();

        let report = validate_catalog(&catalog);
        assert_eq!(
            report.issues(),
            &[ValidationIssue::DuplicateProperty {
                owner: qn("Thing"),
                property: qn("Name"),
            }]
        );
    }

    #[test]
    fn shadowing_across_the_hierarchy_is_not_a_duplicate() {
        let mut catalog = Catalog::new();
        catalog
            .insert_class(
                ClassDef::new(qn("Base"), "Base")
                    .declare(PropertyDecl::single(qn("Name"), DataKind::String)),
            )
            .unwrap();
        catalog
            .insert_class(
                ClassDef::new(qn("Leaf"), "Leaf")
                    .extends(qn("Base"))
                    .declare(PropertyDecl::single(qn("Name"), DataKind::String).read_only()),
            )
            .unwrap();

        assert!(validate_catalog(&catalog).is_empty());
    }

    #[test]
    fn choice_lists_must_be_uniform_and_kind_matched() {
        let mut catalog = Catalog::new();
        catalog
            .insert_choice_list(
                ChoiceListDef::new(qn("Mixed"), "Mixed")
                    .with(Choice::integer("one", 1))
                    .with(Choice::string("two", "two")),
            )
            .unwrap();
        catalog
            .insert_choice_list(
                ChoiceListDef::new(qn("Words"), "Words").with(Choice::string("yes", "yes")),
            )
            .unwrap();
        catalog
            .insert_class(
                ClassDef::new(qn("Thing"), "Thing")
                    .declare(
                        PropertyDecl::single(qn("Count"), DataKind::Integer)
                            .with_choices(qn("Words")),
                    )
                    .declare(
                        PropertyDecl::single(qn("Flag"), DataKind::Boolean)
                            .with_choices(qn("Words")),
                    ),
            )
            .unwrap();

        let report = validate_catalog(&catalog);
        assert!(report.issues().iter().any(|issue| matches!(
            issue,
            ValidationIssue::ChoiceKindMismatch {
                list_kind: DataKind::String,
                ..
            }
        )));
        assert!(report.issues().iter().any(|issue| matches!(
            issue,
            ValidationIssue::ChoicesNotAllowed {
                kind: DataKind::Boolean,
                ..
            }
        )));
        assert!(report.issues().iter().any(|issue| matches!(
            issue,
            ValidationIssue::MixedChoiceKinds { .. }
        )));
    }

    #[test]
    fn cycles_are_reported_once_per_entry_point() {
        let mut catalog = Catalog::new();
        catalog
            .insert_class(ClassDef::new(qn("A"), "A").extends(qn("B")))
            .unwrap();
        catalog
            .insert_class(ClassDef::new(qn("B"), "B").extends(qn("A")))
            .unwrap();
        catalog
            .insert_class(ClassDef::new(qn("C"), "C").extends(qn("A")))
            .unwrap();

        let report = validate_catalog(&catalog);
        let cycles: Vec<_> = report
            .issues()
            .iter()
            .filter(|issue| matches!(issue, ValidationIssue::Cycle { .. }))
            .collect();

        // A's and B's walks each hit their own start; C's walk re-hits A
        assert_eq!(cycles.len(), 2);
    }

    #[test]
    fn report_display_joins_issues() {
        let mut report = ValidationReport::new();
        report.push(ValidationIssue::Cycle { class: qn("A") });
        report.push(ValidationIssue::Cycle { class: qn("B") });

        let text = report.to_string();
        assert!(text.contains("test:A"));
        assert!(text.contains("; "));
    }
}
