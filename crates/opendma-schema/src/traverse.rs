use crate::{
    catalog::Catalog,
    node::{ClassDef, PropertyDecl},
};
use opendma_core::qname::QualifiedName;
use std::collections::BTreeSet;
use thiserror::Error as ThisError;

///
/// TraverseError
///

#[remain::sorted]
#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum TraverseError {
    #[error("inheritance cycle detected at class '{qname}'")]
    CycleDetected { qname: QualifiedName },

    #[error("aspect '{qname}' is not defined in the catalog")]
    MissingAspect { qname: QualifiedName },

    #[error("class '{qname}' is not defined in the catalog")]
    MissingClass { qname: QualifiedName },
}

///
/// SuperclassChain
///
/// Iterator from a class up to its root, most-derived first. Dangling
/// edges and repeated names surface as errors at traversal time; after an
/// error the iterator is exhausted.
///

pub struct SuperclassChain<'a> {
    catalog: &'a Catalog,
    next: Option<QualifiedName>,
    seen: BTreeSet<QualifiedName>,
}

impl<'a> Iterator for SuperclassChain<'a> {
    type Item = Result<&'a ClassDef, TraverseError>;

    fn next(&mut self) -> Option<Self::Item> {
        let qname = self.next.take()?;

        if !self.seen.insert(qname.clone()) {
            return Some(Err(TraverseError::CycleDetected { qname }));
        }

        match self.catalog.class(&qname) {
            Some(def) => {
                self.next = def.super_class.clone();
                Some(Ok(def))
            }
            None => Some(Err(TraverseError::MissingClass { qname })),
        }
    }
}

#[must_use]
pub fn superclass_chain<'a>(catalog: &'a Catalog, qname: &QualifiedName) -> SuperclassChain<'a> {
    SuperclassChain {
        catalog,
        next: Some(qname.clone()),
        seen: BTreeSet::new(),
    }
}

/// Effective property declarations of a class: its own, then its aspects',
/// then the same for each superclass in chain order. The nearest
/// declaration wins on a qname collision.
pub fn effective_properties<'a>(
    catalog: &'a Catalog,
    qname: &QualifiedName,
) -> Result<Vec<&'a PropertyDecl>, TraverseError> {
    let mut picked: Vec<&'a PropertyDecl> = Vec::new();
    let mut seen: BTreeSet<&'a QualifiedName> = BTreeSet::new();

    for step in superclass_chain(catalog, qname) {
        let class = step?;

        for decl in &class.properties {
            if seen.insert(&decl.qname) {
                picked.push(decl);
            }
        }

        for aspect_qname in &class.aspects {
            let aspect =
                catalog
                    .aspect(aspect_qname)
                    .ok_or_else(|| TraverseError::MissingAspect {
                        qname: aspect_qname.clone(),
                    })?;

            for decl in &aspect.properties {
                if seen.insert(&decl.qname) {
                    picked.push(decl);
                }
            }
        }
    }

    Ok(picked)
}
