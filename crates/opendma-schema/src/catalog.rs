use crate::{
    node::{AspectDef, ChoiceListDef, ClassDef},
    traverse::TraverseError,
    validate::{ValidationReport, validate_catalog},
};
use opendma_core::{dispatch::RegistryError, qname::QualifiedName};
use std::collections::BTreeMap;
use std::sync::{LazyLock, OnceLock, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error as ThisError;

///
/// CatalogError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum CatalogError {
    #[error("class '{qname}' is already defined")]
    DuplicateClass { qname: QualifiedName },

    #[error("aspect '{qname}' is already defined")]
    DuplicateAspect { qname: QualifiedName },

    #[error("choice list '{qname}' is already defined")]
    DuplicateChoiceList { qname: QualifiedName },

    #[error("catalog validation failed: {0}")]
    Validation(ValidationReport),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Traverse(#[from] TraverseError),
}

///
/// Catalog
///
/// The full metamodel: classes, aspects, and choice lists keyed by
/// qualified name. Insertion only rejects duplicates; consistency across
/// definitions is the validator's job.
///

#[derive(Clone, Debug, Default)]
pub struct Catalog {
    classes: BTreeMap<QualifiedName, ClassDef>,
    aspects: BTreeMap<QualifiedName, AspectDef>,
    choice_lists: BTreeMap<QualifiedName, ChoiceListDef>,
}

impl Catalog {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            classes: BTreeMap::new(),
            aspects: BTreeMap::new(),
            choice_lists: BTreeMap::new(),
        }
    }

    ///
    /// INSERTION
    ///

    pub fn insert_class(&mut self, def: ClassDef) -> Result<(), CatalogError> {
        if self.classes.contains_key(&def.qname) {
            return Err(CatalogError::DuplicateClass { qname: def.qname });
        }

        self.classes.insert(def.qname.clone(), def);
        Ok(())
    }

    pub fn insert_aspect(&mut self, def: AspectDef) -> Result<(), CatalogError> {
        if self.aspects.contains_key(&def.qname) {
            return Err(CatalogError::DuplicateAspect { qname: def.qname });
        }

        self.aspects.insert(def.qname.clone(), def);
        Ok(())
    }

    pub fn insert_choice_list(&mut self, def: ChoiceListDef) -> Result<(), CatalogError> {
        if self.choice_lists.contains_key(&def.qname) {
            return Err(CatalogError::DuplicateChoiceList { qname: def.qname });
        }

        self.choice_lists.insert(def.qname.clone(), def);
        Ok(())
    }

    ///
    /// LOOKUP
    ///

    #[must_use]
    pub fn class(&self, qname: &QualifiedName) -> Option<&ClassDef> {
        self.classes.get(qname)
    }

    #[must_use]
    pub fn aspect(&self, qname: &QualifiedName) -> Option<&AspectDef> {
        self.aspects.get(qname)
    }

    #[must_use]
    pub fn choice_list(&self, qname: &QualifiedName) -> Option<&ChoiceListDef> {
        self.choice_lists.get(qname)
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassDef> {
        self.classes.values()
    }

    pub fn aspects(&self) -> impl Iterator<Item = &AspectDef> {
        self.aspects.values()
    }

    pub fn choice_lists(&self) -> impl Iterator<Item = &ChoiceListDef> {
        self.choice_lists.values()
    }

    #[must_use]
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }
}

///
/// CATALOG
/// the static data structure
///

static CATALOG: LazyLock<RwLock<Catalog>> = LazyLock::new(|| RwLock::new(Catalog::new()));

static CATALOG_VALIDATED: OnceLock<bool> = OnceLock::new();

/// Acquire a write guard to the global catalog during bootstrap.
pub fn catalog_write() -> RwLockWriteGuard<'static, Catalog> {
    CATALOG
        .write()
        .expect("catalog RwLock poisoned while acquiring write lock")
}

// catalog_read
// just reads the catalog directly without validation
pub(crate) fn catalog_read() -> RwLockReadGuard<'static, Catalog> {
    CATALOG
        .read()
        .expect("catalog RwLock poisoned while acquiring read lock")
}

/// Read the global catalog, validating it exactly once per process.
pub fn catalog() -> Result<RwLockReadGuard<'static, Catalog>, CatalogError> {
    let catalog = catalog_read();
    validate_once(&catalog)?;

    Ok(catalog)
}

// validate
fn validate_once(catalog: &Catalog) -> Result<(), CatalogError> {
    if CATALOG_VALIDATED.get().copied().unwrap_or(false) {
        return Ok(());
    }

    validate_catalog(catalog).result()?;
    CATALOG_VALIDATED.set(true).ok();

    Ok(())
}
