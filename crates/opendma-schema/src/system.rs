//! The predefined model: the classes, aspects, and choice lists every
//! repository binding is expected to understand, installed into the global
//! catalog at bootstrap.

use crate::{
    catalog::{Catalog, CatalogError, catalog, catalog_write},
    node::{AspectDef, Choice, ChoiceListDef, ClassDef, PropertyDecl},
};
use opendma_core::{qname::QualifiedName, value::DataKind};
use std::sync::RwLockReadGuard;

/// Namespace of every predefined definition.
pub const SYSTEM_NAMESPACE: &str = "odma";

/// Qualified name in the system namespace.
#[must_use]
pub fn sys(local: &str) -> QualifiedName {
    QualifiedName::new(SYSTEM_NAMESPACE, local)
}

/// Install the predefined model into the global catalog. Idempotent; the
/// write lock is held across the whole install so concurrent callers
/// cannot interleave.
pub fn install_system_catalog() -> Result<(), CatalogError> {
    let mut catalog = catalog_write();

    // a later caller finds the root class and backs off
    if catalog.class(&sys("Object")).is_some() {
        return Ok(());
    }

    for list in system_choice_lists() {
        catalog.insert_choice_list(list)?;
    }
    for aspect in system_aspects() {
        catalog.insert_aspect(aspect)?;
    }
    for class in system_classes() {
        catalog.insert_class(class)?;
    }

    Ok(())
}

/// Validated read guard over the installed system catalog.
pub fn system_catalog() -> Result<RwLockReadGuard<'static, Catalog>, CatalogError> {
    install_system_catalog()?;
    catalog()
}

///
/// CLASSES
///

fn system_classes() -> Vec<ClassDef> {
    vec![
        object_class(),
        document_class(),
        folder_class(),
        association_class(),
        class_class(),
        property_declaration_class(),
        choice_list_class(),
    ]
}

fn object_class() -> ClassDef {
    ClassDef::new(sys("Object"), "Object")
        .not_instantiable()
        .declare(PropertyDecl::single(sys("Id"), DataKind::Id).read_only().required())
        .declare(
            PropertyDecl::single(sys("Guid"), DataKind::Guid)
                .read_only()
                .required(),
        )
        .declare(
            PropertyDecl::single(sys("Namespace"), DataKind::String)
                .read_only()
                .required(),
        )
        .declare(
            PropertyDecl::single(sys("Name"), DataKind::String)
                .read_only()
                .required(),
        )
        .declare(PropertyDecl::single(sys("Title"), DataKind::String))
        .declare(PropertyDecl::single(sys("Description"), DataKind::String))
}

fn document_class() -> ClassDef {
    ClassDef::new(sys("Document"), "Document")
        .extends(sys("Object"))
        .with_aspect(sys("Auditable"))
        .with_aspect(sys("Taggable"))
        .declare(PropertyDecl::multi(sys("ContentElements"), DataKind::Content))
        .declare(PropertyDecl::single(sys("ContentSize"), DataKind::Long).read_only())
        .declare(PropertyDecl::single(sys("MimeType"), DataKind::String))
        .declare(
            PropertyDecl::single(sys("MimeTypeFamily"), DataKind::String)
                .with_choices(sys("MimeTypeFamily")),
        )
        .declare(PropertyDecl::single(sys("CheckedOut"), DataKind::Boolean).read_only())
        .declare(PropertyDecl::multi(sys("ParentFolders"), DataKind::Reference).read_only())
}

fn folder_class() -> ClassDef {
    ClassDef::new(sys("Folder"), "Folder")
        .extends(sys("Object"))
        .with_aspect(sys("Auditable"))
        .declare(PropertyDecl::multi(sys("Containees"), DataKind::Reference).read_only())
        .declare(PropertyDecl::single(sys("ParentFolder"), DataKind::Reference))
}

fn association_class() -> ClassDef {
    ClassDef::new(sys("Association"), "Association")
        .extends(sys("Object"))
        .declare(PropertyDecl::single(sys("Source"), DataKind::Reference).required())
        .declare(PropertyDecl::single(sys("Target"), DataKind::Reference).required())
}

fn class_class() -> ClassDef {
    ClassDef::new(sys("Class"), "Class")
        .extends(sys("Object"))
        .not_instantiable()
        .declare(PropertyDecl::single(sys("SuperClass"), DataKind::Reference).read_only())
        .declare(PropertyDecl::single(sys("Instantiable"), DataKind::Boolean).read_only())
        .declare(PropertyDecl::multi(sys("PropertyDeclarations"), DataKind::Reference).read_only())
        .declare(PropertyDecl::multi(sys("IncludedAspects"), DataKind::Reference).read_only())
}

fn property_declaration_class() -> ClassDef {
    ClassDef::new(sys("PropertyDeclaration"), "Property declaration")
        .extends(sys("Object"))
        .not_instantiable()
        .declare(
            PropertyDecl::single(sys("PropertyKind"), DataKind::Integer)
                .read_only()
                .with_choices(sys("PropertyKinds")),
        )
        .declare(PropertyDecl::single(sys("Multivalued"), DataKind::Boolean).read_only())
        .declare(PropertyDecl::single(sys("ReadOnly"), DataKind::Boolean).read_only())
        .declare(PropertyDecl::single(sys("Required"), DataKind::Boolean).read_only())
        .declare(PropertyDecl::single(sys("ChoiceList"), DataKind::Reference).read_only())
}

fn choice_list_class() -> ClassDef {
    ClassDef::new(sys("ChoiceList"), "Choice list")
        .extends(sys("Object"))
        .not_instantiable()
        .declare(PropertyDecl::multi(sys("Choices"), DataKind::String).read_only())
}

///
/// ASPECTS
///

fn system_aspects() -> Vec<AspectDef> {
    vec![auditable_aspect(), taggable_aspect()]
}

fn auditable_aspect() -> AspectDef {
    AspectDef::new(sys("Auditable"), "Auditable")
        .declare(PropertyDecl::single(sys("CreatedAt"), DataKind::DateTime).read_only())
        .declare(PropertyDecl::single(sys("CreatedBy"), DataKind::String).read_only())
        .declare(PropertyDecl::single(sys("ModifiedAt"), DataKind::DateTime).read_only())
        .declare(PropertyDecl::single(sys("ModifiedBy"), DataKind::String).read_only())
}

fn taggable_aspect() -> AspectDef {
    AspectDef::new(sys("Taggable"), "Taggable")
        .declare(PropertyDecl::multi(sys("Tags"), DataKind::String))
}

///
/// CHOICE LISTS
///

const MIME_FAMILIES: [&str; 8] = [
    "application",
    "audio",
    "image",
    "message",
    "model",
    "multipart",
    "text",
    "video",
];

fn system_choice_lists() -> Vec<ChoiceListDef> {
    vec![property_kinds_list(), mime_type_family_list()]
}

fn property_kinds_list() -> ChoiceListDef {
    let mut list = ChoiceListDef::new(sys("PropertyKinds"), "Property kinds");

    for (code, kind) in (0i32..).zip(DataKind::ALL) {
        list = list.with(Choice::integer(kind.to_string(), code));
    }

    list
}

fn mime_type_family_list() -> ChoiceListDef {
    let mut list = ChoiceListDef::new(sys("MimeTypeFamily"), "MIME type family");

    for family in MIME_FAMILIES {
        list = list.with(Choice::string(family, family));
    }

    list
}
