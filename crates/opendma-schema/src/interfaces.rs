//! Synthesis of the dispatch method table from catalog declarations.

use crate::{
    catalog::{Catalog, CatalogError},
    node::PropertyDecl,
    system::system_catalog,
    traverse::effective_properties,
};
use convert_case::{Case, Casing};
use opendma_core::{
    dispatch::{InterfaceDef, InterfaceRegistry},
    value::{Cardinality, DataKind},
};
use std::sync::OnceLock;

///
/// AccessorNames
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccessorNames {
    pub getter: String,
    pub setter: Option<String>,
}

/// Conventional accessor names for one declaration. Single-valued Boolean
/// properties read with `is`, everything else with `get`. Read-only
/// declarations get no setter at all, so a write attempt is unsupported
/// rather than denied.
#[must_use]
pub fn accessor_names(decl: &PropertyDecl) -> AccessorNames {
    let pascal = decl.qname.local().to_case(Case::Pascal);

    let getter = if decl.kind == DataKind::Boolean && decl.cardinality == Cardinality::Single {
        format!("is{pascal}")
    } else {
        format!("get{pascal}")
    };
    let setter = (!decl.read_only).then(|| format!("set{pascal}"));

    AccessorNames { getter, setter }
}

/// Build one capability interface per class and per aspect. A class
/// interface carries the full effective property set, so a facade over a
/// single class name still answers inherited and aspect accessors.
pub fn build_interfaces(catalog: &Catalog) -> Result<InterfaceRegistry, CatalogError> {
    let mut registry = InterfaceRegistry::new();

    for class in catalog.classes() {
        let mut def = InterfaceDef::new(class.qname.clone());

        for decl in effective_properties(catalog, &class.qname)? {
            bind_accessors(&mut def, decl)?;
        }

        registry.insert(def)?;
    }

    for aspect in catalog.aspects() {
        let mut def = InterfaceDef::new(aspect.qname.clone());

        for decl in &aspect.properties {
            bind_accessors(&mut def, decl)?;
        }

        registry.insert(def)?;
    }

    Ok(registry)
}

fn bind_accessors(def: &mut InterfaceDef, decl: &PropertyDecl) -> Result<(), CatalogError> {
    let names = accessor_names(decl);
    let binding = decl.binding();

    def.bind(names.getter, binding.clone())?;
    if let Some(setter) = names.setter {
        def.bind(setter, binding)?;
    }

    Ok(())
}

///
/// SYSTEM_INTERFACES
/// the process-wide descriptor table
///

static SYSTEM_INTERFACES: OnceLock<InterfaceRegistry> = OnceLock::new();

/// Method table over the system catalog, built on first use and immutable
/// afterwards.
pub fn system_interfaces() -> Result<&'static InterfaceRegistry, CatalogError> {
    if let Some(registry) = SYSTEM_INTERFACES.get() {
        return Ok(registry);
    }

    let catalog = system_catalog()?;
    let registry = build_interfaces(&catalog)?;
    drop(catalog);

    Ok(SYSTEM_INTERFACES.get_or_init(|| registry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{node::ClassDef, system::sys};
    use opendma_core::qname::QualifiedName;

    fn qn(local: &str) -> QualifiedName {
        QualifiedName::new("test", local)
    }

    // ---- accessor names ----

    #[test]
    fn getters_follow_the_kind() {
        let decl = PropertyDecl::single(qn("Title"), DataKind::String);
        let names = accessor_names(&decl);
        assert_eq!(names.getter, "getTitle");
        assert_eq!(names.setter.as_deref(), Some("setTitle"));

        let decl = PropertyDecl::single(qn("CheckedOut"), DataKind::Boolean);
        assert_eq!(accessor_names(&decl).getter, "isCheckedOut");

        // multi-valued booleans still read with get
        let decl = PropertyDecl::multi(qn("Flags"), DataKind::Boolean);
        assert_eq!(accessor_names(&decl).getter, "getFlags");
    }

    #[test]
    fn read_only_declarations_have_no_setter() {
        let decl = PropertyDecl::single(qn("Id"), DataKind::Id).read_only();
        let names = accessor_names(&decl);
        assert_eq!(names.getter, "getId");
        assert_eq!(names.setter, None);
    }

    #[test]
    fn non_pascal_locals_are_normalized() {
        let decl = PropertyDecl::single(qn("content_size"), DataKind::Long);
        let names = accessor_names(&decl);
        assert_eq!(names.getter, "getContentSize");
        assert_eq!(names.setter.as_deref(), Some("setContentSize"));
    }

    // ---- registry building ----

    #[test]
    fn class_interfaces_carry_inherited_accessors() {
        let mut catalog = Catalog::new();
        catalog
            .insert_class(
                ClassDef::new(qn("Base"), "Base")
                    .declare(PropertyDecl::single(qn("Name"), DataKind::String).read_only()),
            )
            .unwrap();
        catalog
            .insert_class(
                ClassDef::new(qn("Leaf"), "Leaf")
                    .extends(qn("Base"))
                    .declare(PropertyDecl::single(qn("Title"), DataKind::String)),
            )
            .unwrap();

        let registry = build_interfaces(&catalog).unwrap();
        let leaf = registry.get(&qn("Leaf")).unwrap();

        assert!(leaf.method("getTitle").is_some());
        assert!(leaf.method("setTitle").is_some());
        assert!(leaf.method("getName").is_some());
        assert!(leaf.method("setName").is_none());
    }

    #[test]
    fn a_broken_hierarchy_fails_the_build() {
        let mut catalog = Catalog::new();
        catalog
            .insert_class(ClassDef::new(qn("Orphan"), "Orphan").extends(qn("Gone")))
            .unwrap();

        let err = build_interfaces(&catalog).unwrap_err();
        assert!(matches!(err, CatalogError::Traverse(_)));
    }

    // ---- the system table ----

    #[test]
    fn system_interfaces_cover_the_document_surface() {
        let registry = system_interfaces().unwrap();
        let document = registry.get(&sys("Document")).unwrap();

        assert!(document.method("getTitle").is_some());
        assert!(document.method("setTitle").is_some());
        assert!(document.method("isCheckedOut").is_some());
        assert!(document.method("setCheckedOut").is_none());
        assert!(document.method("getContentElements").is_some());
        assert!(document.method("getTags").is_some());
        assert!(document.method("getCreatedAt").is_some());
        assert!(document.method("setCreatedAt").is_none());

        // aspects stand alone as interfaces too
        let taggable = registry.get(&sys("Taggable")).unwrap();
        assert!(taggable.method("getTags").is_some());
        assert!(taggable.method("setTags").is_some());
        assert!(taggable.method("getTitle").is_none());
    }

    #[test]
    fn repeated_lookups_share_one_table() {
        let first = system_interfaces().unwrap();
        let second = system_interfaces().unwrap();
        assert!(std::ptr::eq(first, second));
    }
}
