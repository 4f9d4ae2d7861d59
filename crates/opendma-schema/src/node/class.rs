use crate::node::PropertyDecl;
use opendma_core::qname::QualifiedName;
use serde::{Deserialize, Serialize};

///
/// ClassDef
///
/// One class in the metamodel: an ordered list of property declarations
/// plus single inheritance and any number of included aspects. Declaration
/// order is preserved; it feeds the deterministic effective-property order.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ClassDef {
    pub qname: QualifiedName,
    pub display_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub super_class: Option<QualifiedName>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aspects: Vec<QualifiedName>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<PropertyDecl>,

    pub instantiable: bool,
}

impl ClassDef {
    #[must_use]
    pub fn new(qname: QualifiedName, display_name: impl Into<String>) -> Self {
        Self {
            qname,
            display_name: display_name.into(),
            super_class: None,
            aspects: Vec::new(),
            properties: Vec::new(),
            instantiable: true,
        }
    }

    #[must_use]
    pub fn extends(mut self, super_class: QualifiedName) -> Self {
        self.super_class = Some(super_class);
        self
    }

    #[must_use]
    pub fn with_aspect(mut self, aspect: QualifiedName) -> Self {
        self.aspects.push(aspect);
        self
    }

    #[must_use]
    pub fn declare(mut self, decl: PropertyDecl) -> Self {
        self.properties.push(decl);
        self
    }

    #[must_use]
    pub fn not_instantiable(mut self) -> Self {
        self.instantiable = false;
        self
    }

    ///
    /// ACCESSORS
    ///

    /// Look up a property declared directly on this class; inherited and
    /// aspect properties live with their owners.
    #[must_use]
    pub fn property(&self, qname: &QualifiedName) -> Option<&PropertyDecl> {
        self.properties.iter().find(|decl| decl.qname == *qname)
    }
}
