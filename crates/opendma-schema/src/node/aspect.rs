use crate::node::PropertyDecl;
use opendma_core::qname::QualifiedName;
use serde::{Deserialize, Serialize};

///
/// AspectDef
///
/// A mixin bundle of property declarations. Aspects have no inheritance of
/// their own; classes include them by name.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct AspectDef {
    pub qname: QualifiedName,
    pub display_name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<PropertyDecl>,
}

impl AspectDef {
    #[must_use]
    pub fn new(qname: QualifiedName, display_name: impl Into<String>) -> Self {
        Self {
            qname,
            display_name: display_name.into(),
            properties: Vec::new(),
        }
    }

    #[must_use]
    pub fn declare(mut self, decl: PropertyDecl) -> Self {
        self.properties.push(decl);
        self
    }

    #[must_use]
    pub fn property(&self, qname: &QualifiedName) -> Option<&PropertyDecl> {
        self.properties.iter().find(|decl| decl.qname == *qname)
    }
}
