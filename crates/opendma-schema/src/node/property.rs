use opendma_core::{
    dispatch::PropertyBinding,
    qname::QualifiedName,
    value::{Cardinality, DataKind, Shape},
};
use serde::{Deserialize, Serialize};

///
/// PropertyDecl
///
/// One declared property on a class or aspect: the shape contract plus the
/// declaration-level flags the catalog carries for it. `required` is pure
/// metadata here; whether a store enforces it is the binding's business.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PropertyDecl {
    pub qname: QualifiedName,
    pub kind: DataKind,
    pub cardinality: Cardinality,

    #[serde(default)]
    pub read_only: bool,

    #[serde(default)]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<QualifiedName>,
}

impl PropertyDecl {
    #[must_use]
    pub fn new(qname: QualifiedName, kind: DataKind, cardinality: Cardinality) -> Self {
        Self {
            qname,
            kind,
            cardinality,
            read_only: false,
            required: false,
            choices: None,
        }
    }

    #[must_use]
    pub fn single(qname: QualifiedName, kind: DataKind) -> Self {
        Self::new(qname, kind, Cardinality::Single)
    }

    #[must_use]
    pub fn multi(qname: QualifiedName, kind: DataKind) -> Self {
        Self::new(qname, kind, Cardinality::Multi)
    }

    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn with_choices(mut self, choices: QualifiedName) -> Self {
        self.choices = Some(choices);
        self
    }

    ///
    /// ACCESSORS
    ///

    #[must_use]
    pub const fn shape(&self) -> Shape {
        Shape::new(self.kind, self.cardinality)
    }

    /// The dispatch-level descriptor this declaration implies.
    #[must_use]
    pub fn binding(&self) -> PropertyBinding {
        PropertyBinding::new(self.qname.clone(), self.kind, self.cardinality)
    }
}
