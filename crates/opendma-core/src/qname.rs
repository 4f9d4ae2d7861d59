use serde::{Deserialize, Serialize};
use std::fmt;

///
/// QualifiedName
///
/// Namespace-scoped name identifying a property, class, aspect or choice
/// list across the whole model. Equality and ordering are structural; two
/// names are the same property if and only if both components match.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct QualifiedName {
    namespace: String,
    local: String,
}

impl QualifiedName {
    #[must_use]
    pub fn new(namespace: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            local: local.into(),
        }
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    #[must_use]
    pub fn local(&self) -> &str {
        &self.local
    }

    #[must_use]
    pub fn matches(&self, namespace: &str, local: &str) -> bool {
        self.namespace == namespace && self.local == local
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.local)
    }
}

impl From<(&str, &str)> for QualifiedName {
    fn from((namespace, local): (&str, &str)) -> Self {
        Self::new(namespace, local)
    }
}
