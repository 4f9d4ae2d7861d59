use crate::{
    qname::QualifiedName,
    value::{Shape, ValueShape},
};
use std::fmt;
use thiserror::Error as ThisError;

///
/// ErrorClass
///
/// Stable classification shared by every model failure. `Usage` means the
/// caller passed something wrong and can remediate; `ServiceFault` means a
/// data source broke a guarantee the model depends on.
///

#[remain::sorted]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    AccessDenied,
    Internal,
    NotFound,
    ServiceFault,
    Unsupported,
    Usage,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::AccessDenied => "access_denied",
            Self::Internal => "internal",
            Self::NotFound => "not_found",
            Self::ServiceFault => "service_fault",
            Self::Unsupported => "unsupported",
            Self::Usage => "usage",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
///
/// Which layer of the model raised the failure.
///

#[remain::sorted]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Catalog,
    Cell,
    Dispatch,
    Object,
    Session,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Catalog => "catalog",
            Self::Cell => "cell",
            Self::Dispatch => "dispatch",
            Self::Object => "object",
            Self::Session => "session",
        };
        write!(f, "{label}")
    }
}

///
/// PropertyError
///
/// Failure raised by a single property cell. Contract mismatches carry both
/// sides: the declared (or requested) shape, and what was actually found.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum PropertyError {
    #[error("property '{qname}' is read-only")]
    AccessDenied { qname: QualifiedName },

    #[error("property '{qname}' expects {expected}, found {found}")]
    InvalidDataType {
        qname: QualifiedName,
        expected: Shape,
        found: ValueShape,
    },

    #[error("deferred value for property '{qname}' violated its contract: {source}")]
    ResolveContract {
        qname: QualifiedName,
        source: Box<PropertyError>,
    },
}

impl PropertyError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::AccessDenied { .. } => ErrorClass::AccessDenied,
            Self::InvalidDataType { .. } => ErrorClass::Usage,
            // the provider, not the caller, produced the bad value
            Self::ResolveContract { .. } => ErrorClass::ServiceFault,
        }
    }

    #[must_use]
    pub const fn origin(&self) -> ErrorOrigin {
        ErrorOrigin::Cell
    }
}

///
/// ObjectError
///
/// Failure raised by an object-level property lookup or write.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ObjectError {
    #[error("property '{qname}' is not declared on this object")]
    NotDeclared { qname: QualifiedName },

    #[error("property '{qname}' is already declared on this object")]
    AlreadyDeclared { qname: QualifiedName },

    #[error("property '{qname}' is not writable")]
    AccessDenied { qname: QualifiedName },

    #[error(transparent)]
    Property(PropertyError),

    #[error("object failure: {message}")]
    Internal { message: String },
}

impl ObjectError {
    /// Map a cell write failure so that denial carries the object-level
    /// variant while contract failures pass through unchanged.
    #[must_use]
    pub fn from_write(qname: &QualifiedName, err: PropertyError) -> Self {
        match err {
            PropertyError::AccessDenied { .. } => Self::AccessDenied {
                qname: qname.clone(),
            },
            other => Self::Property(other),
        }
    }

    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::NotDeclared { .. } => ErrorClass::NotFound,
            Self::AlreadyDeclared { .. } | Self::Internal { .. } => ErrorClass::Internal,
            Self::AccessDenied { .. } => ErrorClass::AccessDenied,
            Self::Property(err) => err.class(),
        }
    }

    #[must_use]
    pub const fn origin(&self) -> ErrorOrigin {
        match self {
            Self::Property(err) => err.origin(),
            _ => ErrorOrigin::Object,
        }
    }
}
