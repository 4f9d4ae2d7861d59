use opendma_core::{
    dispatch::DispatchError,
    error::{ErrorClass, ErrorOrigin as CoreOrigin, ObjectError, PropertyError},
};
use opendma_schema::{catalog::CatalogError, traverse::TraverseError};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error as ThisError;

///
/// ErrorKind
///
/// Stable public classification. Every internal failure folds into one of
/// these; `InvalidDataType` is the only kind the caller fixes by changing
/// an argument.
///

#[remain::sorted]
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    AccessDenied,
    Internal,
    InvalidDataType,
    NotFound,
    ServiceFault,
    Unsupported,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::AccessDenied => "access_denied",
            Self::Internal => "internal",
            Self::InvalidDataType => "invalid_data_type",
            Self::NotFound => "not_found",
            Self::ServiceFault => "service_fault",
            Self::Unsupported => "unsupported",
        };
        write!(f, "{label}")
    }
}

impl From<ErrorClass> for ErrorKind {
    fn from(class: ErrorClass) -> Self {
        match class {
            ErrorClass::AccessDenied => Self::AccessDenied,
            ErrorClass::Internal => Self::Internal,
            ErrorClass::NotFound => Self::NotFound,
            ErrorClass::ServiceFault => Self::ServiceFault,
            ErrorClass::Unsupported => Self::Unsupported,
            // the model's only usage failure is a shape mismatch
            ErrorClass::Usage => Self::InvalidDataType,
        }
    }
}

///
/// ErrorOrigin
///
/// Which layer raised the failure, in the public vocabulary.
///

#[remain::sorted]
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
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

impl From<CoreOrigin> for ErrorOrigin {
    fn from(origin: CoreOrigin) -> Self {
        match origin {
            CoreOrigin::Catalog => Self::Catalog,
            CoreOrigin::Cell => Self::Cell,
            CoreOrigin::Dispatch => Self::Dispatch,
            CoreOrigin::Object => Self::Object,
            CoreOrigin::Session => Self::Session,
        }
    }
}

///
/// Error
///
/// The one failure type the public surface returns. Structured kind and
/// origin plus a rendered message; the internal error chain is flattened
/// at the boundary.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            kind,
            origin,
            message: message.into(),
        }
    }

    /// Construct a session-origin not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, ErrorOrigin::Session, message)
    }

    /// Construct a session-origin unsupported error.
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unsupported, ErrorOrigin::Session, message)
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.kind, ErrorKind::NotFound)
    }

    #[must_use]
    pub fn display_with_kind(&self) -> String {
        format!("{}:{}: {}", self.origin, self.kind, self.message)
    }
}

impl From<PropertyError> for Error {
    fn from(err: PropertyError) -> Self {
        Self::new(err.class().into(), err.origin().into(), err.to_string())
    }
}

impl From<ObjectError> for Error {
    fn from(err: ObjectError) -> Self {
        Self::new(err.class().into(), err.origin().into(), err.to_string())
    }
}

impl From<DispatchError> for Error {
    fn from(err: DispatchError) -> Self {
        Self::new(err.class().into(), err.origin().into(), err.to_string())
    }
}

impl From<TraverseError> for Error {
    fn from(err: TraverseError) -> Self {
        let kind = match &err {
            // at the public boundary a dangling name is a lookup miss;
            // integrity holes are caught at bootstrap validation
            TraverseError::MissingAspect { .. } | TraverseError::MissingClass { .. } => {
                ErrorKind::NotFound
            }
            TraverseError::CycleDetected { .. } => ErrorKind::Internal,
        };

        Self::new(kind, ErrorOrigin::Catalog, err.to_string())
    }
}

impl From<CatalogError> for Error {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Traverse(inner) => inner.into(),
            other => Self::new(ErrorKind::Internal, ErrorOrigin::Catalog, other.to_string()),
        }
    }
}
