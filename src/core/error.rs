use thiserror::Error;

use crate::reflect::ReflectError;
use crate::serializer::SerializeError;
use crate::store::StoreError;

pub type MergeResult<T> = std::result::Result<T, MergeError>;

/// Every way a merge call can fail. Failures are immediate and terminal for
/// the call; fields merged before the failing one stay applied.
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("target must be an object in order to merge data into it")]
    InvalidTarget,

    #[error("cannot merge an empty data set into an object")]
    EmptyData,

    #[error("data is an object but no serializer is configured")]
    UnsupportedDataObject,

    #[error("field '{0}' is declared as mergeable but is missing from the data")]
    MissingDataKey(String),

    #[error("could not find field '{field}' in class '{class}'")]
    UnmappedField { field: String, class: String },

    #[error("value for field '{field}' is not assignable on class '{class}': {reason}")]
    IncompatibleValue {
        field: String,
        class: String,
        reason: String,
    },

    #[error("class '{0}' is not registered, cannot construct a related instance")]
    UnknownClass(String),

    #[error("association '{field}' on class '{class}' has no target class")]
    MissingAssociationTarget { field: String, class: String },

    #[error("no {0} collaborator is configured")]
    MissingCollaborator(&'static str),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Serializer(#[from] SerializeError),
}

impl From<ReflectError> for MergeError {
    fn from(err: ReflectError) -> Self {
        match err {
            ReflectError::NoSuchProperty(property, class) => Self::UnmappedField {
                field: property,
                class,
            },
            ReflectError::TypeMismatch {
                property,
                class,
                reason,
            } => Self::IncompatibleValue {
                field: property,
                class,
                reason,
            },
        }
    }
}
