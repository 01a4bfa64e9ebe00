use thiserror::Error;

use crate::value::Kind;

/// Failure of a typed access into a parsed tree.
///
/// Accessor failures are scoped to the caller's request: the tree itself
/// stays valid and further lookups are fine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AccessError {
    #[error("key not found: {key}")]
    KeyNotFound { key: String },
    #[error("type mismatch for {key}: expected {expected}, found {found}")]
    TypeMismatch {
        key: String,
        expected: Kind,
        found: Kind,
    },
    #[error("value of {key} is out of range for the requested integer type")]
    OutOfRange { key: String },
}

impl AccessError {
    pub(crate) fn mismatch(key: &str, expected: Kind, found: Kind) -> Self {
        AccessError::TypeMismatch {
            key: key.to_string(),
            expected,
            found,
        }
    }
}
