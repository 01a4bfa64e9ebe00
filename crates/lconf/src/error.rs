use std::io;
use std::path::PathBuf;

use thiserror::Error;

use lconf_parse::ParseError;
use lconf_value::AccessError;

/// Every failure a caller of [`crate::Config`] can see, as four distinct
/// reportable kinds.
///
/// `Io` and `Parse` abort document construction; `Key` and `Type` are
/// scoped to one accessor call and leave the tree intact.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("parse failure: {0}")]
    Parse(ParseError),
    #[error("key not found: {0}")]
    Key(String),
    #[error("type mismatch: {0}")]
    Type(AccessError),
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::Io { path, source } => Error::Io { path, source },
            other => Error::Parse(other),
        }
    }
}

impl From<AccessError> for Error {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::KeyNotFound { key } => Error::Key(key),
            other => Error::Type(other),
        }
    }
}
