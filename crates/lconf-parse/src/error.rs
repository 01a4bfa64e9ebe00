use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::trie::TrieDefineError;

/// A parse-time failure.
///
/// Structural violations abort the whole parse; there is no partial-tree
/// recovery. Variants carry a bounded excerpt of the source text around
/// the failure point where a cursor was available.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("expected '{expected}' near \"{context}\"")]
    Expected { expected: char, context: String },
    #[error("empty word near \"{context}\"")]
    EmptyWord { context: String },
    #[error("empty number near \"{context}\"")]
    EmptyNumber { context: String },
    #[error("malformed number '{text}' near \"{context}\"")]
    InvalidNumber { text: String, context: String },
    #[error("invalid boolean literal near \"{context}\"")]
    InvalidBoolean { context: String },
    #[error("invalid macro keyword near \"{context}\"")]
    InvalidMacro { context: String },
    #[error("unexpected '$' near \"{context}\"")]
    UnexpectedSubstitution { context: String },
    #[error("unknown substitution variable near \"{context}\"")]
    UnknownVariable { context: String },
    #[error("invalid macro name: {0}")]
    MacroName(#[from] TrieDefineError),
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl PartialEq for ParseError {
    fn eq(&self, other: &Self) -> bool {
        use ParseError::*;
        match (self, other) {
            (UnexpectedEof, UnexpectedEof) => true,
            (
                Expected {
                    expected: a,
                    context: b,
                },
                Expected {
                    expected: c,
                    context: d,
                },
            ) => a == c && b == d,
            (EmptyWord { context: a }, EmptyWord { context: b }) => a == b,
            (EmptyNumber { context: a }, EmptyNumber { context: b }) => a == b,
            (
                InvalidNumber {
                    text: a,
                    context: b,
                },
                InvalidNumber {
                    text: c,
                    context: d,
                },
            ) => a == c && b == d,
            (InvalidBoolean { context: a }, InvalidBoolean { context: b }) => a == b,
            (InvalidMacro { context: a }, InvalidMacro { context: b }) => a == b,
            (UnexpectedSubstitution { context: a }, UnexpectedSubstitution { context: b }) => {
                a == b
            }
            (UnknownVariable { context: a }, UnknownVariable { context: b }) => a == b,
            (MacroName(a), MacroName(b)) => a == b,
            // io::Error does not compare; Io variants compare by path.
            (Io { path: a, .. }, Io { path: b, .. }) => a == b,
            _ => false,
        }
    }
}
