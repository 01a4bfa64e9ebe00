//! Parsing and resolution engine for the lconf configuration language.
//!
//! The parser is a single-pass recursive descent over a character cursor;
//! scanning is interleaved with parsing, there is no separate token
//! stream. Macro and keyword dispatch goes through a case-insensitive
//! prefix trie which is also the symbol table for `$NAME` substitution.

/// Movable character cursor over one file buffer.
pub mod cursor;

/// Parse-time error type.
pub mod error;

/// Recursive-descent parser, macro directives, and file includes.
pub mod parse;

/// Lexical scanning primitives.
pub mod scan;

/// Case-insensitive prefix-lookup trie.
pub mod trie;

pub use cursor::Cursor;
pub use error::ParseError;
pub use parse::{MacroTable, parse_file, parse_str};
pub use trie::{ParseTrie, TrieDefineError, TrieLookupError, TrieValue};
