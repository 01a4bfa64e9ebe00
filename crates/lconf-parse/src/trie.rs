use std::collections::BTreeMap;

use thiserror::Error;

use crate::cursor::Cursor;

/// A character acceptable inside a trie key or identifier word.
pub fn acceptable_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no registered entry matched")]
pub struct TrieLookupError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid character {0:?} in trie key")]
pub struct TrieDefineError(pub char);

/// A stored value whose "present" state marks its node as terminal.
///
/// A node is terminal iff its value satisfies the type's non-emptiness
/// rule: non-empty for strings, `Some` for options.
pub trait TrieValue: Default {
    fn is_present(&self) -> bool;
}

impl TrieValue for String {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

impl<T> TrieValue for Option<T> {
    fn is_present(&self) -> bool {
        self.is_some()
    }
}

/// A non-compact prefix trie keyed by case-insensitive characters.
///
/// One node per key position; children are exclusively owned by their
/// parent. Built only through [`ParseTrie::define`], read-only during
/// lookup. Access is O(len(key)); this is explicitly a
/// simplicity-over-performance structure.
#[derive(Debug, Default)]
pub struct ParseTrie<T> {
    value: T,
    children: BTreeMap<char, Box<ParseTrie<T>>>,
}

fn index_char(c: char) -> char {
    c.to_ascii_uppercase()
}

impl<T: TrieValue> ParseTrie<T> {
    /// Insert `key`, creating path nodes as needed, and hand back the
    /// slot for its value. Re-defining a key overwrites: last write wins.
    ///
    /// Keys differing only in case collide by design.
    pub fn define(&mut self, key: &str) -> Result<&mut T, TrieDefineError> {
        let mut node = self;
        for c in key.chars() {
            if !acceptable_char(c) {
                return Err(TrieDefineError(c));
            }
            node = node.children.entry(index_char(c)).or_default().as_mut();
        }
        Ok(&mut node.value)
    }

    /// Walk the trie along the cursor, consuming matched characters.
    ///
    /// A `{` in the input is skipped without consuming a trie edge (the
    /// `${NAME}` form); NUL, whitespace and `}` terminate the walk and the
    /// current node's terminal status decides success. On a child-edge
    /// miss the current node decides without consuming further input. A
    /// failed deeper walk backtracks the cursor one character per unwound
    /// level, leaving the caller positioned to continue scanning. Keep
    /// this backtrack discipline exactly: configuration files depend on
    /// the cursor position left behind after a failed lookup.
    pub fn lookup(&self, cur: &mut Cursor) -> Result<T, TrieLookupError>
    where
        T: Clone,
    {
        let (found, value) = self.lookup_inner(cur);
        if found { Ok(value.clone()) } else { Err(TrieLookupError) }
    }

    fn lookup_inner<'a>(&'a self, cur: &mut Cursor) -> (bool, &'a T) {
        match cur.peek() {
            '{' => {
                cur.bump();
                self.lookup_inner(cur)
            }
            '\0' | ' ' | '\t' | '\n' | '\r' | '}' => (self.value.is_present(), &self.value),
            c => {
                let Some(child) = self.children.get(&index_char(c)) else {
                    return (self.value.is_present(), &self.value);
                };
                cur.bump();
                let (found, value) = child.lookup_inner(cur);
                if found {
                    (true, value)
                } else {
                    cur.back();
                    (self.value.is_present(), &self.value)
                }
            }
        }
    }
}
