use std::sync::LazyLock;

use lconf_value::Scalar;

use crate::cursor::{Cursor, NUL};
use crate::error::ParseError;
use crate::parse::MacroTable;
use crate::trie::{ParseTrie, TrieLookupError, acceptable_char};

static BOOLEANS: LazyLock<ParseTrie<Option<bool>>> = LazyLock::new(|| {
    let mut trie = ParseTrie::default();
    *trie.define("TRUE").unwrap() = Some(true);
    *trie.define("FALSE").unwrap() = Some(false);
    trie
});

/// Consume whitespace, `/* ... */` block comments and `// ...` line
/// comments. A `/` preceded by `*` closes a block comment, so the
/// opener's `*` can double as the closer and `/*/` is complete. No
/// nesting.
///
/// Returns `Ok(false)` at end of input when the caller did not require
/// more; with `required` set, end of input is an error instead.
pub fn skip_whitespace(cur: &mut Cursor, required: bool) -> Result<bool, ParseError> {
    loop {
        match cur.peek() {
            NUL => {
                return if required {
                    Err(ParseError::UnexpectedEof)
                } else {
                    Ok(false)
                };
            }
            c if c.is_whitespace() => cur.bump(),
            '/' => match cur.peek_at(1) {
                '*' => {
                    cur.bump();
                    cur.bump();
                    loop {
                        match cur.peek() {
                            NUL => {
                                return if required {
                                    Err(ParseError::UnexpectedEof)
                                } else {
                                    Ok(false)
                                };
                            }
                            '/' if cur.prev() == '*' => {
                                cur.bump();
                                break;
                            }
                            _ => cur.bump(),
                        }
                    }
                }
                '/' => {
                    while !matches!(cur.peek(), '\n' | NUL) {
                        cur.bump();
                    }
                }
                // A lone '/' is content, not a comment.
                _ => return Ok(true),
            },
            _ => return Ok(true),
        }
    }
}

/// Scan one identifier word of `[A-Za-z0-9_]` characters.
pub fn scan_word(cur: &mut Cursor) -> Result<String, ParseError> {
    let mut word = String::new();
    loop {
        let c = cur.peek();
        if c == NUL {
            return Err(ParseError::UnexpectedEof);
        }
        if !acceptable_char(c) {
            break;
        }
        word.push(c);
        cur.bump();
    }
    if word.is_empty() {
        return Err(ParseError::EmptyWord {
            context: cur.context(),
        });
    }
    Ok(word)
}

/// Resolve a `$NAME` / `${NAME}` reference at the cursor and append the
/// registered text to `data`.
pub(crate) fn append_substitution(
    data: &mut String,
    cur: &mut Cursor,
    regs: &MacroTable,
) -> Result<(), TrieLookupError> {
    debug_assert_eq!(cur.peek(), '$');
    let bracketed = cur.peek_at(1) == '{';
    cur.bump();
    data.push_str(&regs.lookup(cur)?);
    if bracketed {
        // lookup stops on the closing '}'
        cur.bump();
    }
    Ok(())
}

/// Scan a numeric literal: optional `-`, digits, `.`.
///
/// `$NAME` references splice their raw registered text into the literal
/// before it is classified: no `.` in the final text means integral,
/// otherwise floating. An unresolvable reference is fatal here.
pub fn scan_number(cur: &mut Cursor, regs: &MacroTable) -> Result<Scalar, ParseError> {
    skip_whitespace(cur, true)?;
    let mut data = String::new();
    loop {
        match cur.peek() {
            '$' => {
                if append_substitution(&mut data, cur, regs).is_err() {
                    return Err(ParseError::UnknownVariable {
                        context: cur.context(),
                    });
                }
            }
            c @ ('-' | '.' | '0'..='9') => {
                data.push(c);
                cur.bump();
            }
            // NUL included: end of input terminates a complete literal.
            _ => break,
        }
    }
    if data.is_empty() {
        return Err(ParseError::EmptyNumber {
            context: cur.context(),
        });
    }
    if data.contains('.') {
        match data.parse::<f64>() {
            Ok(value) => Ok(Scalar::Float(value)),
            Err(_) => Err(ParseError::InvalidNumber {
                text: data,
                context: cur.context(),
            }),
        }
    } else {
        match data.parse::<i64>() {
            Ok(value) => Ok(Scalar::Integer(value)),
            Err(_) => Err(ParseError::InvalidNumber {
                text: data,
                context: cur.context(),
            }),
        }
    }
}

/// Scan a single- or double-quoted string.
///
/// A quote character with a preceding backslash is taken literally only
/// while inside the other quote style. `$` substitution is allowed only
/// inside double quotes; an unresolvable reference there is logged and
/// dropped rather than aborting the string. Inside single quotes, or
/// outside any quote, `$` is fatal.
pub fn scan_string(cur: &mut Cursor, regs: &MacroTable) -> Result<String, ParseError> {
    skip_whitespace(cur, false)?;
    let mut value = String::new();
    let mut squote = false;
    let mut dquote = false;
    loop {
        match cur.peek() {
            NUL => return Err(ParseError::UnexpectedEof),
            '\'' if cur.prev() != '\\' || !dquote => {
                if squote {
                    break;
                }
                squote = !squote;
                cur.bump();
            }
            '"' if cur.prev() != '\\' || !squote => {
                if dquote {
                    break;
                }
                dquote = !dquote;
                cur.bump();
            }
            '$' => {
                if !dquote || squote {
                    return Err(ParseError::UnexpectedSubstitution {
                        context: cur.context(),
                    });
                }
                if let Err(err) = append_substitution(&mut value, cur, regs) {
                    tracing::debug!(context = %cur.context(), "dropping unresolved substitution: {err}");
                }
            }
            c => {
                value.push(c);
                cur.bump();
            }
        }
    }
    // closing quote
    cur.bump();
    Ok(value)
}

/// Scan a case-insensitive `TRUE` / `FALSE` literal.
pub fn scan_boolean(cur: &mut Cursor) -> Result<bool, ParseError> {
    match BOOLEANS.lookup(cur) {
        Ok(Some(value)) => Ok(value),
        _ => Err(ParseError::InvalidBoolean {
            context: cur.context(),
        }),
    }
}
