/// Sentinel returned when peeking past either end of the buffer.
pub const NUL: char = '\0';

/// Number of characters shown on each side of a failure point in
/// diagnostic excerpts.
pub(crate) const CONTEXT_WINDOW: usize = 12;

/// An explicit position index over a character buffer.
///
/// The scanner and parser share one cursor per file buffer and move it
/// forwards one character at a time; trie lookup additionally moves it
/// backwards during backtracking. Peeking outside the buffer yields the
/// NUL sentinel, which doubles as the end-of-input terminator.
#[derive(Debug, Clone)]
pub struct Cursor {
    chars: Vec<char>,
    pos: usize,
}

impl Cursor {
    pub fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
        }
    }

    /// The character under the cursor, or [`NUL`] at end of input.
    pub fn peek(&self) -> char {
        self.chars.get(self.pos).copied().unwrap_or(NUL)
    }

    /// The character `offset` positions ahead of the cursor.
    pub fn peek_at(&self, offset: usize) -> char {
        self.chars.get(self.pos + offset).copied().unwrap_or(NUL)
    }

    /// The character immediately behind the cursor.
    pub fn prev(&self) -> char {
        if self.pos == 0 {
            NUL
        } else {
            self.chars[self.pos - 1]
        }
    }

    pub fn bump(&mut self) {
        self.pos += 1;
    }

    /// Move back one character. This is the backtrack step of trie
    /// lookup and must stay an exact index decrement.
    pub fn back(&mut self) {
        self.pos = self.pos.saturating_sub(1);
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    /// A bounded excerpt around the cursor for error messages.
    pub fn window(&self, left: usize, right: usize) -> String {
        let start = self.pos.saturating_sub(left);
        let end = (self.pos + right).min(self.chars.len());
        self.chars[start..end].iter().collect()
    }

    /// The default-width diagnostic excerpt.
    pub fn context(&self) -> String {
        self.window(CONTEXT_WINDOW, CONTEXT_WINDOW)
    }
}
