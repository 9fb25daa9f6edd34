//! The two-tag token produced by the tokenizer.

use std::fmt;

/// Classification of a token. Checked once, at tokenization time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A maximal run of non-separator bytes; substitutable.
    Word,
    /// A single separator byte or a registered multi-byte separator; passed through.
    Separator,
}

/// An immutable slice of the input with its classification.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub bytes: &'a [u8],
}

impl<'a> Token<'a> {
    pub fn word(bytes: &'a [u8]) -> Self {
        Self {
            kind: TokenKind::Word,
            bytes,
        }
    }

    pub fn separator(bytes: &'a [u8]) -> Self {
        Self {
            kind: TokenKind::Separator,
            bytes,
        }
    }

    #[inline]
    pub fn is_word(&self) -> bool {
        self.kind == TokenKind::Word
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:?})", self.kind, String::from_utf8_lossy(self.bytes))
    }
}
