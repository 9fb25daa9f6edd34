//! This module contains the tokenizer kernel: a total, lossless partition of a
//! byte sequence into word and separator tokens.
//!
//! A word is a maximal run of bytes outside the separator set. A separator is
//! either a registered multi-byte pattern (checked first, longest first) or a
//! single separator byte. Concatenating the bytes of all tokens in order always
//! reproduces the input exactly.

use crate::types::{SeparatorTable, Token};

/// A lazy iterator over the tokens of a byte slice.
pub struct Tokens<'a, 't> {
    input: &'a [u8],
    pos: usize,
    table: &'t SeparatorTable,
}

impl<'a, 't> Tokens<'a, 't> {
    pub fn new(input: &'a [u8], table: &'t SeparatorTable) -> Self {
        Self {
            input,
            pos: 0,
            table,
        }
    }
}

impl<'a> Iterator for Tokens<'a, '_> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.input.get(self.pos..).filter(|r| !r.is_empty())?;

        if self.table.is_separator(rest[0]) {
            let len = self
                .table
                .patterns()
                .iter()
                .find(|p| rest.starts_with(p.as_slice()))
                .map_or(1, |p| p.len());
            self.pos += len;
            return Some(Token::separator(&rest[..len]));
        }

        let len = rest
            .iter()
            .position(|&b| self.table.is_separator(b))
            .unwrap_or(rest.len());
        self.pos += len;
        Some(Token::word(&rest[..len]))
    }
}

/// Splits `input` into an ordered sequence of tokens. Never fails.
pub fn tokenize<'a>(input: &'a [u8], table: &SeparatorTable) -> Vec<Token<'a>> {
    Tokens::new(input, table).collect()
}

/// Returns the length of the longest prefix of `buf` that ends on a separator
/// byte, or `None` if `buf` holds no separator at all.
///
/// Used by the streaming kernels: everything up to this boundary can be
/// processed now, the tail may be the start of a word continued in the next
/// read and must be carried over.
pub fn segment_boundary(buf: &[u8], table: &SeparatorTable) -> Option<usize> {
    buf.iter()
        .rposition(|&b| table.is_separator(b))
        .map(|idx| idx + 1)
}
