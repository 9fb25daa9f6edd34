//! The code <-> word bijection shared by the encoder and the decoder, and its
//! two on-disk representations.
//!
//! ### Formats
//! * [`binary`]: the canonical length-prefixed record format.
//! * [`text`]: a human-debuggable `<code-as-hex> <word>\n` variant.
//!
//! Both formats write entries in insertion order, which for an allocated
//! dictionary is the allocation order (most valuable word first).

use std::collections::HashMap;

use crate::error::DtcError;
use crate::types::SeparatorTable;

pub mod binary;
pub mod text;

/// A single word/code pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub word: Vec<u8>,
    pub code: Vec<u8>,
}

/// A bijective mapping between words and codes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dictionary {
    entries: Vec<Entry>,
    by_word: HashMap<Vec<u8>, usize>,
    by_code: HashMap<Vec<u8>, usize>,
    max_code_len: usize,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a dictionary from `(word, code)` pairs, rejecting duplicates.
    pub fn from_entries<I>(pairs: I) -> Result<Self, DtcError>
    where
        I: IntoIterator<Item = (Vec<u8>, Vec<u8>)>,
    {
        let mut dict = Self::new();
        for (word, code) in pairs {
            dict.insert(word, code)?;
        }
        Ok(dict)
    }

    /// Adds a pair. Fails if either side is empty or already present, which
    /// would break the bijection.
    pub fn insert(&mut self, word: Vec<u8>, code: Vec<u8>) -> Result<(), DtcError> {
        if word.is_empty() {
            return Err(DtcError::MalformedDictionary("Empty word".into()));
        }
        if code.is_empty() {
            return Err(DtcError::MalformedDictionary(format!(
                "Empty code for word {:?}",
                String::from_utf8_lossy(&word)
            )));
        }
        if self.by_word.contains_key(&word) {
            return Err(DtcError::DictionaryConflict(format!(
                "Word {:?} is already mapped",
                String::from_utf8_lossy(&word)
            )));
        }
        if self.by_code.contains_key(&code) {
            return Err(DtcError::DictionaryConflict(format!(
                "Code {} is already assigned",
                to_hex(&code)
            )));
        }

        let idx = self.entries.len();
        self.max_code_len = self.max_code_len.max(code.len());
        self.by_word.insert(word.clone(), idx);
        self.by_code.insert(code.clone(), idx);
        self.entries.push(Entry { word, code });
        Ok(())
    }

    #[inline]
    pub fn code_for(&self, word: &[u8]) -> Option<&[u8]> {
        self.by_word
            .get(word)
            .map(|&idx| self.entries[idx].code.as_slice())
    }

    #[inline]
    pub fn word_for(&self, code: &[u8]) -> Option<&[u8]> {
        self.by_code
            .get(code)
            .map(|&idx| self.entries[idx].word.as_slice())
    }

    pub fn contains_word(&self, word: &[u8]) -> bool {
        self.by_word.contains_key(word)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Length of the longest code; the decoder's match window.
    pub fn max_code_len(&self) -> usize {
        self.max_code_len
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    /// Checks that every code is usable under `table`: no code may contain a
    /// separator byte or NUL, or the decoder could not find code boundaries.
    pub fn validate_codes(&self, table: &SeparatorTable) -> Result<(), DtcError> {
        match self.entries.iter().position(|e| !table.is_valid_code(&e.code)) {
            None => Ok(()),
            Some(idx) => Err(DtcError::MalformedDictionary(format!(
                "Entry {} has code {} containing a separator byte",
                idx,
                to_hex(&self.entries[idx].code)
            ))),
        }
    }
}

impl<'a> IntoIterator for &'a Dictionary {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lowercase hex rendering of a code, as used in the text format and messages.
pub fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
