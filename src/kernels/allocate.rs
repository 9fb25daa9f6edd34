//! This module contains the code allocator: it turns a complete word-frequency
//! table into a `Dictionary` of minimal-length codes.
//!
//! ### Algorithm
//! 1.  Rank distinct words by descending frequency, then descending length, then
//!     ascending byte order (the last key only makes the result deterministic).
//! 2.  Enumerate candidate codes shortest-first over the code alphabet (every
//!     byte `0x01..=0xFF` outside the separator table), lexicographically within
//!     each length.
//! 3.  Hand candidates out in rank order, skipping reserved codes.
//!
//! If the vocabulary does not fit into the code space bounded by
//! `max_code_len`, allocation fails with `CapacityExceeded` before a single
//! code is assigned.

use std::collections::HashSet;

use crate::dictionary::Dictionary;
use crate::error::DtcError;
use crate::kernels::frequency::FrequencyTable;
use crate::types::SeparatorTable;

/// Default upper bound on code length (a 32-bit code).
pub const DEFAULT_MAX_CODE_LEN: usize = 4;
/// Hard upper bound accepted by the allocator.
pub const MAX_SUPPORTED_CODE_LEN: usize = 8;

//==================================================================================
// 1. Code Enumeration
//==================================================================================

/// Enumerates every code over `alphabet` in shortest-first, lexicographic order,
/// up to and including `max_len` bytes.
#[derive(Debug, Clone)]
pub struct CodeSpace<'a> {
    alphabet: &'a [u8],
    max_len: usize,
    /// Odometer of alphabet indices for the next code.
    digits: Vec<usize>,
    exhausted: bool,
}

impl<'a> CodeSpace<'a> {
    /// `alphabet` must be sorted ascending for the order to be lexicographic.
    pub fn new(alphabet: &'a [u8], max_len: usize) -> Self {
        Self {
            alphabet,
            max_len,
            digits: vec![0],
            exhausted: alphabet.is_empty() || max_len == 0,
        }
    }

    fn advance(&mut self) {
        for digit in self.digits.iter_mut().rev() {
            *digit += 1;
            if *digit < self.alphabet.len() {
                return;
            }
            *digit = 0;
        }
        // Every code of the current length has been produced.
        let next_len = self.digits.len() + 1;
        if next_len > self.max_len {
            self.exhausted = true;
        } else {
            self.digits = vec![0; next_len];
        }
    }
}

impl Iterator for CodeSpace<'_> {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let code = self.digits.iter().map(|&d| self.alphabet[d]).collect();
        self.advance();
        Some(code)
    }
}

/// Number of codes of length `1..=max_len` over an alphabet of `alphabet_len`
/// symbols. Saturates instead of overflowing.
pub fn code_space_capacity(alphabet_len: usize, max_len: usize) -> u128 {
    let mut total: u128 = 0;
    let mut per_len: u128 = 1;
    for _ in 0..max_len {
        per_len = per_len.saturating_mul(alphabet_len as u128);
        total = total.saturating_add(per_len);
    }
    total
}

//==================================================================================
// 2. The Allocator
//==================================================================================

/// Assigns codes to words. Holds the alphabet derived from a separator table,
/// the length bound, and any codes that must not be handed out again.
#[derive(Debug, Clone)]
pub struct CodeAllocator {
    alphabet: Vec<u8>,
    max_code_len: usize,
    reserved: HashSet<Vec<u8>>,
}

impl CodeAllocator {
    pub fn new(table: &SeparatorTable, max_code_len: usize) -> Result<Self, DtcError> {
        if !(1..=MAX_SUPPORTED_CODE_LEN).contains(&max_code_len) {
            return Err(DtcError::InvalidConfig(format!(
                "max_code_len must be between 1 and {}, got {}",
                MAX_SUPPORTED_CODE_LEN, max_code_len
            )));
        }
        Ok(Self {
            alphabet: table.alphabet(),
            max_code_len,
            reserved: HashSet::new(),
        })
    }

    /// Marks codes as already in use; enumeration skips them.
    pub fn with_reserved<I>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = Vec<u8>>,
    {
        self.reserved.extend(codes);
        self
    }

    pub fn max_code_len(&self) -> usize {
        self.max_code_len
    }

    /// Size of the whole code space.
    pub fn capacity(&self) -> u128 {
        code_space_capacity(self.alphabet.len(), self.max_code_len)
    }

    /// Codes still free once the reserved ones inside the space are removed.
    pub fn available(&self) -> u128 {
        let taken = self.reserved.iter().filter(|c| self.in_space(c)).count() as u128;
        self.capacity().saturating_sub(taken)
    }

    fn in_space(&self, code: &[u8]) -> bool {
        !code.is_empty()
            && code.len() <= self.max_code_len
            && code.iter().all(|b| self.alphabet.binary_search(b).is_ok())
    }

    /// Builds a fresh dictionary for the complete frequency table.
    pub fn allocate(&self, frequencies: &FrequencyTable) -> Result<Dictionary, DtcError> {
        let mut dictionary = Dictionary::new();
        self.assign_into(&mut dictionary, frequencies.ranked())?;
        Ok(dictionary)
    }

    /// Builds a dictionary that keeps every entry of `library` untouched and
    /// gives fresh codes only to the words `library` does not know yet.
    pub fn extend(
        &self,
        library: &Dictionary,
        frequencies: &FrequencyTable,
    ) -> Result<Dictionary, DtcError> {
        let fresh: Vec<_> = frequencies
            .ranked()
            .into_iter()
            .filter(|(word, _)| !library.contains_word(word))
            .collect();

        let allocator = self
            .clone()
            .with_reserved(library.iter().map(|e| e.code.clone()));

        let mut dictionary = library.clone();
        allocator.assign_into(&mut dictionary, fresh)?;

        log::debug!(
            "Extended library of {} entries to {} entries",
            library.len(),
            dictionary.len()
        );
        Ok(dictionary)
    }

    fn assign_into(
        &self,
        dictionary: &mut Dictionary,
        ranked: Vec<(&[u8], u64)>,
    ) -> Result<(), DtcError> {
        let available = self.available();
        let capacity_error = || DtcError::CapacityExceeded {
            distinct_words: ranked.len(),
            capacity: available,
            max_code_len: self.max_code_len,
        };

        // Fail before assigning anything: a partial map would be silently wrong.
        if ranked.len() as u128 > available {
            return Err(capacity_error());
        }

        let mut codes = CodeSpace::new(&self.alphabet, self.max_code_len)
            .filter(|code| !self.reserved.contains(code));

        for (word, _) in &ranked {
            let code = codes.next().ok_or_else(capacity_error)?;
            dictionary.insert(word.to_vec(), code)?;
        }

        log_metric!(
            "event" = "allocate",
            "words" = ranked.len(),
            "max_code_len" = dictionary.max_code_len(),
            "reserved" = self.reserved.len()
        );
        Ok(())
    }
}

/// Allocates a fresh dictionary for `frequencies` under `table`.
pub fn allocate(
    frequencies: &FrequencyTable,
    table: &SeparatorTable,
    max_code_len: usize,
) -> Result<Dictionary, DtcError> {
    CodeAllocator::new(table, max_code_len)?.allocate(frequencies)
}
