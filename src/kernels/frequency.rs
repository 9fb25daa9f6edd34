//! This module contains the word-frequency table consumed by the code allocator.
//!
//! Tables built from separate chunks or separate documents can be combined with
//! `merge`, which is associative and commutative, so counting may be split up
//! arbitrarily as long as allocation only starts once the final table exists.

use std::collections::HashMap;

use crate::types::Token;

/// Word -> occurrence count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: HashMap<Vec<u8>, u64>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts every word token in `tokens`. Separators are ignored.
    pub fn from_tokens(tokens: &[Token<'_>]) -> Self {
        let mut table = Self::new();
        table.record_tokens(tokens.iter().copied());
        table
    }

    /// Adds one occurrence of `word`.
    pub fn record(&mut self, word: &[u8]) {
        self.record_n(word, 1);
    }

    /// Adds `n` occurrences of `word`.
    pub fn record_n(&mut self, word: &[u8], n: u64) {
        // Avoid allocating a key for words we have already seen.
        if let Some(count) = self.counts.get_mut(word) {
            *count += n;
        } else {
            self.counts.insert(word.to_vec(), n);
        }
    }

    /// Counts the word tokens of any token stream.
    pub fn record_tokens<'a, I>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = Token<'a>>,
    {
        for token in tokens.into_iter().filter(|t| t.is_word()) {
            self.record(token.bytes);
        }
    }

    /// Folds `other` into `self`.
    pub fn merge(&mut self, other: &FrequencyTable) {
        for (word, &count) in &other.counts {
            self.record_n(word, count);
        }
    }

    pub fn get(&self, word: &[u8]) -> u64 {
        self.counts.get(word).copied().unwrap_or(0)
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Total number of word occurrences.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[u8], u64)> {
        self.counts.iter().map(|(w, &c)| (w.as_slice(), c))
    }

    /// Words in allocation order: descending frequency, then descending length,
    /// then ascending byte order.
    pub fn ranked(&self) -> Vec<(&[u8], u64)> {
        let mut ranked: Vec<_> = self.iter().collect();
        ranked.sort_by(|(wa, ca), (wb, cb)| {
            cb.cmp(ca)
                .then_with(|| wb.len().cmp(&wa.len()))
                .then_with(|| wa.cmp(wb))
        });
        ranked
    }
}

impl<'a> FromIterator<Token<'a>> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = Token<'a>>>(iter: I) -> Self {
        let mut table = Self::new();
        table.record_tokens(iter);
        table
    }
}

//==================================================================================
// Unit Tests
//==================================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::tokenize::tokenize;
    use crate::types::SeparatorTable;

    #[test]
    fn test_counts_words_only() {
        let table = SeparatorTable::v1();
        let tokens = tokenize(b"cat dog cat, dog! cat", &table);
        let freqs = FrequencyTable::from_tokens(&tokens);
        assert_eq!(freqs.len(), 2);
        assert_eq!(freqs.get(b"cat"), 3);
        assert_eq!(freqs.get(b"dog"), 2);
        assert_eq!(freqs.get(b" "), 0);
        assert_eq!(freqs.total(), 5);
    }

    #[test]
    fn test_ranking_tie_breaks() {
        let mut freqs = FrequencyTable::new();
        freqs.record_n(b"bb", 2);
        freqs.record_n(b"aa", 2);
        freqs.record_n(b"ccc", 2);
        freqs.record_n(b"z", 5);
        let order: Vec<&[u8]> = freqs.ranked().into_iter().map(|(w, _)| w).collect();
        let expected: Vec<&[u8]> = vec![b"z", b"ccc", b"aa", b"bb"];
        assert_eq!(order, expected);
    }

    #[test]
    fn test_merge_is_commutative_and_associative() {
        let table = SeparatorTable::v1();
        let a: FrequencyTable = tokenize(b"one two two", &table).into_iter().collect();
        let b: FrequencyTable = tokenize(b"two three", &table).into_iter().collect();
        let c: FrequencyTable = tokenize(b"three one one", &table).into_iter().collect();

        let mut ab_c = a.clone();
        ab_c.merge(&b);
        ab_c.merge(&c);

        let mut bc = b.clone();
        bc.merge(&c);
        let mut a_bc = a.clone();
        a_bc.merge(&bc);

        let mut c_b_a = c.clone();
        c_b_a.merge(&b);
        c_b_a.merge(&a);

        assert_eq!(ab_c, a_bc);
        assert_eq!(ab_c, c_b_a);
        assert_eq!(ab_c.get(b"one"), 3);
        assert_eq!(ab_c.get(b"two"), 3);
        assert_eq!(ab_c.get(b"three"), 2);
    }
}
