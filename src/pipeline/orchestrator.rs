// In: src/pipeline/orchestrator.rs

//! The in-memory pack/unpack orchestration.
//!
//! Packing is a two-phase process with a full barrier in between: the whole
//! input is tokenized and every word counted before the allocator assigns a
//! single code, because code lengths depend on the complete vocabulary.

use std::time::Instant;

use serde::Serialize;

use crate::config::DtcConfig;
use crate::dictionary::Dictionary;
use crate::error::DtcError;
use crate::kernels::{decode, encode_into, tokenize, CodeAllocator, FrequencyTable};
use crate::types::SeparatorTable;

//==================================================================================
// 1. Public Structs
//==================================================================================

/// Summary of one pack operation.
///
/// From the pipeline, sizes are those of the bytes the codec core saw. The
/// bridge replaces them with the raw input size and the framed output size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackStats {
    pub input_bytes: usize,
    pub encoded_bytes: usize,
    /// Number of word tokens in the input.
    pub total_words: u64,
    pub distinct_words: usize,
    /// Entries in the emitted dictionary (more than `distinct_words` when a
    /// shared library was extended).
    pub dictionary_entries: usize,
    pub max_code_len: usize,
    /// Word tokens written verbatim because the dictionary lacked them.
    pub escaped_words: usize,
}

impl PackStats {
    /// Encoded size as a fraction of the input size.
    pub fn ratio(&self) -> f64 {
        if self.input_bytes == 0 {
            return 1.0;
        }
        self.encoded_bytes as f64 / self.input_bytes as f64
    }
}

/// Everything a pack operation produces.
#[derive(Debug, Clone)]
pub struct PackOutput {
    pub encoded: Vec<u8>,
    pub dictionary: Dictionary,
    pub stats: PackStats,
}

//==================================================================================
// 2. Public Orchestration API
//==================================================================================

/// Packs `input` with a dictionary built fresh from its own vocabulary.
pub fn pack(
    input: &[u8],
    table: &SeparatorTable,
    config: &DtcConfig,
) -> Result<PackOutput, DtcError> {
    pack_inner(input, table, config, None)
}

/// Packs `input` reusing every code of a shared `library`; only words the
/// library lacks receive new codes.
pub fn pack_with_library(
    input: &[u8],
    table: &SeparatorTable,
    config: &DtcConfig,
    library: &Dictionary,
) -> Result<PackOutput, DtcError> {
    library.validate_codes(table)?;
    pack_inner(input, table, config, Some(library))
}

/// Restores the original bytes from an encoded stream.
pub fn unpack(encoded: &[u8], dictionary: &Dictionary) -> Vec<u8> {
    let start = Instant::now();
    let decoded = decode(encoded, dictionary);
    log::info!(
        "Unpacked {} bytes into {} bytes with {} dictionary entries in {:.2?}",
        encoded.len(),
        decoded.len(),
        dictionary.len(),
        start.elapsed()
    );
    decoded
}

/// Builds one shared dictionary for a whole corpus. Each document is counted
/// separately and the tables are merged before allocation.
pub fn build_library<'a, I>(
    documents: I,
    table: &SeparatorTable,
    config: &DtcConfig,
) -> Result<Dictionary, DtcError>
where
    I: IntoIterator<Item = &'a [u8]>,
{
    let mut merged = FrequencyTable::new();
    let mut documents_seen = 0usize;
    for document in documents {
        let tokens = tokenize(document, table);
        merged.merge(&FrequencyTable::from_tokens(&tokens));
        documents_seen += 1;
    }

    let dictionary = CodeAllocator::new(table, config.max_code_len)?.allocate(&merged)?;
    log::info!(
        "Built library of {} words from {} document(s)",
        dictionary.len(),
        documents_seen
    );
    Ok(dictionary)
}

//==================================================================================
// 3. Private Helpers
//==================================================================================

fn pack_inner(
    input: &[u8],
    table: &SeparatorTable,
    config: &DtcConfig,
    library: Option<&Dictionary>,
) -> Result<PackOutput, DtcError> {
    let start = Instant::now();

    // Pass 1: tokenize and count everything.
    let tokens = tokenize(input, table);
    let frequencies = FrequencyTable::from_tokens(&tokens);

    // Barrier: the allocator needs the complete table.
    let allocator = CodeAllocator::new(table, config.max_code_len)?;
    let dictionary = match library {
        Some(library) => allocator.extend(library, &frequencies)?,
        None => allocator.allocate(&frequencies)?,
    };

    // Pass 2: substitute.
    let mut encoded = Vec::with_capacity(input.len());
    let escaped_words = encode_into(&tokens, &dictionary, &mut encoded);

    let stats = PackStats {
        input_bytes: input.len(),
        encoded_bytes: encoded.len(),
        total_words: frequencies.total(),
        distinct_words: frequencies.len(),
        dictionary_entries: dictionary.len(),
        max_code_len: dictionary.max_code_len(),
        escaped_words,
    };

    log::info!(
        "Packed {} bytes into {} bytes ({:.1}%): {} words, {} distinct, \
         codes up to {} byte(s), in {:.2?}",
        stats.input_bytes,
        stats.encoded_bytes,
        stats.ratio() * 100.0,
        stats.total_words,
        stats.distinct_words,
        stats.max_code_len,
        start.elapsed()
    );
    log_metric!(
        "event" = "pack",
        "tokens" = tokens.len(),
        "distinct_words" = stats.distinct_words,
        "encoded_bytes" = stats.encoded_bytes
    );

    Ok(PackOutput {
        encoded,
        dictionary,
        stats,
    })
}
