//! Chunked, two-pass processing over `Read`/`Write` for inputs too large to
//! hold twice in memory.
//!
//! Pass 1 (`count_frequencies`) builds the frequency table; the caller then
//! allocates the dictionary; pass 2 (`encode_stream`) re-reads the input and
//! emits codes. Every kernel works on *segments*: buffered data cut right
//! after its last separator byte. The uncut tail is carried into the next read,
//! so a word is never split, and because no code contains a separator byte a
//! decoder match never spans a segment boundary either. Output is therefore
//! byte-identical to the in-memory kernels.

use std::io::{ErrorKind, Read, Write};

use crate::dictionary::Dictionary;
use crate::error::DtcError;
use crate::kernels::tokenize::segment_boundary;
use crate::kernels::{decode_into, encode_into, tokenize, FrequencyTable, Tokens};
use crate::types::SeparatorTable;

/// Byte counts of one streaming pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamSummary {
    pub bytes_read: u64,
    pub bytes_written: u64,
    pub escaped_words: usize,
}

/// Pass 1: counts the words of `reader`.
pub fn count_frequencies<R: Read>(
    reader: R,
    table: &SeparatorTable,
    chunk_size: usize,
) -> Result<FrequencyTable, DtcError> {
    let mut frequencies = FrequencyTable::new();
    let bytes_read = for_each_segment(reader, table, chunk_size, |segment| {
        frequencies.record_tokens(Tokens::new(segment, table));
        Ok(())
    })?;
    log::debug!(
        "Counted {} distinct words in {} bytes",
        frequencies.len(),
        bytes_read
    );
    Ok(frequencies)
}

/// Pass 2: encodes `reader` into `writer` with a complete dictionary.
pub fn encode_stream<R: Read, W: Write>(
    reader: R,
    mut writer: W,
    table: &SeparatorTable,
    dictionary: &Dictionary,
    chunk_size: usize,
) -> Result<StreamSummary, DtcError> {
    let mut summary = StreamSummary::default();
    let mut output_buf = Vec::with_capacity(chunk_size);

    summary.bytes_read = for_each_segment(reader, table, chunk_size, |segment| {
        output_buf.clear();
        let tokens = tokenize(segment, table);
        summary.escaped_words += encode_into(&tokens, dictionary, &mut output_buf);
        writer.write_all(&output_buf)?;
        summary.bytes_written += output_buf.len() as u64;
        Ok(())
    })?;
    writer.flush()?;
    Ok(summary)
}

/// Decodes `reader` into `writer`.
pub fn decode_stream<R: Read, W: Write>(
    reader: R,
    mut writer: W,
    table: &SeparatorTable,
    dictionary: &Dictionary,
    chunk_size: usize,
) -> Result<StreamSummary, DtcError> {
    let mut summary = StreamSummary::default();
    let mut output_buf = Vec::with_capacity(chunk_size * 2);

    summary.bytes_read = for_each_segment(reader, table, chunk_size, |segment| {
        output_buf.clear();
        decode_into(segment, dictionary, &mut output_buf);
        writer.write_all(&output_buf)?;
        summary.bytes_written += output_buf.len() as u64;
        Ok(())
    })?;
    writer.flush()?;
    Ok(summary)
}

/// Reads `reader` in `chunk_size` pieces and hands `process` every complete
/// segment, then the final tail. Returns the number of bytes read.
fn for_each_segment<R, F>(
    mut reader: R,
    table: &SeparatorTable,
    chunk_size: usize,
    mut process: F,
) -> Result<u64, DtcError>
where
    R: Read,
    F: FnMut(&[u8]) -> Result<(), DtcError>,
{
    let mut chunk = vec![0u8; chunk_size.max(1)];
    // Never contains a separator byte between calls to `process`.
    let mut carry: Vec<u8> = Vec::new();
    let mut bytes_read = 0u64;

    loop {
        let n = match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        bytes_read += n as u64;

        let carried = carry.len();
        carry.extend_from_slice(&chunk[..n]);
        // The carried tail has no separator, so only the new bytes need a search.
        if let Some(end) = segment_boundary(&carry[carried..], table) {
            let end = carried + end;
            process(&carry[..end])?;
            carry.drain(..end);
        }
    }

    if !carry.is_empty() {
        process(&carry)?;
    }
    Ok(bytes_read)
}

//==================================================================================
// Unit Tests
//==================================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::{allocate, decode, encode};
    use std::io::Cursor;

    const TEXT: &str = "the quick brown fox jumps over the lazy dog,\r\n\
                        the dog sleeps;\u{a0}the fox runs.\r\n\
                        supercalifragilisticexpialidocious words stay whole";

    #[test]
    fn test_counting_matches_in_memory_for_any_chunk_size() {
        let table = SeparatorTable::v1();
        let expected = FrequencyTable::from_tokens(&tokenize(TEXT.as_bytes(), &table));
        for chunk_size in [1, 2, 3, 7, 16, 64, 4096] {
            let counted = count_frequencies(Cursor::new(TEXT), &table, chunk_size).unwrap();
            assert_eq!(counted, expected, "chunk_size = {}", chunk_size);
        }
    }

    #[test]
    fn test_stream_encode_decode_matches_in_memory() {
        let table = SeparatorTable::v1();
        let tokens = tokenize(TEXT.as_bytes(), &table);
        let dictionary = allocate(&FrequencyTable::from_tokens(&tokens), &table, 4).unwrap();
        let expected = encode(&tokens, &dictionary);

        for chunk_size in [1, 5, 13, 1024] {
            let mut encoded: Vec<u8> = Vec::new();
            let summary =
                encode_stream(Cursor::new(TEXT), &mut encoded, &table, &dictionary, chunk_size)
                    .unwrap();
            assert_eq!(encoded, expected, "chunk_size = {}", chunk_size);
            assert_eq!(summary.bytes_read, TEXT.len() as u64);
            assert_eq!(summary.bytes_written, expected.len() as u64);
            assert_eq!(summary.escaped_words, 0);

            let mut decoded: Vec<u8> = Vec::new();
            decode_stream(Cursor::new(&encoded), &mut decoded, &table, &dictionary, chunk_size)
                .unwrap();
            assert_eq!(decoded, TEXT.as_bytes());
            assert_eq!(decoded, decode(&expected, &dictionary));
        }
    }

    #[test]
    fn test_empty_stream() {
        let table = SeparatorTable::v1();
        let counted = count_frequencies(Cursor::new(Vec::<u8>::new()), &table, 8).unwrap();
        assert!(counted.is_empty());

        let mut out: Vec<u8> = Vec::new();
        let empty = Cursor::new(Vec::<u8>::new());
        let summary = decode_stream(empty, &mut out, &table, &Dictionary::new(), 8).unwrap();
        assert_eq!(summary, StreamSummary::default());
        assert!(out.is_empty());
    }
}
