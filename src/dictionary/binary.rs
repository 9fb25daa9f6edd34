//! The canonical binary dictionary format.
//!
//! ### On-Disk Format
//! A plain sequence of records, one per entry, with no header and no record
//! separator:
//! 1.  **Word Length (`u32`, little-endian)**
//! 2.  **Word Bytes (`[u8]`)**
//! 3.  **Code Length (`u8`)**
//! 4.  **Code Bytes (`[u8]`)**
//!
//! Loading is strict: a truncated length field, a length exceeding the
//! remaining buffer, an empty word or code, or a duplicate word or code is a
//! `MalformedDictionary` error. Nothing is ever skipped.

use crate::dictionary::{to_hex, Dictionary};
use crate::error::DtcError;

const WORD_LEN_SIZE: usize = std::mem::size_of::<u32>();
const CODE_LEN_SIZE: usize = std::mem::size_of::<u8>();

/// Serializes `dictionary` in insertion order.
pub fn save(dictionary: &Dictionary) -> Result<Vec<u8>, DtcError> {
    let payload: usize = dictionary
        .iter()
        .map(|e| WORD_LEN_SIZE + e.word.len() + CODE_LEN_SIZE + e.code.len())
        .sum();
    let mut output_buf = Vec::with_capacity(payload);

    for entry in dictionary {
        let word_len = u32::try_from(entry.word.len()).map_err(|_| {
            DtcError::UnserializableEntry(format!(
                "Word of {} bytes does not fit the 32-bit length field",
                entry.word.len()
            ))
        })?;
        let code_len = u8::try_from(entry.code.len()).map_err(|_| {
            DtcError::UnserializableEntry(format!(
                "Code {} is longer than 255 bytes",
                to_hex(&entry.code)
            ))
        })?;

        output_buf.extend_from_slice(&word_len.to_le_bytes());
        output_buf.extend_from_slice(&entry.word);
        output_buf.push(code_len);
        output_buf.extend_from_slice(&entry.code);
    }
    Ok(output_buf)
}

/// Parses a dictionary, failing on the first malformed record.
pub fn load(input_bytes: &[u8]) -> Result<Dictionary, DtcError> {
    let mut dictionary = Dictionary::new();
    let mut cursor = 0;
    let mut record = 0usize;

    while cursor < input_bytes.len() {
        let word_len_bytes: [u8; WORD_LEN_SIZE] = input_bytes
            .get(cursor..cursor + WORD_LEN_SIZE)
            .and_then(|slice| slice.try_into().ok())
            .ok_or_else(|| truncated(record, cursor, "word length field"))?;
        let word_len = u32::from_le_bytes(word_len_bytes) as usize;
        cursor += WORD_LEN_SIZE;

        // Checked before any allocation: a corrupt length must not reserve memory.
        let remaining = input_bytes.len() - cursor;
        if word_len > remaining {
            return Err(DtcError::MalformedDictionary(format!(
                "Record {} at offset {}: word length ({}) exceeds the {} bytes remaining",
                record,
                cursor - WORD_LEN_SIZE,
                word_len,
                remaining
            )));
        }
        let word = input_bytes
            .get(cursor..cursor + word_len)
            .ok_or_else(|| truncated(record, cursor, "word bytes"))?;
        cursor += word_len;

        let code_len = *input_bytes
            .get(cursor)
            .ok_or_else(|| truncated(record, cursor, "code length field"))?
            as usize;
        cursor += CODE_LEN_SIZE;

        let code = input_bytes
            .get(cursor..cursor + code_len)
            .ok_or_else(|| truncated(record, cursor, "code bytes"))?;
        cursor += code_len;

        dictionary
            .insert(word.to_vec(), code.to_vec())
            .map_err(|e| DtcError::MalformedDictionary(format!("Record {}: {}", record, e)))?;
        record += 1;
    }

    Ok(dictionary)
}

fn truncated(record: usize, offset: usize, what: &str) -> DtcError {
    DtcError::MalformedDictionary(format!(
        "Record {} truncated at offset {}: missing {}",
        record, offset, what
    ))
}

//==================================================================================
// Unit Tests
//==================================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dictionary {
        Dictionary::from_entries(vec![
            (b"cat".to_vec(), vec![0x01]),
            (b"dog".to_vec(), vec![0x02]),
            ("привет".as_bytes().to_vec(), vec![0x01, 0x41]),
        ])
        .unwrap()
    }

    #[test]
    fn test_binary_roundtrip_preserves_order() {
        let original = sample();
        let bytes = save(&original).unwrap();
        let loaded = load(&bytes).unwrap();
        assert_eq!(loaded, original);
        let words: Vec<&[u8]> = loaded.iter().map(|e| e.word.as_slice()).collect();
        assert_eq!(words[0], b"cat");
        assert_eq!(words[2], "привет".as_bytes());
    }

    #[test]
    fn test_exact_layout() {
        let dict = Dictionary::from_entries(vec![(b"cat".to_vec(), vec![0x01])]).unwrap();
        assert_eq!(save(&dict).unwrap(), vec![3, 0, 0, 0, b'c', b'a', b't', 1, 0x01]);
    }

    #[test]
    fn test_empty_dictionary() {
        assert!(save(&Dictionary::new()).unwrap().is_empty());
        assert!(load(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_truncated_records_are_rejected() {
        let bytes = save(&sample()).unwrap();
        // Every proper prefix that ends mid-record must fail, never return a partial map.
        let record_ends = [9usize, 18];
        for cut in 1..bytes.len() {
            if record_ends.contains(&cut) {
                continue;
            }
            let err = load(&bytes[..cut]).unwrap_err();
            assert!(
                matches!(err, DtcError::MalformedDictionary(_)),
                "cut at {} gave {:?}",
                cut,
                err
            );
        }
    }

    #[test]
    fn test_length_field_exceeding_buffer() {
        // Claims a 200-byte word but only three bytes follow.
        let bytes = [200, 0, 0, 0, b'c', b'a', b't'];
        let err = load(&bytes).unwrap_err();
        assert!(err.to_string().contains("exceeds the 3 bytes remaining"));

        // Claims a 4-byte code but only one byte follows.
        let bytes = [1, 0, 0, 0, b'a', 4, 0x01];
        let err = load(&bytes).unwrap_err();
        assert!(err.to_string().contains("code bytes"));
    }

    #[test]
    fn test_huge_word_length_is_rejected_before_allocation() {
        let bytes = [0xFF, 0xFF, 0xFF, 0xFF, b'x'];
        let err = load(&bytes).unwrap_err();
        assert!(matches!(err, DtcError::MalformedDictionary(_)));
        assert!(err.to_string().contains("exceeds the 1 bytes remaining"));
    }

    #[test]
    fn test_words_above_sixteen_mebibytes_roundtrip() {
        let word = vec![b'w'; 16 * 1024 * 1024 + 1];
        let dict = Dictionary::from_entries(vec![(word.clone(), vec![0x01])]).unwrap();
        let bytes = save(&dict).unwrap();
        assert_eq!(bytes.len(), 4 + word.len() + 1 + 1);
        let loaded = load(&bytes).unwrap();
        assert_eq!(loaded.word_for(&[0x01]), Some(word.as_slice()));
    }

    #[test]
    fn test_duplicate_and_empty_entries_are_malformed() {
        let dup = [1, 0, 0, 0, b'a', 1, 0x01, 1, 0, 0, 0, b'b', 1, 0x01];
        assert!(matches!(load(&dup), Err(DtcError::MalformedDictionary(_))));

        let empty_code = [1, 0, 0, 0, b'a', 0];
        assert!(matches!(
            load(&empty_code),
            Err(DtcError::MalformedDictionary(_))
        ));
    }
}
