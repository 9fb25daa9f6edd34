//! A human-debuggable dictionary format: one `<code-as-hex> <word>\n` line per
//! entry, in insertion order.
//!
//! Words are written as raw bytes. A word containing the record delimiter `\n`
//! cannot be represented and is rejected when saving. Loading is as strict as
//! the binary format: any line that does not parse is an error.

use crate::dictionary::{to_hex, Dictionary};
use crate::error::DtcError;

const RECORD_DELIMITER: u8 = b'\n';
const FIELD_DELIMITER: u8 = b' ';

pub fn save(dictionary: &Dictionary) -> Result<Vec<u8>, DtcError> {
    let mut output_buf = Vec::new();
    for (idx, entry) in dictionary.iter().enumerate() {
        if entry.word.contains(&RECORD_DELIMITER) {
            return Err(DtcError::UnserializableEntry(format!(
                "Entry {} contains a newline and cannot be stored in the text format",
                idx
            )));
        }
        output_buf.extend_from_slice(to_hex(&entry.code).as_bytes());
        output_buf.push(FIELD_DELIMITER);
        output_buf.extend_from_slice(&entry.word);
        output_buf.push(RECORD_DELIMITER);
    }
    Ok(output_buf)
}

pub fn load(input_bytes: &[u8]) -> Result<Dictionary, DtcError> {
    let mut dictionary = Dictionary::new();

    let body = input_bytes
        .strip_suffix(&[RECORD_DELIMITER])
        .unwrap_or(input_bytes);
    if body.is_empty() {
        return Ok(dictionary);
    }

    for (idx, line) in body.split(|&b| b == RECORD_DELIMITER).enumerate() {
        let line_no = idx + 1;
        let split = line
            .iter()
            .position(|&b| b == FIELD_DELIMITER)
            .ok_or_else(|| malformed(line_no, "missing space between code and word"))?;
        let (hex, word) = (&line[..split], &line[split + 1..]);

        let code = parse_hex(hex).ok_or_else(|| malformed(line_no, "code is not valid hex"))?;
        dictionary
            .insert(word.to_vec(), code)
            .map_err(|e| malformed(line_no, &e.to_string()))?;
    }
    Ok(dictionary)
}

fn parse_hex(hex: &[u8]) -> Option<Vec<u8>> {
    if hex.is_empty() || hex.len() % 2 != 0 {
        return None;
    }
    hex.chunks_exact(2)
        .map(|pair| {
            let digits = std::str::from_utf8(pair).ok()?;
            u8::from_str_radix(digits, 16).ok()
        })
        .collect()
}

fn malformed(line_no: usize, reason: &str) -> DtcError {
    DtcError::MalformedDictionary(format!("Line {}: {}", line_no, reason))
}
