// In: src/bridge/format.rs

//! Defines the on-disk artifacts produced by the bridge: the encoding trailer
//! appended after an encoded stream, and the default output file extensions.
//!
//! The trailer is fixed-size so a reader can find it by looking at the last
//! `TRAILER_LEN` bytes only:
//!
//! ```text
//! +----------------+------------------------------------+
//! | "DTCENC1|" (8) | encoding label, space padded (24)  |
//! +----------------+------------------------------------+
//! ```

use crate::error::DtcError;

//==================================================================================
// I. Trailer Constants
//==================================================================================

/// The magic number that opens the encoding trailer.
pub const TRAILER_MAGIC: &[u8; 8] = b"DTCENC1|";
/// Width of the space-padded encoding label field.
pub const TRAILER_LABEL_LEN: usize = 24;
/// Total size of the trailer.
pub const TRAILER_LEN: usize = TRAILER_MAGIC.len() + TRAILER_LABEL_LEN;

const LABEL_PADDING: u8 = b' ';

//==================================================================================
// II. Default File Names
//==================================================================================

/// Extension of an encoded stream written next to its input.
pub const DEFAULT_ENCODED_EXT: &str = "dtc";
/// Extension of a dictionary (or shared library) file.
pub const DEFAULT_DICTIONARY_EXT: &str = "dtl";
/// Extension of a restored file when no output path is given.
pub const DEFAULT_RESTORED_EXT: &str = "out";

//==================================================================================
// III. Trailer Read / Write
//==================================================================================

/// Appends the trailer recording `label` to `output_buf`.
pub fn append_encoding_trailer(output_buf: &mut Vec<u8>, label: &str) -> Result<(), DtcError> {
    let label_bytes = label.as_bytes();
    if label_bytes.is_empty() || label_bytes.len() > TRAILER_LABEL_LEN {
        return Err(DtcError::FrameFormatError(format!(
            "Encoding label '{}' must be 1 to {} bytes long",
            label, TRAILER_LABEL_LEN
        )));
    }
    output_buf.reserve(TRAILER_LEN);
    output_buf.extend_from_slice(TRAILER_MAGIC);
    output_buf.extend_from_slice(label_bytes);
    output_buf.resize(output_buf.len() + TRAILER_LABEL_LEN - label_bytes.len(), LABEL_PADDING);
    Ok(())
}

/// Splits a packed stream into its encoded body and the recorded encoding label.
///
/// Returns `None` for the label when the stream carries no trailer. A trailer
/// whose magic matches but whose label is unreadable is an error.
pub fn strip_encoding_trailer(bytes: &[u8]) -> Result<(&[u8], Option<String>), DtcError> {
    let Some(split) = bytes.len().checked_sub(TRAILER_LEN) else {
        return Ok((bytes, None));
    };
    let (body, trailer) = bytes.split_at(split);
    let Some(label_field) = trailer.strip_prefix(TRAILER_MAGIC.as_slice()) else {
        return Ok((bytes, None));
    };

    let label_end = label_field
        .iter()
        .rposition(|&b| b != LABEL_PADDING)
        .map(|i| i + 1)
        .ok_or_else(|| DtcError::FrameFormatError("Trailer has an empty encoding label".into()))?;
    let label = std::str::from_utf8(&label_field[..label_end]).map_err(|_| {
        DtcError::FrameFormatError("Trailer encoding label is not valid UTF-8".into())
    })?;
    Ok((body, Some(label.to_string())))
}
