// In: src/bridge/normalize.rs

//! Text-encoding normalization at the external boundary.
//!
//! The codec core only ever sees bytes, and its dictionaries are built over
//! UTF-8. On the way in, input in any supported encoding is transcoded to
//! UTF-8; on the way out, the restored UTF-8 is transcoded back to the encoding
//! recorded in the trailer. BOMs are kept as U+FEFF so they survive the trip.

use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};

use crate::config::{DecodeErrorPolicy, DtcConfig};
use crate::error::DtcError;

//==================================================================================
// 1. Detection
//==================================================================================

/// Picks the encoding of a raw input buffer.
pub trait EncodingDetector {
    fn detect(&self, raw: &[u8]) -> &'static Encoding;
}

/// BOM first, then UTF-8 validity, then a configured fallback.
#[derive(Debug, Clone, Copy)]
pub struct BomSniffingDetector {
    fallback: &'static Encoding,
}

impl BomSniffingDetector {
    pub fn new(fallback: &'static Encoding) -> Self {
        Self { fallback }
    }

    pub fn from_config(config: &DtcConfig) -> Result<Self, DtcError> {
        config.validate()?;
        let fallback = Encoding::for_label(config.fallback_encoding.as_bytes()).ok_or_else(|| {
            DtcError::InvalidConfig(format!(
                "Unknown fallback_encoding label '{}'",
                config.fallback_encoding
            ))
        })?;
        Ok(Self::new(fallback))
    }
}

impl EncodingDetector for BomSniffingDetector {
    fn detect(&self, raw: &[u8]) -> &'static Encoding {
        if let Some((encoding, _bom_len)) = Encoding::for_bom(raw) {
            return encoding;
        }
        if Encoding::utf8_valid_up_to(raw) == raw.len() {
            return UTF_8;
        }
        self.fallback
    }
}

//==================================================================================
// 2. Normalize (any encoding -> UTF-8)
//==================================================================================

/// UTF-8 text plus the encoding it was decoded from.
#[derive(Debug, Clone)]
pub struct NormalizedText<'a> {
    pub utf8: Cow<'a, [u8]>,
    pub encoding: &'static Encoding,
}

pub fn normalize<'a>(
    raw: &'a [u8],
    detector: &dyn EncodingDetector,
    policy: DecodeErrorPolicy,
) -> Result<NormalizedText<'a>, DtcError> {
    let encoding = detector.detect(raw);
    log::debug!("Detected input encoding: {}", encoding.name());

    let text = match policy {
        DecodeErrorPolicy::Fail => encoding
            .decode_without_bom_handling_and_without_replacement(raw)
            .ok_or_else(|| {
                DtcError::DecodingError(format!("Input is not valid {}", encoding.name()))
            })?,
        DecodeErrorPolicy::Replace => {
            let (text, had_errors) = encoding.decode_without_bom_handling(raw);
            if had_errors {
                log::warn!(
                    "Input contains bytes that are invalid {}; they were replaced with U+FFFD",
                    encoding.name()
                );
            }
            text
        }
    };

    let utf8 = match text {
        Cow::Borrowed(s) => Cow::Borrowed(s.as_bytes()),
        Cow::Owned(s) => Cow::Owned(s.into_bytes()),
    };
    Ok(NormalizedText { utf8, encoding })
}

//==================================================================================
// 3. Restore (UTF-8 -> recorded encoding)
//==================================================================================

/// Resolves a label read back from a trailer.
pub fn encoding_for_label(label: &str) -> Result<&'static Encoding, DtcError> {
    Encoding::for_label(label.as_bytes())
        .ok_or_else(|| DtcError::FrameFormatError(format!("Unknown encoding label '{}'", label)))
}

pub fn restore(
    utf8: Vec<u8>,
    encoding: &'static Encoding,
    policy: DecodeErrorPolicy,
) -> Result<Vec<u8>, DtcError> {
    if encoding == UTF_8 {
        return Ok(utf8);
    }

    let text: String = match String::from_utf8(utf8) {
        Ok(text) => text,
        Err(e) => match policy {
            DecodeErrorPolicy::Fail => {
                return Err(DtcError::DecodingError(format!(
                    "Decoded text is not valid UTF-8 at byte {}",
                    e.utf8_error().valid_up_to()
                )))
            }
            DecodeErrorPolicy::Replace => {
                log::warn!("Decoded text is not valid UTF-8; invalid bytes were replaced");
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        },
    };

    // encoding_rs only encodes to ASCII-compatible encodings.
    if encoding == UTF_16LE {
        return Ok(text.encode_utf16().flat_map(u16::to_le_bytes).collect());
    }
    if encoding == UTF_16BE {
        return Ok(text.encode_utf16().flat_map(u16::to_be_bytes).collect());
    }

    let (bytes, _, had_unmappable) = encoding.encode(&text);
    if had_unmappable {
        match policy {
            DecodeErrorPolicy::Fail => {
                return Err(DtcError::DecodingError(format!(
                    "Text has characters that cannot be written as {}",
                    encoding.name()
                )))
            }
            DecodeErrorPolicy::Replace => log::warn!(
                "Characters not representable in {} were written as numeric references",
                encoding.name()
            ),
        }
    }
    Ok(bytes.into_owned())
}
