//! This module defines shared traits used across different layers.

use crate::config::DictionaryFormat;
use crate::dictionary::{binary, text, Dictionary};
use crate::error::DtcError;

/// A serialized representation of a `Dictionary`.
///
/// Implementations must round-trip exactly and must reject malformed input
/// instead of returning a partial dictionary.
pub trait DictionaryCodec {
    fn save(&self, dictionary: &Dictionary) -> Result<Vec<u8>, DtcError>;
    fn load(&self, bytes: &[u8]) -> Result<Dictionary, DtcError>;
}

/// The length-prefixed binary records of `dictionary::binary`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryDictionary;

/// The `<hex> <word>` lines of `dictionary::text`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextDictionary;

impl DictionaryCodec for BinaryDictionary {
    fn save(&self, dictionary: &Dictionary) -> Result<Vec<u8>, DtcError> {
        binary::save(dictionary)
    }

    fn load(&self, bytes: &[u8]) -> Result<Dictionary, DtcError> {
        binary::load(bytes)
    }
}

impl DictionaryCodec for TextDictionary {
    fn save(&self, dictionary: &Dictionary) -> Result<Vec<u8>, DtcError> {
        text::save(dictionary)
    }

    fn load(&self, bytes: &[u8]) -> Result<Dictionary, DtcError> {
        text::load(bytes)
    }
}

// The configured format dispatches to the concrete codec.
impl DictionaryCodec for DictionaryFormat {
    fn save(&self, dictionary: &Dictionary) -> Result<Vec<u8>, DtcError> {
        match self {
            DictionaryFormat::Binary => BinaryDictionary.save(dictionary),
            DictionaryFormat::Text => TextDictionary.save(dictionary),
        }
    }

    fn load(&self, bytes: &[u8]) -> Result<Dictionary, DtcError> {
        match self {
            DictionaryFormat::Binary => BinaryDictionary.load(bytes),
            DictionaryFormat::Text => TextDictionary.load(bytes),
        }
    }
}
