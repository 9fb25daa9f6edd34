// In: src/bridge/stateless_api.rs

use std::borrow::Cow;

use crate::bridge::format::{append_encoding_trailer, strip_encoding_trailer};
use crate::bridge::normalize::{encoding_for_label, normalize, restore, BomSniffingDetector};
use crate::config::DtcConfig;
use crate::dictionary::Dictionary;
use crate::error::DtcError;
use crate::pipeline::{self, PackStats};
use crate::traits::DictionaryCodec;
use crate::types::SeparatorTable;

/// The serialized result of packing one input.
#[derive(Debug, Clone)]
pub struct PackedArtifact {
    /// Encoded stream, followed by the encoding trailer when transcoding is on.
    pub encoded: Vec<u8>,
    /// The dictionary in the configured `dictionary_format`.
    pub dictionary: Vec<u8>,
    pub stats: PackStats,
}

/// Packs raw input bytes into an encoded stream and its serialized dictionary.
pub fn pack_bytes(raw: &[u8], config: &DtcConfig) -> Result<PackedArtifact, DtcError> {
    pack_bytes_inner(raw, config, None)
}

/// Like `pack_bytes`, but extends a shared library instead of building a
/// dictionary from scratch.
pub fn pack_bytes_with_library(
    raw: &[u8],
    config: &DtcConfig,
    library: &Dictionary,
) -> Result<PackedArtifact, DtcError> {
    pack_bytes_inner(raw, config, Some(library))
}

/// Restores the original bytes from an encoded stream and its serialized dictionary.
pub fn unpack_bytes(
    encoded: &[u8],
    dictionary_bytes: &[u8],
    config: &DtcConfig,
) -> Result<Vec<u8>, DtcError> {
    // 1. Parse and check the dictionary before touching the stream.
    let table = SeparatorTable::for_version(config.separator_table_version)?;
    let dictionary = config.dictionary_format.load(dictionary_bytes)?;
    dictionary.validate_codes(&table)?;

    if !config.transcode {
        return Ok(pipeline::unpack(encoded, &dictionary));
    }

    // 2. Split off the trailer and resolve the recorded encoding.
    let (body, label) = strip_encoding_trailer(encoded)?;
    let encoding = match label {
        Some(label) => encoding_for_label(&label)?,
        None => {
            log::warn!("Encoded stream has no encoding trailer; assuming UTF-8");
            encoding_rs::UTF_8
        }
    };

    // 3. Decode, then transcode back.
    let utf8 = pipeline::unpack(body, &dictionary);
    restore(utf8, encoding, config.on_decode_error)
}

/// Normalizes raw input to the bytes the codec core works on. Without
/// transcoding this is the input itself.
pub(crate) fn normalize_input<'a>(
    raw: &'a [u8],
    config: &DtcConfig,
) -> Result<(Cow<'a, [u8]>, Option<&'static str>), DtcError> {
    if !config.transcode {
        return Ok((Cow::Borrowed(raw), None));
    }
    let detector = BomSniffingDetector::from_config(config)?;
    let normalized = normalize(raw, &detector, config.on_decode_error)?;
    Ok((normalized.utf8, Some(normalized.encoding.name())))
}

fn pack_bytes_inner(
    raw: &[u8],
    config: &DtcConfig,
    library: Option<&Dictionary>,
) -> Result<PackedArtifact, DtcError> {
    config.validate()?;
    let table = SeparatorTable::for_version(config.separator_table_version)?;

    // 1. Bring the input into the form the core expects.
    let (text, label) = normalize_input(raw, config)?;

    // 2. Call the pure pipeline engine.
    let output = match library {
        Some(library) => pipeline::pack_with_library(&text, &table, config, library)?,
        None => pipeline::pack(&text, &table, config)?,
    };

    // 3. Frame and serialize.
    let mut encoded = output.encoded;
    if let Some(label) = label {
        append_encoding_trailer(&mut encoded, label)?;
    }
    let dictionary = config.dictionary_format.save(&output.dictionary)?;

    // Report what the caller handed in and gets back, not the UTF-8 the core saw.
    let stats = PackStats {
        input_bytes: raw.len(),
        encoded_bytes: encoded.len(),
        ..output.stats
    };
    Ok(PackedArtifact {
        encoded,
        dictionary,
        stats,
    })
}
