// In: src/config.rs

//! The single source of truth for all dtc configuration.
//!
//! `DtcConfig` is created once at the application boundary (the CLI, from an
//! optional JSON file plus flag overrides) and passed down by reference. The
//! codec kernels never read it directly: the pipeline and bridge layers pull
//! the few values each kernel needs out of it.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::DtcError;
use crate::kernels::allocate::{DEFAULT_MAX_CODE_LEN, MAX_SUPPORTED_CODE_LEN};
use crate::types::separator_table::SEPARATOR_TABLE_VERSION;

//==================================================================================
// I. Core Configuration Enums
//==================================================================================

/// How the dictionary is written next to the encoded output.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DictionaryFormat {
    /// **Default:** length-prefixed binary records.
    #[default]
    Binary,
    /// One `<code-as-hex> <word>` line per entry. Easier to inspect, larger.
    Text,
}

/// What the boundary does with input bytes that are invalid in their detected
/// (or recorded) text encoding.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DecodeErrorPolicy {
    /// **Default:** substitute U+FFFD and log a warning. Lossy for the bad bytes.
    #[default]
    Replace,
    /// Abort with `DtcError::DecodingError`.
    Fail,
}

//==================================================================================
// II. The Unified DtcConfig
//==================================================================================

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct DtcConfig {
    /// Upper bound on generated code length. The vocabulary of one input must
    /// fit into the codes up to this length or packing fails.
    #[serde(default = "default_max_code_len")]
    pub max_code_len: usize,

    /// Read size for the streaming two-pass kernels.
    #[serde(default = "default_chunk_size_bytes")]
    pub chunk_size_bytes: usize,

    #[serde(default)]
    pub dictionary_format: DictionaryFormat,

    /// If true, input is normalized to UTF-8 and the original encoding label is
    /// appended as a trailer. If false, input is treated as opaque bytes.
    #[serde(default = "default_true")]
    pub transcode: bool,

    /// Encoding assumed for input that has no BOM and is not valid UTF-8.
    #[serde(default = "default_fallback_encoding")]
    pub fallback_encoding: String,

    #[serde(default)]
    pub on_decode_error: DecodeErrorPolicy,

    /// Version of the built-in separator table.
    #[serde(default = "default_separator_table_version")]
    pub separator_table_version: u16,
}

impl Default for DtcConfig {
    fn default() -> Self {
        Self {
            max_code_len: default_max_code_len(),
            chunk_size_bytes: default_chunk_size_bytes(),
            dictionary_format: DictionaryFormat::default(),
            transcode: true,
            fallback_encoding: default_fallback_encoding(),
            on_decode_error: DecodeErrorPolicy::default(),
            separator_table_version: default_separator_table_version(),
        }
    }
}

impl DtcConfig {
    /// Loads a config from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, DtcError> {
        let raw = std::fs::read(path).map_err(|e| DtcError::from_io(path, e))?;
        let config: DtcConfig = serde_json::from_slice(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values no component can work with.
    pub fn validate(&self) -> Result<(), DtcError> {
        if !(1..=MAX_SUPPORTED_CODE_LEN).contains(&self.max_code_len) {
            return Err(DtcError::InvalidConfig(format!(
                "max_code_len must be between 1 and {}, got {}",
                MAX_SUPPORTED_CODE_LEN, self.max_code_len
            )));
        }
        if self.chunk_size_bytes == 0 {
            return Err(DtcError::InvalidConfig(
                "chunk_size_bytes must be greater than zero".into(),
            ));
        }
        match encoding_rs::Encoding::for_label(self.fallback_encoding.as_bytes()) {
            None => {
                return Err(DtcError::InvalidConfig(format!(
                    "Unknown fallback_encoding label '{}'",
                    self.fallback_encoding
                )))
            }
            // Labels like `iso-2022-kr` map to an encoding that decodes everything
            // to U+FFFD and has no label of its own to record in a trailer.
            Some(encoding) if encoding == encoding_rs::REPLACEMENT => {
                return Err(DtcError::InvalidConfig(format!(
                    "fallback_encoding '{}' resolves to the replacement encoding",
                    self.fallback_encoding
                )))
            }
            Some(_) => {}
        }
        if self.separator_table_version != SEPARATOR_TABLE_VERSION {
            return Err(DtcError::InvalidConfig(format!(
                "Unsupported separator_table_version {}",
                self.separator_table_version
            )));
        }
        Ok(())
    }
}

/// Helper for `serde` to default a boolean field to true.
fn default_true() -> bool {
    true
}

fn default_max_code_len() -> usize {
    DEFAULT_MAX_CODE_LEN
}

/// 1 MiB.
fn default_chunk_size_bytes() -> usize {
    1 << 20
}

fn default_fallback_encoding() -> String {
    "windows-1251".to_string()
}

fn default_separator_table_version() -> u16 {
    SEPARATOR_TABLE_VERSION
}
