// In: src/error.rs

//! This module defines the single, unified error type for the entire dtc library.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.
//!
//! The codec kernels themselves (`tokenize`, `encode`, `decode`) are total and
//! never produce an error. Everything below is raised by dictionary construction,
//! dictionary parsing, or the external boundary (files, text encodings, framing).

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DtcError {
    // =========================================================================
    // === High-Level, Semantic Errors (Specific to our library's logic)
    // =========================================================================
    #[error("Input not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    #[error("Text decoding failed: {0}")]
    DecodingError(String),

    #[error(
        "Code space exhausted: {distinct_words} distinct words but only {capacity} codes \
         of length <= {max_code_len} are available"
    )]
    CapacityExceeded {
        distinct_words: usize,
        capacity: u128,
        max_code_len: usize,
    },

    #[error("Malformed dictionary: {0}")]
    MalformedDictionary(String),

    #[error("Dictionary conflict: {0}")]
    DictionaryConflict(String),

    /// A well-formed entry that a dictionary format has no way to store.
    #[error("Unserializable dictionary entry: {0}")]
    UnserializableEntry(String),

    #[error("Invalid separator table: {0}")]
    InvalidSeparatorTable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Trailer framing error: {0}")]
    FrameFormatError(String),

    // =========================================================================
    // === External Error Wrappers
    // =========================================================================
    /// An I/O failure on a named file.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An I/O failure on an anonymous reader or writer (streaming kernels).
    #[error("Stream I/O error: {0}")]
    Stream(#[from] std::io::Error),

    /// An error from the Serde JSON library, typically while loading a config file.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}

impl DtcError {
    /// Attaches a path to an I/O error. A missing file becomes `InputNotFound`.
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            DtcError::InputNotFound { path }
        } else {
            DtcError::Io { path, source }
        }
    }
}
