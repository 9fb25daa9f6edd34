//! This module defines the canonical, versioned table of separator bytes.
//!
//! A separator byte is passed through the codec verbatim and may never appear
//! in a generated code. The tokenizer and the code allocator both receive the
//! table explicitly; there is no global mutable state.

use crate::error::DtcError;
use std::fmt;

/// The version of the built-in separator table.
pub const SEPARATOR_TABLE_VERSION: u16 = 1;

/// The version 1 separator bytes: NUL, TAB, LF, CR, SPACE, ASCII punctuation,
/// and the UTF-8 marker bytes `0xC2`/`0xA0` of the non-breaking space.
const V1_SEPARATOR_BYTES: &[u8] = &[
    0x00, 0x09, 0x0A, 0x0D, // control / whitespace
    0x20, 0x21, 0x22, 0x23, 0x24, 0x25, 0x26, 0x27, 0x28, 0x29, 0x2A, 0x2B, 0x2C, 0x2D, 0x2E,
    0x2F, // ' ' .. '/'
    0x3A, 0x3B, 0x3C, 0x3D, 0x3E, 0x3F, 0x40, // ':' .. '@'
    0x5B, 0x5C, 0x5D, 0x5E, 0x5F, 0x60, // '[' .. '`'
    0x7B, 0x7C, 0x7D, 0x7E, // '{' .. '~'
    0xA0, 0xC2, // UTF-8 NBSP markers
];

/// Registered multi-byte separators: CR LF and the UTF-8 encoded NBSP.
const V1_SEPARATOR_PATTERNS: &[&[u8]] = &[&[0x0D, 0x0A], &[0xC2, 0xA0]];

/// The set of bytes that separate words, plus the multi-byte separator patterns
/// the tokenizer recognizes as a single token.
#[derive(Clone, PartialEq, Eq)]
pub struct SeparatorTable {
    version: u16,
    members: [bool; 256],
    /// Sorted longest-first so the tokenizer can take the first match.
    patterns: Vec<Vec<u8>>,
}

impl SeparatorTable {
    /// Returns the built-in version 1 table.
    pub fn v1() -> Self {
        let mut members = [false; 256];
        for &b in V1_SEPARATOR_BYTES {
            members[b as usize] = true;
        }
        Self {
            version: SEPARATOR_TABLE_VERSION,
            members,
            patterns: V1_SEPARATOR_PATTERNS.iter().map(|p| p.to_vec()).collect(),
        }
    }

    /// Looks up a built-in table by version number.
    pub fn for_version(version: u16) -> Result<Self, DtcError> {
        match version {
            SEPARATOR_TABLE_VERSION => Ok(Self::v1()),
            other => Err(DtcError::InvalidSeparatorTable(format!(
                "Unknown separator table version {}",
                other
            ))),
        }
    }

    /// Builds a custom table.
    ///
    /// Every pattern must be at least two bytes long and consist only of
    /// separator bytes: a pattern byte inside the code alphabet could be read
    /// back as a code at decode time. The resulting code alphabet must not be
    /// empty.
    pub fn new(version: u16, bytes: &[u8], patterns: &[&[u8]]) -> Result<Self, DtcError> {
        let mut members = [false; 256];
        for &b in bytes {
            members[b as usize] = true;
        }

        let mut owned_patterns = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            if pattern.len() < 2 {
                return Err(DtcError::InvalidSeparatorTable(format!(
                    "Pattern {:02x?} is shorter than two bytes",
                    pattern
                )));
            }
            if let Some(b) = pattern.iter().find(|&&b| !members[b as usize]) {
                return Err(DtcError::InvalidSeparatorTable(format!(
                    "Pattern {:02x?} contains non-separator byte 0x{:02x}",
                    pattern, b
                )));
            }
            owned_patterns.push(pattern.to_vec());
        }
        // Longest first; ties keep a deterministic byte order.
        owned_patterns.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        owned_patterns.dedup();

        let table = Self {
            version,
            members,
            patterns: owned_patterns,
        };
        if table.alphabet().is_empty() {
            return Err(DtcError::InvalidSeparatorTable(
                "Every byte 0x01..=0xFF is a separator; no code alphabet remains".into(),
            ));
        }
        Ok(table)
    }

    pub fn version(&self) -> u16 {
        self.version
    }

    #[inline]
    pub fn is_separator(&self, byte: u8) -> bool {
        self.members[byte as usize]
    }

    /// Multi-byte separator patterns, longest first.
    pub fn patterns(&self) -> &[Vec<u8>] {
        &self.patterns
    }

    /// The code alphabet: every byte in `0x01..=0xFF` that is not a separator,
    /// in ascending order.
    pub fn alphabet(&self) -> Vec<u8> {
        (0x01..=0xFFu8).filter(|&b| !self.is_separator(b)).collect()
    }

    /// Returns true if `code` is non-empty and built only from alphabet bytes.
    pub fn is_valid_code(&self, code: &[u8]) -> bool {
        !code.is_empty() && code.iter().all(|&b| b != 0x00 && !self.is_separator(b))
    }
}

impl Default for SeparatorTable {
    fn default() -> Self {
        Self::v1()
    }
}

impl fmt::Debug for SeparatorTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes: Vec<u8> = (0..=0xFFu8).filter(|&b| self.is_separator(b)).collect();
        f.debug_struct("SeparatorTable")
            .field("version", &self.version)
            .field("bytes", &format_args!("{:02x?}", bytes))
            .field("patterns", &self.patterns)
            .finish()
    }
}
