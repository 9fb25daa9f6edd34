//! This module contains the substitution kernels: the encoder that replaces
//! words with their codes, and the greedy longest-match decoder.
//!
//! No delimiter is written between codes. Boundaries are recovered at decode
//! time purely by matching against the dictionary, which only works because no
//! code can contain a separator byte: every run of non-separator bytes in an
//! encoded stream is exactly one code (or an escaped raw word).

use crate::dictionary::Dictionary;
use crate::types::{Token, TokenKind};

//==================================================================================
// 1. Encoder
//==================================================================================

/// Encodes `tokens` into `output_buf`, returning the number of word tokens that
/// had no code and were escaped as raw bytes.
pub fn encode_into(
    tokens: &[Token<'_>],
    dictionary: &Dictionary,
    output_buf: &mut Vec<u8>,
) -> usize {
    let mut escaped = 0;
    for token in tokens {
        match token.kind {
            TokenKind::Word => match dictionary.code_for(token.bytes) {
                Some(code) => output_buf.extend_from_slice(code),
                None => {
                    escaped += 1;
                    output_buf.extend_from_slice(token.bytes);
                }
            },
            TokenKind::Separator => output_buf.extend_from_slice(token.bytes),
        }
    }
    if escaped > 0 {
        log::warn!(
            "{} word token(s) missing from the dictionary were written verbatim",
            escaped
        );
    }
    escaped
}

/// Encodes `tokens` with `dictionary`.
pub fn encode(tokens: &[Token<'_>], dictionary: &Dictionary) -> Vec<u8> {
    let mut output_buf = Vec::with_capacity(tokens.iter().map(Token::len).sum());
    encode_into(tokens, dictionary, &mut output_buf);
    output_buf
}

//==================================================================================
// 2. Decoder
//==================================================================================

/// Decodes `input_bytes` into `output_buf`.
///
/// At each position the longest dictionary code starting there is replaced by
/// its word; if none matches, the single byte is copied through unchanged.
pub fn decode_into(input_bytes: &[u8], dictionary: &Dictionary, output_buf: &mut Vec<u8>) {
    let max_len = dictionary.max_code_len();
    let mut pos = 0;

    while pos < input_bytes.len() {
        let window = max_len.min(input_bytes.len() - pos);
        let matched = (1..=window).rev().find_map(|len| {
            dictionary
                .word_for(&input_bytes[pos..pos + len])
                .map(|word| (word, len))
        });

        match matched {
            Some((word, len)) => {
                output_buf.extend_from_slice(word);
                pos += len;
            }
            None => {
                output_buf.push(input_bytes[pos]);
                pos += 1;
            }
        }
    }
}

/// Decodes `input_bytes` with `dictionary`.
pub fn decode(input_bytes: &[u8], dictionary: &Dictionary) -> Vec<u8> {
    let mut output_buf = Vec::with_capacity(input_bytes.len() * 2);
    decode_into(input_bytes, dictionary, &mut output_buf);
    output_buf
}
