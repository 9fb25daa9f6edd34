//! This module serves as the public API for the collection of pure, stateless
//! codec kernels.
//!
//! Data flow through the kernels, leaves first:
//!
//!   raw bytes -> [tokenize] -> tokens -> [frequency] -> word counts
//!             -> [allocate] -> Dictionary -> [substitute::encode] -> encoded bytes
//!
//! and back again with [substitute::decode]. None of the kernels touch files,
//! text encodings or configuration; the `pipeline` and `bridge` layers do that.

//==================================================================================
// 1. Module Declarations
//==================================================================================

/// Stage 1: Splitting bytes into words and separators
pub mod tokenize;

/// Stage 2: Counting words
pub mod frequency;

/// Stage 3: Assigning codes
pub mod allocate;

/// Stage 4: Substitution (encode / decode)
pub mod substitute;

//==================================================================================
// 2. Public API Re-exports
//==================================================================================
pub use allocate::{allocate, CodeAllocator, CodeSpace};
pub use frequency::FrequencyTable;
pub use substitute::{decode, decode_into, encode, encode_into};
pub use tokenize::{tokenize, Tokens};
