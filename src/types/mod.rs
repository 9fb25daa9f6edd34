//! This module defines the core, strongly-typed data representations shared
//! by the tokenizer, the code allocator and the codec.
//!
//! It includes the versioned `SeparatorTable` (the one place where the set of
//! pass-through bytes is defined) and the two-tag `Token` type produced by the
//! tokenizer.

pub mod separator_table;
pub mod token;

// Re-export the main type(s) for easier access.
pub use separator_table::SeparatorTable;
pub use token::{Token, TokenKind};
