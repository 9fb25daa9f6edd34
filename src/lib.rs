//! This file is the root of the `dtc` Rust crate, a reversible word-substitution
//! text codec.
//!
//! Its responsibilities are strictly limited to:
//! 1.  Declaring all the top-level modules of our library (`pipeline`, `kernels`, etc.)
//!     so the Rust compiler knows they exist.
//! 2.  Re-exporting the handful of types most callers need, so that
//!     `dtc::pack_bytes` and `dtc::DtcConfig` work without digging into modules.
//!
//! Layering, leaves first: `types` -> `kernels` -> `dictionary` -> `pipeline` -> `bridge`.

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
//==================================================================================
// 1. Module Declarations
//==================================================================================
#[macro_use]
mod observability; // Make macros available throughout the crate

pub mod bridge;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod kernels;
pub mod pipeline;
pub mod traits;
pub mod types;

//==================================================================================
// 2. Public API Re-exports
//==================================================================================
pub use bridge::{pack_bytes, unpack_bytes, PackedArtifact};
pub use config::{DecodeErrorPolicy, DictionaryFormat, DtcConfig};
pub use dictionary::Dictionary;
pub use error::DtcError;
pub use types::{SeparatorTable, Token, TokenKind};
