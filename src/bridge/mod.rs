// In: src/bridge/mod.rs

// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Bridge Layer
// ====================================================================================
//
// The `bridge` is the boundary between the outside world (files, text in any
// encoding, serialized dictionaries) and the pure `pipeline` engine, which only
// ever sees UTF-8 bytes and in-memory `Dictionary` values.
//
// Data Flow (Pack):
//
//   1. [Files (pack_file)]            -> Reads the input, picks output paths
//         |
//         `-> 2. [Stateless API (pack_bytes)]
//               |
//               `-> a. `normalize` detects the encoding and transcodes to UTF-8
//               |
//               `-> b. `pipeline::pack` tokenizes, allocates and encodes
//               |
//               `-> c. `format` appends the encoding trailer; the dictionary is
//                      serialized in the configured format
//
// Data Flow (Unpack):
//
//   1. [Files (unpack_file)]          -> Reads the encoded stream and dictionary
//         |
//         `-> 2. [Stateless API (unpack_bytes)]
//               |
//               `-> a. `format` strips the trailer and yields the recorded encoding
//               |
//               `-> b. `pipeline::unpack` decodes
//               |
//               `-> c. `normalize::restore` transcodes back to the original encoding
//
// ====================================================================================
pub mod files;
pub mod format;
pub mod normalize;
pub mod stateless_api;

pub use files::{build_library_files, load_dictionary_file, pack_file, unpack_file};
pub use files::{FilePackReport, FileUnpackReport};
pub use normalize::{BomSniffingDetector, EncodingDetector};
pub use stateless_api::{pack_bytes, pack_bytes_with_library, unpack_bytes, PackedArtifact};

#[cfg(test)]
mod tests;
