//! The codec engine: wires the pure kernels together into whole pack and
//! unpack operations.
//!
//! `orchestrator` works on a complete in-memory buffer. `stream` runs the same
//! two passes over `Read`/`Write` in bounded memory and produces byte-identical
//! output. Neither touches text encodings or file names; that is the bridge's job.

pub mod orchestrator;
pub mod stream;

pub use orchestrator::{build_library, pack, pack_with_library, unpack, PackOutput, PackStats};
pub use stream::{count_frequencies, decode_stream, encode_stream, StreamSummary};

#[cfg(test)]
mod orchestrator_tests;
