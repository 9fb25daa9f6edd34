// In: src/bridge/files.rs

//! File-level entry points used by the CLI.
//!
//! Output paths default to the input path with its extension replaced. With
//! transcoding off and no shared library, packing streams the input twice from
//! disk instead of loading it whole.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::bridge::format::{DEFAULT_DICTIONARY_EXT, DEFAULT_ENCODED_EXT, DEFAULT_RESTORED_EXT};
use crate::bridge::stateless_api::{
    normalize_input, pack_bytes, pack_bytes_with_library, unpack_bytes,
};
use crate::config::DtcConfig;
use crate::dictionary::Dictionary;
use crate::error::DtcError;
use crate::kernels::CodeAllocator;
use crate::pipeline::{self, PackStats};
use crate::traits::DictionaryCodec;
use crate::types::SeparatorTable;

/// Where a pack wrote its results.
#[derive(Debug, Clone)]
pub struct FilePackReport {
    pub encoded_path: PathBuf,
    pub dictionary_path: PathBuf,
    pub stats: PackStats,
}

#[derive(Debug, Clone)]
pub struct FileUnpackReport {
    pub output_path: PathBuf,
    pub bytes_written: usize,
}

/// `<input>` with its extension replaced by `ext`.
pub fn default_output_path(input: &Path, ext: &str) -> PathBuf {
    input.with_extension(ext)
}

pub fn pack_file(
    input: &Path,
    output: Option<&Path>,
    dictionary: Option<&Path>,
    library: Option<&Path>,
    config: &DtcConfig,
) -> Result<FilePackReport, DtcError> {
    let encoded_path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_path(input, DEFAULT_ENCODED_EXT));
    let dictionary_path = dictionary
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_path(input, DEFAULT_DICTIONARY_EXT));

    let stats = match library {
        None if !config.transcode => {
            pack_file_streaming(input, &encoded_path, &dictionary_path, config)?
        }
        _ => {
            let raw = read_input(input)?;
            let artifact = match library {
                Some(path) => {
                    let library = load_dictionary_file(path, config)?;
                    log::info!("Using shared library {} ({} words)", path.display(), library.len());
                    pack_bytes_with_library(&raw, config, &library)?
                }
                None => pack_bytes(&raw, config)?,
            };
            write_output(&encoded_path, &artifact.encoded)?;
            if let Err(e) = write_output(&dictionary_path, &artifact.dictionary) {
                discard_partial_output(&encoded_path);
                return Err(e);
            }
            artifact.stats
        }
    };

    Ok(FilePackReport {
        encoded_path,
        dictionary_path,
        stats,
    })
}

pub fn unpack_file(
    input: &Path,
    dictionary: &Path,
    output: Option<&Path>,
    config: &DtcConfig,
) -> Result<FileUnpackReport, DtcError> {
    let output_path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_path(input, DEFAULT_RESTORED_EXT));

    let encoded = read_input(input)?;
    let dictionary_bytes = read_input(dictionary)?;
    let restored = unpack_bytes(&encoded, &dictionary_bytes, config)?;
    write_output(&output_path, &restored)?;

    Ok(FileUnpackReport {
        output_path,
        bytes_written: restored.len(),
    })
}

/// Builds one shared dictionary from several input files and writes it to `output`.
pub fn build_library_files(
    inputs: &[PathBuf],
    output: &Path,
    config: &DtcConfig,
) -> Result<Dictionary, DtcError> {
    config.validate()?;
    let table = SeparatorTable::for_version(config.separator_table_version)?;

    let mut documents = Vec::with_capacity(inputs.len());
    for path in inputs {
        let raw = read_input(path)?;
        let (text, _label) = normalize_input(&raw, config)?;
        documents.push(text.into_owned());
    }

    let library = pipeline::build_library(documents.iter().map(Vec::as_slice), &table, config)?;
    write_output(output, &config.dictionary_format.save(&library)?)?;
    Ok(library)
}

/// Loads a dictionary and checks its codes against the configured separator table.
pub fn load_dictionary_file(path: &Path, config: &DtcConfig) -> Result<Dictionary, DtcError> {
    let bytes = read_input(path)?;
    let dictionary = config.dictionary_format.load(&bytes)?;
    dictionary.validate_codes(&SeparatorTable::for_version(config.separator_table_version)?)?;
    Ok(dictionary)
}

//==================================================================================
// Private Helpers
//==================================================================================

fn pack_file_streaming(
    input: &Path,
    encoded_path: &Path,
    dictionary_path: &Path,
    config: &DtcConfig,
) -> Result<PackStats, DtcError> {
    config.validate()?;
    let start = Instant::now();
    let table = SeparatorTable::for_version(config.separator_table_version)?;
    let chunk_size = config.chunk_size_bytes;

    let open = || File::open(input).map_err(|e| DtcError::from_io(input, e));

    // Pass 1
    let frequencies = pipeline::count_frequencies(BufReader::new(open()?), &table, chunk_size)
        .map_err(|e| with_path(e, input))?;
    let dictionary = CodeAllocator::new(&table, config.max_code_len)?.allocate(&frequencies)?;
    let dictionary_bytes = config.dictionary_format.save(&dictionary)?;

    // Pass 2
    let out = File::create(encoded_path).map_err(|e| output_error(encoded_path, e))?;
    let mut writer = WriteSide::new(BufWriter::new(out));
    let summary = pipeline::encode_stream(
        BufReader::new(open()?),
        &mut writer,
        &table,
        &dictionary,
        chunk_size,
    )
    .map_err(|e| {
        discard_partial_output(encoded_path);
        // Stream errors carry no path; the writer knows which side failed.
        if writer.failed {
            with_path(e, encoded_path)
        } else {
            with_path(e, input)
        }
    })?;

    if let Err(e) = write_output(dictionary_path, &dictionary_bytes) {
        discard_partial_output(encoded_path);
        return Err(e);
    }

    log::info!(
        "Streamed {} bytes into {} bytes in {:.2?}",
        summary.bytes_read,
        summary.bytes_written,
        start.elapsed()
    );

    Ok(PackStats {
        input_bytes: summary.bytes_read as usize,
        encoded_bytes: summary.bytes_written as usize,
        total_words: frequencies.total(),
        distinct_words: frequencies.len(),
        dictionary_entries: dictionary.len(),
        max_code_len: dictionary.max_code_len(),
        escaped_words: summary.escaped_words,
    })
}

fn read_input(path: &Path) -> Result<Vec<u8>, DtcError> {
    std::fs::read(path).map_err(|e| DtcError::from_io(path, e))
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<(), DtcError> {
    let mut file = File::create(path).map_err(|e| output_error(path, e))?;
    file.write_all(bytes)
        .and_then(|_| file.flush())
        .map_err(|e| {
            discard_partial_output(path);
            output_error(path, e)
        })
}

// A missing directory on the write side is not a missing input.
fn output_error(path: &Path, source: io::Error) -> DtcError {
    DtcError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Attaches `path` to a pathless stream error.
fn with_path(err: DtcError, path: &Path) -> DtcError {
    match err {
        DtcError::Stream(source) => DtcError::Io {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    }
}

/// Removes a half-written output. Devices and other special files are left alone.
fn discard_partial_output(path: &Path) {
    let is_regular_file = std::fs::symlink_metadata(path)
        .map(|m| m.file_type().is_file())
        .unwrap_or(false);
    if is_regular_file {
        if let Err(e) = std::fs::remove_file(path) {
            log::warn!("Could not remove partial output {}: {}", path.display(), e);
        }
    }
}

/// A writer that remembers whether it has failed.
struct WriteSide<W> {
    inner: W,
    failed: bool,
}

impl<W> WriteSide<W> {
    fn new(inner: W) -> Self {
        Self {
            inner,
            failed: false,
        }
    }
}

impl<W: Write> Write for WriteSide<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf).map_err(|e| {
            self.failed = true;
            e
        })
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush().map_err(|e| {
            self.failed = true;
            e
        })
    }
}
