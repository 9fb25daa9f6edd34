use super::*;
use crate::bridge::format::TRAILER_LEN;
use crate::config::{DictionaryFormat, DtcConfig};
use crate::error::DtcError;
use encoding_rs::WINDOWS_1251;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const RUSSIAN: &str = "Съешь же ещё этих мягких французских булок, да выпей же чаю.\r\n\
                       Съешь же ещё булок!";

fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, bytes).unwrap();
    path
}

#[test]
fn test_file_roundtrip_with_default_paths() {
    let dir = TempDir::new().unwrap();
    let input = write_file(dir.path(), "doc.txt", RUSSIAN.as_bytes());
    let config = DtcConfig::default();

    let report = pack_file(&input, None, None, None, &config).unwrap();
    assert_eq!(report.encoded_path, dir.path().join("doc.dtc"));
    assert_eq!(report.dictionary_path, dir.path().join("doc.dtl"));
    assert!(report.stats.encoded_bytes < report.stats.input_bytes);

    let restored =
        unpack_file(&report.encoded_path, &report.dictionary_path, None, &config).unwrap();
    assert_eq!(restored.output_path, dir.path().join("doc.out"));
    assert_eq!(fs::read(&restored.output_path).unwrap(), RUSSIAN.as_bytes());
}

#[test]
fn test_cp1251_file_is_restored_byte_exact() {
    let dir = TempDir::new().unwrap();
    let (raw, _, _) = WINDOWS_1251.encode(RUSSIAN);
    let input = write_file(dir.path(), "legacy.txt", &raw);
    let config = DtcConfig::default();

    let report = pack_file(&input, None, None, None, &config).unwrap();
    let encoded = fs::read(&report.encoded_path).unwrap();
    let trailer = &encoded[encoded.len() - TRAILER_LEN..];
    assert!(trailer.starts_with(b"DTCENC1|windows-1251"));

    let out = dir.path().join("legacy.restored");
    unpack_file(&report.encoded_path, &report.dictionary_path, Some(&out), &config).unwrap();
    assert_eq!(fs::read(&out).unwrap(), raw.into_owned());
}

#[test]
fn test_text_dictionary_format() {
    let dir = TempDir::new().unwrap();
    let input = write_file(dir.path(), "a.txt", b"cat dog cat, dog! cat");
    let config = DtcConfig {
        dictionary_format: DictionaryFormat::Text,
        ..DtcConfig::default()
    };

    let report = pack_file(&input, None, None, None, &config).unwrap();
    assert_eq!(fs::read(&report.dictionary_path).unwrap(), b"01 cat\n02 dog\n");

    // Reading a text dictionary as binary must fail loudly.
    let wrong = DtcConfig::default();
    let result = unpack_file(&report.encoded_path, &report.dictionary_path, None, &wrong);
    assert!(matches!(result, Err(DtcError::MalformedDictionary(_))));
}

#[test]
fn test_streaming_pack_matches_in_memory_pack() {
    let dir = TempDir::new().unwrap();
    let body: Vec<u8> = RUSSIAN.as_bytes().repeat(50);
    let input = write_file(dir.path(), "big.txt", &body);
    let config = DtcConfig {
        transcode: false,
        chunk_size_bytes: 17,
        ..DtcConfig::default()
    };

    let streamed = pack_file(&input, None, None, None, &config).unwrap();
    let artifact = pack_bytes(&body, &config).unwrap();
    assert_eq!(fs::read(&streamed.encoded_path).unwrap(), artifact.encoded);
    assert_eq!(fs::read(&streamed.dictionary_path).unwrap(), artifact.dictionary);
    assert_eq!(streamed.stats, artifact.stats);

    let restored =
        unpack_file(&streamed.encoded_path, &streamed.dictionary_path, None, &config).unwrap();
    assert_eq!(fs::read(&restored.output_path).unwrap(), body);
}

#[test]
fn test_shared_library_workflow() {
    let dir = TempDir::new().unwrap();
    let first = write_file(dir.path(), "one.txt", b"alpha beta gamma alpha");
    let second = write_file(dir.path(), "two.txt", b"beta delta alpha");
    let library_path = dir.path().join("corpus.dtl");
    let config = DtcConfig::default();

    let library = build_library_files(&[first, second], &library_path, &config).unwrap();
    assert_eq!(library.len(), 4);
    assert_eq!(load_dictionary_file(&library_path, &config).unwrap(), library);

    let input = write_file(dir.path(), "three.txt", b"alpha omega beta");
    let report = pack_file(&input, None, None, Some(&library_path), &config).unwrap();
    let dictionary = load_dictionary_file(&report.dictionary_path, &config).unwrap();
    for entry in &library {
        assert_eq!(dictionary.code_for(&entry.word), Some(entry.code.as_slice()));
    }
    assert!(dictionary.contains_word(b"omega"));

    let restored =
        unpack_file(&report.encoded_path, &report.dictionary_path, None, &config).unwrap();
    assert_eq!(fs::read(&restored.output_path).unwrap(), b"alpha omega beta");
}

#[test]
fn test_missing_input_is_reported() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.txt");
    let result = pack_file(&missing, None, None, None, &DtcConfig::default());
    match result {
        Err(DtcError::InputNotFound { path }) => assert_eq!(path, missing),
        other => panic!("Expected InputNotFound, got {:?}", other.map(|r| r.encoded_path)),
    }
}

#[test]
fn test_missing_trailer_assumes_utf8() {
    let config = DtcConfig::default();
    let artifact = pack_bytes("мир и мир".as_bytes(), &config).unwrap();
    let body = &artifact.encoded[..artifact.encoded.len() - TRAILER_LEN];
    let restored = unpack_bytes(body, &artifact.dictionary, &config).unwrap();
    assert_eq!(restored, "мир и мир".as_bytes());
}

#[test]
fn test_unknown_trailer_label_is_a_frame_error() {
    let config = DtcConfig::default();
    let mut artifact = pack_bytes(b"hello world", &config).unwrap();
    let len = artifact.encoded.len();
    artifact.encoded[len - 24..len - 24 + 9].copy_from_slice(b"klingon-8");
    let result = unpack_bytes(&artifact.encoded, &artifact.dictionary, &config);
    assert!(matches!(result, Err(DtcError::FrameFormatError(_))));
}

#[test]
fn test_dictionary_code_containing_separator_is_rejected() {
    let dir = TempDir::new().unwrap();
    let encoded = write_file(dir.path(), "a.dtc", b"a b");
    let dictionary = write_file(dir.path(), "a.dtl", b"20 cat\n");
    let config = DtcConfig {
        transcode: false,
        dictionary_format: DictionaryFormat::Text,
        ..DtcConfig::default()
    };

    let result = unpack_file(&encoded, &dictionary, None, &config);
    assert!(matches!(result, Err(DtcError::MalformedDictionary(_))));
    assert!(!dir.path().join("a.out").exists());
    assert!(matches!(
        load_dictionary_file(&dictionary, &config),
        Err(DtcError::MalformedDictionary(_))
    ));
}

#[cfg(target_os = "linux")]
#[test]
fn test_streaming_write_failure_names_the_output() {
    let dir = TempDir::new().unwrap();
    let input = write_file(dir.path(), "doc.txt", RUSSIAN.as_bytes());
    let full = Path::new("/dev/full");
    let config = DtcConfig {
        transcode: false,
        ..DtcConfig::default()
    };

    let result = pack_file(&input, Some(full), None, None, &config);
    match result {
        Err(DtcError::Io { path, source }) => {
            assert_eq!(path.as_path(), full);
            assert_eq!(source.kind(), std::io::ErrorKind::StorageFull);
        }
        other => panic!("Expected DtcError::Io, got {:?}", other.map(|r| r.encoded_path)),
    }
    // The device itself must survive the cleanup.
    assert!(full.exists());
}

#[test]
fn test_failed_dictionary_write_removes_encoded_output() {
    let dir = TempDir::new().unwrap();
    let input = write_file(dir.path(), "doc.txt", RUSSIAN.as_bytes());
    let encoded = dir.path().join("doc.dtc");
    let unwritable = dir.path().join("missing-dir").join("doc.dtl");

    for transcode in [true, false] {
        let config = DtcConfig {
            transcode,
            ..DtcConfig::default()
        };
        let result = pack_file(&input, Some(&encoded), Some(&unwritable), None, &config);
        match result {
            Err(DtcError::Io { path, .. }) => assert_eq!(path, unwritable),
            other => panic!("Expected DtcError::Io, got {:?}", other.map(|r| r.encoded_path)),
        }
        assert!(!encoded.exists(), "transcode = {}", transcode);
    }
}
