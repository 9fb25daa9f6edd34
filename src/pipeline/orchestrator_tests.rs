use std::io::Cursor;

use crate::config::DtcConfig;
use crate::dictionary::Dictionary;
use crate::error::DtcError;
use crate::kernels::{allocate, encode, tokenize, FrequencyTable};
use crate::pipeline::orchestrator::{build_library, pack, pack_with_library, unpack};
use crate::pipeline::stream::{count_frequencies, decode_stream, encode_stream};
use crate::types::SeparatorTable;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// Test Helpers
/// Builds a pseudo-natural text: a Zipf-ish vocabulary joined by mixed separators.
fn generate_corpus(seed: u64, words: usize) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let vocabulary: Vec<String> = (0..400)
        .map(|i| {
            let len = 2 + (i % 9);
            (0..len)
                .map(|_| (b'a' + rng.random_range(0..26u8)) as char)
                .collect()
        })
        .collect();
    let separators: [&[u8]; 6] = [b" ", b", ", b".\r\n", b"\t", "\u{a0}".as_bytes(), b" - "];

    let mut out: Vec<u8> = Vec::new();
    for _ in 0..words {
        // Squaring the uniform draw skews toward the head of the vocabulary.
        let r: f64 = rng.random();
        let idx = ((r * r) * vocabulary.len() as f64) as usize;
        out.extend_from_slice(vocabulary[idx.min(vocabulary.len() - 1)].as_bytes());
        out.extend_from_slice(separators[rng.random_range(0..separators.len())]);
    }
    out
}

fn small_config(max_code_len: usize) -> DtcConfig {
    DtcConfig {
        max_code_len,
        ..DtcConfig::default()
    }
}

//==================================================================================
// Scenario tests
//==================================================================================

#[test]
fn test_pack_unpack_example_sentence() {
    let table = SeparatorTable::v1();
    let input = b"cat dog cat, dog! cat";
    let output = pack(input, &table, &DtcConfig::default()).unwrap();

    assert_eq!(
        output.encoded,
        vec![0x01, 0x20, 0x02, 0x20, 0x01, 0x2C, 0x20, 0x02, 0x21, 0x20, 0x01]
    );
    assert_eq!(output.dictionary.len(), 2);
    assert_eq!(output.stats.total_words, 5);
    assert_eq!(output.stats.distinct_words, 2);
    assert_eq!(output.stats.max_code_len, 1);
    assert_eq!(output.stats.escaped_words, 0);
    assert_eq!(unpack(&output.encoded, &output.dictionary), input);
}

#[test]
fn test_pack_unpack_generated_corpus() {
    let table = SeparatorTable::v1();
    let input = generate_corpus(7, 5_000);
    let output = pack(&input, &table, &DtcConfig::default()).unwrap();

    assert!(output.stats.encoded_bytes < output.stats.input_bytes);
    assert!(output.stats.ratio() < 1.0);
    assert_eq!(unpack(&output.encoded, &output.dictionary), input);
}

#[test]
fn test_empty_input() {
    let table = SeparatorTable::v1();
    let output = pack(b"", &table, &DtcConfig::default()).unwrap();
    assert!(output.encoded.is_empty());
    assert!(output.dictionary.is_empty());
    assert_eq!(output.stats.ratio(), 1.0);
    assert!(unpack(&output.encoded, &output.dictionary).is_empty());
}

#[test]
fn test_separator_only_input_passes_through() {
    let table = SeparatorTable::v1();
    let input = b" ,\r\n\t!?";
    let output = pack(input, &table, &DtcConfig::default()).unwrap();
    assert_eq!(output.encoded, input);
    assert!(output.dictionary.is_empty());
}

#[test]
fn test_capacity_exceeded_is_reported_before_encoding() {
    let table = SeparatorTable::v1();
    // 218 distinct words cannot fit in the 217 one-byte codes.
    let input: Vec<u8> = (0..218)
        .flat_map(|i| format!("w{} ", i).into_bytes())
        .collect();
    let result = pack(&input, &table, &small_config(1));
    match result {
        Err(DtcError::CapacityExceeded {
            distinct_words,
            capacity,
            max_code_len,
        }) => {
            assert_eq!(distinct_words, 218);
            assert_eq!(capacity, 217);
            assert_eq!(max_code_len, 1);
        }
        other => panic!("Expected CapacityExceeded, got {:?}", other.map(|o| o.stats)),
    }

    // One more byte of code length is plenty.
    let output = pack(&input, &table, &small_config(2)).unwrap();
    assert_eq!(unpack(&output.encoded, &output.dictionary), input);
}

#[test]
fn test_pack_with_library_keeps_library_codes() {
    let table = SeparatorTable::v1();
    let config = DtcConfig::default();
    let corpus = [&b"alpha beta gamma alpha"[..], &b"beta delta alpha"[..]];
    let library = build_library(corpus.iter().copied(), &table, &config).unwrap();
    assert_eq!(library.len(), 4);
    // alpha (3) then beta (2), then the rest.
    assert_eq!(library.code_for(b"alpha"), Some(&[0x01][..]));
    assert_eq!(library.code_for(b"beta"), Some(&[0x02][..]));

    let input = b"alpha epsilon beta epsilon zeta";
    let output = pack_with_library(input, &table, &config, &library).unwrap();

    for entry in &library {
        assert_eq!(output.dictionary.code_for(&entry.word), Some(entry.code.as_slice()));
    }
    assert_eq!(output.dictionary.len(), 6);
    assert_eq!(output.stats.distinct_words, 4);
    assert_eq!(output.stats.dictionary_entries, 6);
    assert_eq!(unpack(&output.encoded, &output.dictionary), input);
}

#[test]
fn test_pack_with_library_rejects_codes_with_separators() {
    let table = SeparatorTable::v1();
    let bad = Dictionary::from_entries(vec![(b"cat".to_vec(), vec![b' '])]).unwrap();
    let result = pack_with_library(b"cat", &table, &DtcConfig::default(), &bad);
    assert!(matches!(result, Err(DtcError::MalformedDictionary(_))));
}

#[test]
fn test_build_library_counts_across_documents() {
    let table = SeparatorTable::v1();
    // "rare" wins inside the second document, "common" wins overall.
    let docs = [
        &b"common common common"[..],
        &b"rare rare"[..],
        &b"common"[..],
    ];
    let library = build_library(docs.iter().copied(), &table, &DtcConfig::default()).unwrap();
    assert_eq!(library.code_for(b"common"), Some(&[0x01][..]));
    assert_eq!(library.code_for(b"rare"), Some(&[0x02][..]));
}

#[test]
fn test_streaming_matches_in_memory_pack() {
    let table = SeparatorTable::v1();
    let config = DtcConfig::default();
    let input = generate_corpus(99, 2_000);

    let in_memory = pack(&input, &table, &config).unwrap();

    let frequencies = count_frequencies(Cursor::new(&input), &table, 37).unwrap();
    assert_eq!(frequencies.total(), in_memory.stats.total_words);
    let dictionary = allocate(&frequencies, &table, config.max_code_len).unwrap();
    assert_eq!(dictionary, in_memory.dictionary);

    let mut encoded: Vec<u8> = Vec::new();
    encode_stream(Cursor::new(&input), &mut encoded, &table, &dictionary, 37).unwrap();
    assert_eq!(encoded, in_memory.encoded);

    let mut decoded: Vec<u8> = Vec::new();
    decode_stream(Cursor::new(&encoded), &mut decoded, &table, &dictionary, 41).unwrap();
    assert_eq!(decoded, input);
}

#[test]
fn test_random_binary_input_roundtrips() {
    let table = SeparatorTable::v1();
    let mut rng = StdRng::seed_from_u64(2024);
    for _ in 0..20 {
        let len = rng.random_range(0..2_000);
        let input: Vec<u8> = (0..len).map(|_| rng.random::<u8>()).collect();
        let output = pack(&input, &table, &DtcConfig::default()).unwrap();
        assert_eq!(unpack(&output.encoded, &output.dictionary), input);
    }
}

#[test]
fn test_foreign_dictionary_escapes_unknown_words() {
    let table = SeparatorTable::v1();
    let tokens = tokenize(b"known words", &table);
    let dictionary = allocate(&FrequencyTable::from_tokens(&tokens), &table, 2).unwrap();

    let other = tokenize(b"known stranger", &table);
    let encoded = encode(&other, &dictionary);
    assert_eq!(unpack(&encoded, &dictionary), b"known stranger");
}
