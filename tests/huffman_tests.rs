// Integration tests for the Huffman engine

use dsviz::huffman::{frequencies, HuffmanEngine, StepKind};
use dsviz::snapshot::Traced;
use proptest::prelude::*;

#[test]
fn test_codes_for_skewed_text() {
    let mut huffman = HuffmanEngine::new();
    assert!(huffman.encode("aabbbc"));
    assert_eq!(huffman.code_for('b'), Some("1"));
    assert_eq!(huffman.code_for('a'), Some("01"));
    assert_eq!(huffman.code_for('c'), Some("00"));

    let bits = huffman.encode_text("abc").unwrap();
    assert_eq!(bits, "01100");
    assert_eq!(huffman.decode(&bits).as_deref(), Some("abc"));
}

#[test]
fn test_single_symbol_gets_code_zero() {
    let mut huffman = HuffmanEngine::new();
    assert!(huffman.encode("zzzz"));
    assert_eq!(huffman.codes(), &[('z', "0".to_string())]);
    assert_eq!(huffman.decode("000").as_deref(), Some("zzz"));
}

#[test]
fn test_trace_moves_through_the_three_stages() {
    let mut huffman = HuffmanEngine::new();
    huffman.encode("hello");
    let kinds: Vec<StepKind> = huffman.replay().steps().iter().map(|s| s.state.kind).collect();

    assert_eq!(kinds.first(), Some(&StepKind::BuildQueue));
    assert_eq!(kinds.last(), Some(&StepKind::AssignCodes));
    let first_merge = kinds.iter().position(|k| *k == StepKind::MergeNodes).unwrap();
    let first_assign = kinds.iter().position(|k| *k == StepKind::AssignCodes).unwrap();
    assert!(first_merge < first_assign);
    assert!(!huffman.replay().in_flight());
}

#[test]
fn test_compression_stats() {
    let mut huffman = HuffmanEngine::new();
    huffman.encode("aabbbc");
    let stats = huffman.compression_stats().unwrap();
    assert_eq!(stats.original_bits, 48);
    assert_eq!(stats.compressed_bits, 9);
    assert!((stats.average_code_length - 1.5).abs() < 1e-9);
}

#[test]
fn test_blank_input_is_ignored() {
    let mut huffman = HuffmanEngine::new();
    assert!(!huffman.encode("   "));
    assert!(huffman.tree().is_none());
    assert!(huffman.compression_stats().is_none());
    assert_eq!(frequencies("abca"), vec![('a', 2), ('b', 1), ('c', 1)]);
}

proptest! {
    #[test]
    fn round_trip_and_prefix_free(text in "[a-f]{1,60}") {
        let mut huffman = HuffmanEngine::new();
        prop_assert!(huffman.encode(&text));

        let bits = huffman.encode_text(&text).unwrap();
        prop_assert_eq!(huffman.decode(&bits), Some(text.clone()));

        let codes = huffman.codes();
        for (i, (_, a)) in codes.iter().enumerate() {
            for (j, (_, b)) in codes.iter().enumerate() {
                if i != j {
                    prop_assert!(!b.starts_with(a.as_str()));
                }
            }
        }

        let stats = huffman.compression_stats().unwrap();
        prop_assert!(stats.average_code_length <= 8.0);
    }
}
