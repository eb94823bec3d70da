//! Round-trip and code-shape properties of the codec.

use proptest::prelude::*;

use huffzip::engine::bits::{pack, unpack};
use huffzip::engine::codes::CodeTable;
use huffzip::engine::tree::HuffmanTree;
use huffzip::{compress, decompress, FrequencyTable};

fn round_trip(input: &[u8]) -> Vec<u8> {
    let container = compress(input).unwrap().to_bytes();
    decompress(&container).unwrap()
}

#[test]
fn empty_input_round_trips() {
    assert_eq!(round_trip(&[]), Vec::<u8>::new());
}

#[test]
fn single_byte_round_trips() {
    assert_eq!(round_trip(&[0x42]), vec![0x42]);
}

#[test]
fn full_alphabet_round_trips() {
    let input: Vec<u8> = (0..=255u8).cycle().take(256 * 5 + 17).collect();
    assert_eq!(round_trip(&input), input);
}

#[test]
fn skewed_distribution_round_trips_and_shrinks() {
    let mut input = vec![b'e'; 50_000];
    input.extend(std::iter::repeat(b't').take(20_000));
    input.extend((0..=255u8).cycle().take(3_000));

    let container = compress(&input).unwrap();
    assert!(container.encoded_len() < input.len() / 2);
    assert_eq!(decompress(&container.to_bytes()).unwrap(), input);
}

#[test]
fn fibonacci_weights_build_deep_tree() {
    let mut counts = [0u64; 256];
    let (mut a, mut b) = (1u64, 1u64);
    for count in counts.iter_mut().take(40) {
        *count = a;
        (a, b) = (b, a + b);
    }
    let freqs = FrequencyTable::from_counts(counts);
    let tree = HuffmanTree::build(&freqs).unwrap();
    assert_eq!(tree.depth(), 39);

    let codes = CodeTable::from_tree(&tree);
    assert_eq!(codes.len(), 40);
    assert_eq!(codes.get(0).unwrap().len(), 39);
}

#[test]
fn stored_table_sums_to_input_length() {
    let input = b"mississippi river";
    let container = compress(input).unwrap();
    assert_eq!(container.header.frequencies.total(), Some(input.len() as u64));
    assert_eq!(container.header.symbol_count(), input.len() as u64);
}

fn prefix_free(codes: &CodeTable) -> bool {
    let all: Vec<&[bool]> = codes.entries().map(|(_, code)| code).collect();
    all.iter().enumerate().all(|(i, a)| {
        all.iter()
            .enumerate()
            .all(|(j, b)| i == j || !b.starts_with(a))
    })
}

proptest! {
    #[test]
    fn prop_round_trip(input in prop::collection::vec(any::<u8>(), 0..4096)) {
        prop_assert_eq!(round_trip(&input), input);
    }

    #[test]
    fn prop_round_trip_small_alphabet(input in prop::collection::vec(0u8..3, 0..2048)) {
        prop_assert_eq!(round_trip(&input), input);
    }

    #[test]
    fn prop_repeated_byte(byte in any::<u8>(), len in 1usize..5000) {
        let input = vec![byte; len];
        let container = compress(&input).unwrap();
        prop_assert_eq!(container.payload.len(), len.div_ceil(8));
        prop_assert_eq!(decompress(&container.to_bytes()).unwrap(), input);
    }

    #[test]
    fn prop_codes_are_prefix_free(counts in prop::collection::vec(0u64..1000, 256)) {
        let mut table = [0u64; 256];
        table.copy_from_slice(&counts);
        let freqs = FrequencyTable::from_counts(table);

        if let Some(tree) = HuffmanTree::build(&freqs) {
            let codes = CodeTable::from_tree(&tree);
            prop_assert_eq!(codes.len(), freqs.distinct());
            prop_assert!(prefix_free(&codes));
        } else {
            prop_assert!(freqs.is_empty());
        }
    }

    #[test]
    fn prop_tree_is_deterministic(counts in prop::collection::vec(prop_oneof![Just(0u64), Just(5u64), Just(10u64)], 256)) {
        let mut table = [0u64; 256];
        table.copy_from_slice(&counts);
        let freqs = FrequencyTable::from_counts(table);

        let first = HuffmanTree::build(&freqs);
        let second = HuffmanTree::build(&freqs);
        prop_assert_eq!(&first, &second);
        if let (Some(a), Some(b)) = (first, second) {
            prop_assert_eq!(CodeTable::from_tree(&a), CodeTable::from_tree(&b));
        }
    }

    #[test]
    fn prop_lower_frequency_never_shorter(input in prop::collection::vec(any::<u8>(), 1..2048)) {
        let freqs = FrequencyTable::from_bytes(&input);
        let codes = CodeTable::from_tree(&HuffmanTree::build(&freqs).unwrap());

        for (a, code_a) in codes.entries() {
            for (b, code_b) in codes.entries() {
                if freqs.get(a) < freqs.get(b) {
                    prop_assert!(code_a.len() >= code_b.len());
                }
            }
        }
    }

    #[test]
    fn prop_unpack_inverts_pack(bits in prop::collection::vec(any::<bool>(), 0..512)) {
        let packed = pack(bits.iter().copied());
        prop_assert_eq!(packed.len(), bits.len().div_ceil(8));

        let mut expected = bits.clone();
        expected.resize(packed.len() * 8, false);
        prop_assert_eq!(unpack(&packed), expected);
    }
}
