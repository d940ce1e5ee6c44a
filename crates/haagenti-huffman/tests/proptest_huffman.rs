//! Property-based tests for the Huffman codec.
//!
//! These tests verify properties that must hold for every input:
//! - compress/decompress roundtrip is exact
//! - generated codes are prefix-free
//! - output is deterministic
//! - lookup-table and tree-walk decoding agree
//! - any single-bit payload corruption is detected
//!
//! Run with: cargo test -p haagenti-huffman --test proptest_huffman

use proptest::prelude::*;
use proptest::sample::Index;

use haagenti_core::{Compressor, Decompressor, Error};
use haagenti_huffman::{
    compress, decompress, CodeTable, Container, DecodeStrategy, FrequencyTable, HuffmanCodec,
    HuffmanConfig, HuffmanTree,
};

/// Arbitrary bytes, including empty.
fn bytes_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..4096)
}

/// Bytes drawn from a small, skewed alphabet so codes have varied lengths.
fn skewed_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(
        prop_oneof![
            8 => Just(b'e'),
            4 => Just(b't'),
            2 => Just(b'a'),
            1 => 0u8..=255,
        ],
        1..2048,
    )
}

/// At least two distinct symbols, so every tree node has two children.
fn multi_symbol_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(0u8..12, 2..512)
        .prop_filter("needs two distinct symbols", |v| {
            v.iter().any(|&b| b != v[0])
        })
}

fn code_table(data: &[u8]) -> CodeTable {
    let tree = HuffmanTree::build(&FrequencyTable::analyze(data)).unwrap();
    CodeTable::from_tree(&tree).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        max_shrink_iters: 200,
        ..ProptestConfig::default()
    })]

    /// Property: decompress(compress(B)) == B.
    #[test]
    fn prop_roundtrip(data in bytes_strategy()) {
        let container = compress(&data).unwrap();
        prop_assert_eq!(decompress(&container).unwrap(), data);
    }

    /// Property: roundtrip through the serialized container.
    #[test]
    fn prop_roundtrip_serialized(data in skewed_strategy()) {
        let codec = HuffmanCodec::new();
        let bytes = codec.compress(&data).unwrap();
        prop_assert_eq!(codec.decompress(&bytes).unwrap(), data);
    }

    /// Property: no code is a bit-prefix of another.
    #[test]
    fn prop_prefix_free(data in skewed_strategy()) {
        let table = code_table(&data);
        prop_assert!(table.is_prefix_free());
        prop_assert!(table.max_length() <= 32);
    }

    /// Property: compressing twice yields byte-identical containers.
    #[test]
    fn prop_deterministic(data in bytes_strategy()) {
        let first = compress(&data).unwrap().to_bytes();
        let second = compress(&data).unwrap().to_bytes();
        prop_assert_eq!(first, second);
    }

    /// Property: both decoders produce the same bytes at every table width.
    #[test]
    fn prop_lookup_matches_tree_walk(data in skewed_strategy(), bits in 1u8..=16) {
        let container = compress(&data).unwrap();

        let walk = HuffmanCodec::with_config(HuffmanConfig::tree_walk());
        let table = HuffmanCodec::with_config(
            HuffmanConfig::default()
                .with_strategy(DecodeStrategy::LookupTable)
                .with_lookup_bits(bits),
        );

        let by_walk = walk.decompress_container(&container).unwrap();
        let by_table = table.decompress_container(&container).unwrap();
        prop_assert_eq!(&by_walk, &by_table);
        prop_assert_eq!(by_walk, data);
    }

    /// Property: payload length is the packed bit count rounded up to bytes.
    #[test]
    fn prop_payload_size(data in skewed_strategy()) {
        let table = code_table(&data);
        let bits = table.encoded_bits(FrequencyTable::analyze(&data).counts());
        let container = compress(&data).unwrap();
        prop_assert_eq!(container.header.compressed_size, bits.div_ceil(8));
        prop_assert_eq!(container.payload.len() as u64, container.header.compressed_size);
    }

    /// Property: records are sorted by symbol and agree with the header.
    #[test]
    fn prop_symbol_table_consistent(data in skewed_strategy()) {
        let container = compress(&data).unwrap();
        let symbols: Vec<u8> = container.symbols.iter().map(|r| r.symbol).collect();
        let mut sorted = symbols.clone();
        sorted.sort_unstable();
        sorted.dedup();
        prop_assert_eq!(&symbols, &sorted);
        prop_assert_eq!(container.symbols.len(), container.header.symbol_count as usize);

        let longest = container.symbols.iter().map(|r| r.code_length).max().unwrap_or(0);
        prop_assert_eq!(u16::from(longest), container.header.max_code_length);
    }

    /// Property: flipping any bit of the packed codes is reported as an error.
    #[test]
    fn prop_single_bit_flip_detected(data in multi_symbol_strategy(), flip in any::<Index>()) {
        let mut container = compress(&data).unwrap();

        // only bits that carry code data; trailing pad bits are never read
        let total_bits: u64 = data
            .iter()
            .map(|&b| {
                let record = container.symbols.iter().find(|r| r.symbol == b).unwrap();
                u64::from(record.code_length)
            })
            .sum();
        let bit = flip.index(total_bits as usize);
        container.payload[bit / 8] ^= 0x80 >> (bit % 8);

        for config in [HuffmanConfig::tree_walk(), HuffmanConfig::default()] {
            let result = HuffmanCodec::with_config(config).decompress_container(&container);
            prop_assert!(
                matches!(
                    result,
                    Err(Error::ChecksumMismatch { .. }) | Err(Error::TruncatedInput { .. })
                ),
                "bit {} flip was not detected: {:?}",
                bit,
                result.map(|v| v.len())
            );
        }
    }

    /// Property: any strict prefix of a container is rejected.
    #[test]
    fn prop_truncated_container_rejected(data in skewed_strategy(), cut in any::<Index>()) {
        let bytes = compress(&data).unwrap().to_bytes();
        let len = cut.index(bytes.len());
        prop_assert!(Container::from_bytes(&bytes[..len]).is_err());
    }
}
