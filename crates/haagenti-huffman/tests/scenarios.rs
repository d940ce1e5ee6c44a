//! Concrete end-to-end scenarios.

use haagenti_core::{Codec, Compressor, Decompressor, Error, Metrics};
use haagenti_huffman::{
    compress, compress_block, decompress, decompress_block, Container, HuffmanCodec,
    HuffmanConfig, SymbolRecord, HEADER_SIZE, SYMBOL_RECORD_SIZE,
};

#[test]
fn skewed_ten_bytes() {
    let data = b"AAAABBBCCD";
    let container = compress(data).unwrap();

    assert_eq!(container.header.original_size, 10);
    assert!(container.header.compressed_size < 10);
    assert_eq!(container.payload, vec![0x0F, 0xED, 0x80]);

    let records: Vec<(u8, u8, u32)> = container
        .symbols
        .iter()
        .map(|r| (r.symbol, r.code_length, r.code))
        .collect();
    assert_eq!(
        records,
        vec![
            (b'A', 1, 0b0),
            (b'B', 2, 0b11),
            (b'C', 3, 0b101),
            (b'D', 3, 0b100),
        ]
    );

    assert_eq!(decompress(&container).unwrap(), data);
}

#[test]
fn thousand_identical_bytes() {
    let data = vec![0xAB; 1000];
    let container = compress(&data).unwrap();
    assert_eq!(container.symbols.len(), 1);
    assert_eq!(container.symbols[0].code_length, 1);
    assert_eq!(container.header.compressed_size, 125);
    assert_eq!(decompress(&container).unwrap(), data);
}

#[test]
fn every_byte_once() {
    let data: Vec<u8> = (0..=255u8).collect();
    let codec = HuffmanCodec::new();
    let bytes = codec.compress(&data).unwrap();

    // worst case: the table costs more than it saves
    assert_eq!(bytes.len(), HEADER_SIZE + 256 * SYMBOL_RECORD_SIZE + 256);
    assert!(!codec.measure_ratio(&data).unwrap().is_effective());
    assert_eq!(codec.decompress(&bytes).unwrap(), data);
}

#[test]
fn text_compresses() {
    let text = b"It was the best of times, it was the worst of times, it was the age of \
                 wisdom, it was the age of foolishness, it was the epoch of belief, it was \
                 the epoch of incredulity."
        .repeat(16);
    let codec = HuffmanCodec::new();
    let ratio = codec.measure_ratio(&text).unwrap();
    assert!(ratio.ratio() > 1.3, "ratio {}", ratio.ratio());
    assert!(codec.verify_roundtrip(&text).unwrap());
}

#[test]
fn block_api_roundtrip() {
    let data = b"block level entry points skip the framing".repeat(4);
    let (payload, symbols) = compress_block(&data).unwrap();
    let restored = decompress_block(&payload, &symbols, data.len() as u64).unwrap();
    assert_eq!(restored, data);
}

#[test]
fn block_api_reads_unsorted_table() {
    let (payload, mut symbols) = compress_block(b"AAAABBBCCD").unwrap();
    symbols.reverse();
    assert_eq!(
        decompress_block(&payload, &symbols, 10).unwrap(),
        b"AAAABBBCCD"
    );
}

#[test]
fn mismatched_table_is_malformed() {
    let (payload, _) = compress_block(b"AAAABBBCCD").unwrap();
    // a table with no path starting with 1
    let symbols = [SymbolRecord {
        symbol: b'A',
        code_length: 1,
        code: 0,
    }];
    let err = decompress_block(&payload, &symbols, 10).unwrap_err();
    assert!(matches!(err, Error::MalformedTree { .. }));
}

#[test]
fn corrupted_container_bytes() {
    let codec = HuffmanCodec::new();
    let mut bytes = codec.compress(b"some data worth protecting").unwrap();

    let mut bad_magic = bytes.clone();
    bad_magic[1] ^= 0x20;
    assert!(codec.decompress(&bad_magic).unwrap_err().is_corruption());

    // checksum field lives in the last four header bytes
    bytes[HEADER_SIZE - 1] ^= 0x01;
    let err = codec.decompress(&bytes).unwrap_err();
    assert!(matches!(err, Error::ChecksumMismatch { .. }));
    assert_eq!(err.category(), "checksum_mismatch");
}

#[test]
fn reserved_flags_roundtrip() {
    let mut container = compress(b"flags").unwrap();
    container.header.flags = 0x0102;
    let parsed = Container::from_bytes(&container.to_bytes()).unwrap();
    assert_eq!(parsed.header.flags, 0x0102);
    assert_eq!(decompress(&parsed).unwrap(), b"flags");
}

#[test]
fn checksum_skip_still_checks_structure() {
    let codec = HuffmanCodec::with_config(HuffmanConfig::default().with_checksum(false));
    let mut container = compress(b"AAAABBBCCD").unwrap();
    container.payload.truncate(1);
    container.header.compressed_size = 1;
    let err = codec.decompress_container(&container).unwrap_err();
    assert!(matches!(err, Error::TruncatedInput { .. }));
}

#[test]
fn metrics_over_many_operations() {
    let codec = HuffmanCodec::new();
    let mut metrics = Metrics::new();
    for n in [10usize, 100, 1000] {
        let data = b"abcabcabd".repeat(n);
        let ratio = codec.measure_ratio(&data).unwrap();
        let stats = haagenti_core::CompressionStats::from_operation(
            ratio.original_size,
            ratio.compressed_size,
            1,
        );
        metrics.record(&stats);
    }
    assert_eq!(metrics.total_operations, 3);
    assert_eq!(metrics.error_count, 0);
    assert!(metrics.average_ratio() > 1.0);
}
