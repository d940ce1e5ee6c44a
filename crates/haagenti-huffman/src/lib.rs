//! # Haagenti Huffman
//!
//! Byte-oriented Huffman compression with a self-describing container.
//!
//! Compression counts byte frequencies, builds a Huffman tree with a fixed
//! tie-break rule, assigns each byte the raw root-to-leaf path as its code,
//! and packs codes MSB-first. The container stores the code table and a
//! CRC-32 of the original bytes, so decompression needs no outside state.
//!
//! ## Usage
//!
//! ```
//! use haagenti_core::{Compressor, Decompressor};
//! use haagenti_huffman::HuffmanCodec;
//!
//! let codec = HuffmanCodec::new();
//! let data = b"AAAABBBCCD";
//! let compressed = codec.compress(data).unwrap();
//! let restored = codec.decompress(&compressed).unwrap();
//! assert_eq!(restored, data);
//! ```
//!
//! Lower-level entry points work on the pieces directly:
//!
//! ```
//! use haagenti_huffman::{compress_block, decompress_block};
//!
//! let (payload, symbols) = compress_block(b"AAAABBBCCD").unwrap();
//! assert_eq!(payload, [0x0F, 0xED, 0x80]);
//! assert_eq!(decompress_block(&payload, &symbols, 10).unwrap(), b"AAAABBBCCD");
//! ```
//!
//! ## Decoding
//!
//! Two decoders produce identical output:
//!
//! - [`DecodeStrategy::TreeWalk`] walks the rebuilt code trie one bit at a time.
//! - [`DecodeStrategy::LookupTable`] (default) resolves codes up to
//!   [`HuffmanConfig::lookup_bits`] long with one table probe and walks the
//!   trie for the rest.

pub mod bitstream;
pub mod code;
pub mod codec;
pub mod config;
pub mod container;
pub mod decoder;
pub mod file;
pub mod frequency;
pub mod table;
pub mod tree;

/// Size of the byte alphabet.
pub const MAX_SYMBOLS: usize = 256;

/// Longest code the container and bit I/O can carry.
pub const MAX_CODE_LENGTH: u8 = 32;

/// Default lookup table width (4096 entries).
pub const DEFAULT_LOOKUP_BITS: u8 = 12;

pub use bitstream::{BitReader, BitWriter};
pub use code::{CodeTable, HuffmanCode, SymbolRecord};
pub use codec::{compress, compress_block, decompress, decompress_block, HuffmanCodec};
pub use config::HuffmanConfig;
pub use container::{Container, ContainerHeader, HEADER_SIZE, MAGIC, SYMBOL_RECORD_SIZE, VERSION};
pub use decoder::{DecodeStrategy, DecodeTree, SymbolDecoder};
pub use file::{compress_file, decompress_file, validate_container, validate_file};
pub use frequency::FrequencyTable;
pub use table::{LookupDecoder, LookupTable};
pub use tree::HuffmanTree;

pub use haagenti_core::{Error, Result};
