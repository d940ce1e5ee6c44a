//! # Haagenti Core
//!
//! Core traits, error type, and statistics shared by the Haagenti codecs.
//!
//! Haagenti is named after the 48th demon of the Ars Goetia, who transmutes
//! substances into more valuable forms - just as compression transforms data
//! into denser representations.
//!
//! ## Core Traits
//!
//! - [`Compressor`] - One-shot compression operations
//! - [`Decompressor`] - One-shot decompression operations
//! - [`Codec`] - Combined compress/decompress capability
//!
//! ## Example
//!
//! ```ignore
//! use haagenti_core::Codec;
//! use haagenti_huffman::HuffmanCodec;
//!
//! let codec = HuffmanCodec::new();
//! let compressed = codec.compress(data)?;
//! let original = codec.decompress(&compressed)?;
//! ```

pub mod error;
pub mod stats;
pub mod traits;

pub use error::{Error, Result};
pub use stats::{CompressionRatio, CompressionStats, Metrics};
pub use traits::{Codec, Compressor, Decompressor};
