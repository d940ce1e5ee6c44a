//! Codec configuration.

use serde::{Deserialize, Serialize};

use haagenti_core::{Error, Result};

use crate::decoder::DecodeStrategy;
use crate::table::{MAX_LOOKUP_BITS, MIN_LOOKUP_BITS};
use crate::DEFAULT_LOOKUP_BITS;

/// Decompression settings. Compression output does not depend on any of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HuffmanConfig {
    /// Width of the direct decode table in bits (1-16)
    pub lookup_bits: u8,
    /// Decoder used for the payload
    pub strategy: DecodeStrategy,
    /// Compare the CRC-32 of decoded bytes with the header
    pub verify_checksum: bool,
}

impl Default for HuffmanConfig {
    fn default() -> Self {
        Self {
            lookup_bits: DEFAULT_LOOKUP_BITS,
            strategy: DecodeStrategy::LookupTable,
            verify_checksum: true,
        }
    }
}

impl HuffmanConfig {
    /// Pure tree-walk decoding.
    pub fn tree_walk() -> Self {
        Self {
            strategy: DecodeStrategy::TreeWalk,
            ..Self::default()
        }
    }

    pub fn with_lookup_bits(mut self, bits: u8) -> Self {
        self.lookup_bits = bits;
        self
    }

    pub fn with_strategy(mut self, strategy: DecodeStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_checksum(mut self, verify: bool) -> Self {
        self.verify_checksum = verify;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !(MIN_LOOKUP_BITS..=MAX_LOOKUP_BITS).contains(&self.lookup_bits) {
            return Err(Error::invalid_input(format!(
                "lookup_bits must be in {}..={}, got {}",
                MIN_LOOKUP_BITS, MAX_LOOKUP_BITS, self.lookup_bits
            )));
        }
        Ok(())
    }
}
