//! Table-driven decoding.
//!
//! A table indexed by the next `K` bits of the stream resolves every code of
//! length `<= K` in a single peek. Each code of length `d` owns the
//! `2^(K-d)` consecutive slots that share its prefix. Slots no short code
//! claims stay empty and send the decoder back to the tree walk, as does a
//! peek that finds fewer than `K` bits left near the end of the stream.

use haagenti_core::{Error, Result};

use crate::bitstream::BitReader;
use crate::decoder::{DecodeTree, SymbolDecoder};

/// Smallest accepted table width.
pub const MIN_LOOKUP_BITS: u8 = 1;
/// Largest accepted table width (64K entries).
pub const MAX_LOOKUP_BITS: u8 = 16;

/// One table slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LookupEntry {
    pub symbol: u8,
    /// Length of the code resolved by this slot; 0 means no short code matches.
    pub num_bits: u8,
}

impl LookupEntry {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.num_bits == 0
    }
}

/// Direct lookup table over the first `bits` bits of a code.
#[derive(Debug, Clone)]
pub struct LookupTable {
    entries: Vec<LookupEntry>,
    bits: u8,
}

impl LookupTable {
    /// Fill a `2^bits` table from every leaf of `tree` no deeper than `bits`.
    pub fn build(tree: &DecodeTree, bits: u8) -> Result<Self> {
        if !(MIN_LOOKUP_BITS..=MAX_LOOKUP_BITS).contains(&bits) {
            return Err(Error::invalid_input(format!(
                "lookup table width {} outside {}..={}",
                bits, MIN_LOOKUP_BITS, MAX_LOOKUP_BITS
            )));
        }

        let mut entries = vec![LookupEntry::default(); 1usize << bits];
        tree.for_each_leaf(|symbol, code, depth| {
            if depth > bits {
                return;
            }
            let shift = bits - depth;
            let start = (code as usize) << shift;
            let entry = LookupEntry {
                symbol,
                num_bits: depth,
            };
            entries[start..start + (1usize << shift)].fill(entry);
        });

        Ok(Self { entries, bits })
    }

    /// Table width in bits.
    #[inline]
    pub fn bits(&self) -> u8 {
        self.bits
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Slot for a `bits`-wide index.
    #[inline]
    pub fn get(&self, index: u32) -> LookupEntry {
        self.entries[index as usize]
    }

    /// Fraction of slots that resolve a symbol directly.
    pub fn coverage(&self) -> f64 {
        let filled = self.entries.iter().filter(|e| !e.is_empty()).count();
        filled as f64 / self.entries.len() as f64
    }
}

/// Lookup-table decoder with tree-walk fallback.
///
/// Produces exactly the same symbols as walking `tree` directly.
#[derive(Debug, Clone)]
pub struct LookupDecoder<'t> {
    tree: &'t DecodeTree,
    table: LookupTable,
}

impl<'t> LookupDecoder<'t> {
    pub fn new(tree: &'t DecodeTree, bits: u8) -> Result<Self> {
        Ok(Self {
            tree,
            table: LookupTable::build(tree, bits)?,
        })
    }

    pub fn table(&self) -> &LookupTable {
        &self.table
    }
}

impl SymbolDecoder for LookupDecoder<'_> {
    #[inline]
    fn decode_one(&self, reader: &mut BitReader<'_>) -> Result<Option<u8>> {
        if let Some(index) = reader.peek_bits(self.table.bits) {
            let entry = self.table.get(index);
            if !entry.is_empty() {
                reader.skip_bits(entry.num_bits);
                return Ok(Some(entry.symbol));
            }
        }
        self.tree.decode_one(reader)
    }
}
