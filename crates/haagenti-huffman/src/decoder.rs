//! Symbol decoding.
//!
//! The decompression side never sees frequencies. It rebuilds a binary trie
//! from the stored `(symbol, code, length)` records and walks it bit by bit.
//! [`LookupDecoder`](crate::table::LookupDecoder) layers a direct-indexed
//! table on top and falls back to the walk for codes longer than the table.
//!
//! Decoding is always bounded by the expected symbol count: the writer pads
//! the final byte with zero bits, and those must never be read as symbols.

use serde::{Deserialize, Serialize};

use haagenti_core::{Error, Result};

use crate::bitstream::BitReader;
use crate::code::SymbolRecord;
use crate::table::LookupDecoder;
use crate::{MAX_CODE_LENGTH, MAX_SYMBOLS};

const ROOT: usize = 0;

/// Which decoder to run over the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodeStrategy {
    /// Bit-by-bit trie walk.
    TreeWalk,
    /// Direct lookup table with tree-walk fallback for long codes.
    #[default]
    LookupTable,
}

/// Decodes one symbol at a time from a bitstream.
pub trait SymbolDecoder {
    /// Decode the next symbol.
    ///
    /// Returns `Ok(None)` when the stream runs out before a full code was
    /// read, and `MalformedTree` when the bits follow a path the table does
    /// not define.
    fn decode_one(&self, reader: &mut BitReader<'_>) -> Result<Option<u8>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeNode {
    Branch { children: [Option<u32>; 2] },
    Leaf { symbol: u8 },
}

/// Decode trie rebuilt from a symbol table, stored as an index-linked arena.
#[derive(Debug, Clone)]
pub struct DecodeTree {
    nodes: Vec<DecodeNode>,
    leaves: usize,
    max_depth: u8,
}

impl DecodeTree {
    /// Insert every record's code as a root-to-leaf path.
    ///
    /// Rejects zero or over-long lengths, codes wider than their length,
    /// duplicate symbols, and any code that is a prefix of (or extends)
    /// another.
    pub fn from_records(records: &[SymbolRecord]) -> Result<Self> {
        if records.len() > MAX_SYMBOLS {
            return Err(Error::malformed_tree(format!(
                "{} symbol records exceed the byte alphabet",
                records.len()
            )));
        }

        let mut tree = Self {
            nodes: Vec::with_capacity(records.len() * 2),
            leaves: 0,
            max_depth: 0,
        };
        tree.nodes.push(DecodeNode::Branch {
            children: [None, None],
        });

        let mut seen = [false; MAX_SYMBOLS];
        for record in records {
            if std::mem::replace(&mut seen[record.symbol as usize], true) {
                return Err(Error::malformed_tree(format!(
                    "symbol {} listed twice",
                    record.symbol
                )));
            }
            tree.insert(record)?;
        }

        Ok(tree)
    }

    fn insert(&mut self, record: &SymbolRecord) -> Result<()> {
        let len = record.code_length;
        if len == 0 || len > MAX_CODE_LENGTH {
            return Err(Error::malformed_tree(format!(
                "symbol {} has code length {}",
                record.symbol, len
            )));
        }
        if u64::from(record.code) >> len != 0 {
            return Err(Error::malformed_tree(format!(
                "code {:#x} for symbol {} does not fit in {} bits",
                record.code, record.symbol, len
            )));
        }

        let mut index = ROOT;
        for bit_pos in (0..len).rev() {
            let bit = ((record.code >> bit_pos) & 1) as usize;
            let last = bit_pos == 0;

            let DecodeNode::Branch { children } = self.nodes[index] else {
                return Err(Error::malformed_tree(format!(
                    "code for symbol {} passes through another symbol's leaf",
                    record.symbol
                )));
            };

            index = match children[bit] {
                Some(_) if last => {
                    return Err(Error::malformed_tree(format!(
                        "code for symbol {} collides with an existing path",
                        record.symbol
                    )));
                }
                Some(child) => child as usize,
                None => {
                    let node = if last {
                        DecodeNode::Leaf {
                            symbol: record.symbol,
                        }
                    } else {
                        DecodeNode::Branch {
                            children: [None, None],
                        }
                    };
                    let child = self.nodes.len();
                    self.nodes.push(node);
                    if let DecodeNode::Branch { children } = &mut self.nodes[index] {
                        children[bit] = Some(child as u32);
                    }
                    child
                }
            };
        }

        self.leaves += 1;
        self.max_depth = self.max_depth.max(len);
        Ok(())
    }

    /// Number of symbols in the trie.
    pub fn leaf_count(&self) -> usize {
        self.leaves
    }

    /// Longest code in the trie.
    pub fn max_depth(&self) -> u8 {
        self.max_depth
    }

    /// Visit every leaf with its code and depth.
    pub fn for_each_leaf(&self, mut visit: impl FnMut(u8, u32, u8)) {
        let mut stack = vec![(ROOT, 0u32, 0u8)];
        while let Some((index, code, depth)) = stack.pop() {
            match self.nodes[index] {
                DecodeNode::Leaf { symbol } => visit(symbol, code, depth),
                DecodeNode::Branch { children } => {
                    for (bit, child) in children.iter().enumerate() {
                        if let Some(child) = child {
                            let next = ((u64::from(code) << 1) | bit as u64) as u32;
                            stack.push((*child as usize, next, depth + 1));
                        }
                    }
                }
            }
        }
    }
}

impl SymbolDecoder for DecodeTree {
    #[inline]
    fn decode_one(&self, reader: &mut BitReader<'_>) -> Result<Option<u8>> {
        let mut index = ROOT;
        loop {
            match self.nodes[index] {
                DecodeNode::Leaf { symbol } => return Ok(Some(symbol)),
                DecodeNode::Branch { children } => {
                    if !reader.has_data() {
                        return Ok(None);
                    }
                    let bit = reader.read_bit() as usize;
                    index = children[bit]
                        .ok_or_else(|| Error::malformed_tree("bitstream follows an undefined code"))?
                        as usize;
                }
            }
        }
    }
}

/// Decode exactly `expected` symbols.
///
/// Running out of bits first is `TruncatedInput`; trailing bits after the
/// last expected symbol are ignored.
pub fn decode_symbols<D>(decoder: &D, reader: &mut BitReader<'_>, expected: usize) -> Result<Vec<u8>>
where
    D: SymbolDecoder + ?Sized,
{
    let mut output = Vec::new();
    output
        .try_reserve_exact(expected)
        .map_err(|_| Error::allocation_failed(expected))?;

    while output.len() < expected {
        match decoder.decode_one(reader)? {
            Some(symbol) => output.push(symbol),
            None => return Err(Error::truncated(output.len(), expected)),
        }
    }

    Ok(output)
}

/// Decode `expected` symbols from `payload` with the chosen strategy.
pub fn decode(
    tree: &DecodeTree,
    payload: &[u8],
    expected: usize,
    strategy: DecodeStrategy,
    lookup_bits: u8,
) -> Result<Vec<u8>> {
    let mut reader = BitReader::new(payload);
    match strategy {
        DecodeStrategy::TreeWalk => decode_symbols(tree, &mut reader, expected),
        DecodeStrategy::LookupTable => {
            let decoder = LookupDecoder::new(tree, lookup_bits)?;
            decode_symbols(&decoder, &mut reader, expected)
        }
    }
}
