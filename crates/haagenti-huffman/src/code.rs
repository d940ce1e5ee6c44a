//! Code assignment from the encoder tree.
//!
//! Codes are the raw root-to-leaf paths of the tree (left = 0, right = 1,
//! most significant bit first). They are not renumbered into canonical form,
//! so the symbol table has to carry each code explicitly.

use haagenti_core::{Error, Result};

use crate::tree::{HuffmanTree, Node};
use crate::{MAX_CODE_LENGTH, MAX_SYMBOLS};

/// A single symbol's code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct HuffmanCode {
    /// Code bits, right-aligned.
    pub code: u32,
    /// Number of bits in the code (1-32).
    pub num_bits: u8,
}

impl HuffmanCode {
    #[inline]
    pub const fn new(code: u32, num_bits: u8) -> Self {
        Self { code, num_bits }
    }

    /// Whether `self` is a bit-prefix of `other` (or equal to it).
    pub fn is_prefix_of(&self, other: &HuffmanCode) -> bool {
        if self.num_bits == 0 || self.num_bits > other.num_bits {
            return false;
        }
        let shift = other.num_bits - self.num_bits;
        (u64::from(other.code) >> shift) == u64::from(self.code)
    }
}

/// One entry of the serialized symbol table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolRecord {
    pub symbol: u8,
    pub code_length: u8,
    pub code: u32,
}

impl SymbolRecord {
    pub fn code(&self) -> HuffmanCode {
        HuffmanCode::new(self.code, self.code_length)
    }
}

/// Symbol -> code mapping for the whole byte alphabet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: [Option<HuffmanCode>; MAX_SYMBOLS],
    max_length: u8,
}

impl CodeTable {
    /// Walk `tree` and record the path to every leaf.
    ///
    /// Fails with `Unsupported` if any leaf sits deeper than 32 levels.
    pub fn from_tree(tree: &HuffmanTree) -> Result<Self> {
        let mut table = Self {
            codes: [None; MAX_SYMBOLS],
            max_length: 0,
        };

        match tree.root() {
            Node::Leaf { symbol, .. } => table.insert(*symbol, 0, 1)?,
            root => table.assign(root, 0, 0)?,
        }

        Ok(table)
    }

    fn assign(&mut self, node: &Node, code: u64, depth: u32) -> Result<()> {
        match node {
            Node::Leaf { symbol, .. } => self.insert(*symbol, code, depth),
            Node::Internal { left, right, .. } => {
                self.assign(left, code << 1, depth + 1)?;
                if let Some(right) = right {
                    self.assign(right, (code << 1) | 1, depth + 1)?;
                }
                Ok(())
            }
        }
    }

    fn insert(&mut self, symbol: u8, code: u64, depth: u32) -> Result<()> {
        if depth == 0 || depth > MAX_CODE_LENGTH as u32 {
            return Err(Error::Unsupported(format!(
                "code length {} for symbol {} outside 1..={}",
                depth, symbol, MAX_CODE_LENGTH
            )));
        }
        let num_bits = depth as u8;
        self.codes[symbol as usize] = Some(HuffmanCode::new(code as u32, num_bits));
        self.max_length = self.max_length.max(num_bits);
        Ok(())
    }

    /// Code for `symbol`, if it occurred in the input.
    #[inline]
    pub fn get(&self, symbol: u8) -> Option<HuffmanCode> {
        self.codes[symbol as usize]
    }

    /// Longest assigned code length in bits.
    pub fn max_length(&self) -> u8 {
        self.max_length
    }

    /// Number of symbols with a code.
    pub fn len(&self) -> usize {
        self.codes.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Assigned codes in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, HuffmanCode)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(s, c)| c.map(|c| (s as u8, c)))
    }

    /// Symbol table records, sorted by symbol value.
    pub fn records(&self) -> Vec<SymbolRecord> {
        self.iter()
            .map(|(symbol, c)| SymbolRecord {
                symbol,
                code_length: c.num_bits,
                code: c.code,
            })
            .collect()
    }

    /// Total payload size in bits for data with these frequencies.
    pub fn encoded_bits(&self, counts: &[u64; MAX_SYMBOLS]) -> u64 {
        self.iter()
            .map(|(s, c)| counts[s as usize] * u64::from(c.num_bits))
            .sum()
    }

    /// Check that no code is a prefix of another.
    pub fn is_prefix_free(&self) -> bool {
        let codes: Vec<HuffmanCode> = self.iter().map(|(_, c)| c).collect();
        codes.iter().enumerate().all(|(i, a)| {
            codes
                .iter()
                .enumerate()
                .all(|(j, b)| i == j || !a.is_prefix_of(b))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::FrequencyTable;

    fn table_for(data: &[u8]) -> CodeTable {
        let tree = HuffmanTree::build(&FrequencyTable::analyze(data)).unwrap();
        CodeTable::from_tree(&tree).unwrap()
    }

    #[test]
    fn test_skewed_codes() {
        let table = table_for(b"AAAABBBCCD");
        assert_eq!(table.get(b'A'), Some(HuffmanCode::new(0b0, 1)));
        assert_eq!(table.get(b'B'), Some(HuffmanCode::new(0b11, 2)));
        assert_eq!(table.get(b'D'), Some(HuffmanCode::new(0b100, 3)));
        assert_eq!(table.get(b'C'), Some(HuffmanCode::new(0b101, 3)));
        assert_eq!(table.max_length(), 3);
        assert!(table.is_prefix_free());
    }

    #[test]
    fn test_tie_break_changes_lengths() {
        // a,b merge into I(2); I(2) is taken before leaf c(2), so d(2) ends
        // up alone at depth 1. Leaf-first ordering would give four 2-bit codes.
        let table = table_for(b"abccdd");
        let lengths: Vec<u8> = [b'a', b'b', b'c', b'd']
            .iter()
            .map(|&s| table.get(s).unwrap().num_bits)
            .collect();
        assert_eq!(lengths, vec![3, 3, 2, 1]);
        assert_eq!(table.get(b'd'), Some(HuffmanCode::new(0b0, 1)));
        assert_eq!(table.get(b'c'), Some(HuffmanCode::new(0b11, 2)));
        assert_eq!(table.get(b'a'), Some(HuffmanCode::new(0b100, 3)));
        assert_eq!(table.get(b'b'), Some(HuffmanCode::new(0b101, 3)));
    }

    #[test]
    fn test_single_symbol_gets_one_bit() {
        let table = table_for(&[0x42; 1000]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(0x42), Some(HuffmanCode::new(0, 1)));
        assert_eq!(table.max_length(), 1);
    }

    #[test]
    fn test_uniform_alphabet_is_eight_bits() {
        let data: Vec<u8> = (0..=255u8).collect();
        let table = table_for(&data);
        assert_eq!(table.len(), 256);
        assert!(table.iter().all(|(_, c)| c.num_bits == 8));
        assert!(table.is_prefix_free());
    }

    #[test]
    fn test_records_sorted_by_symbol() {
        let table = table_for(b"zzzyyxwwwwwwww");
        let records = table.records();
        let symbols: Vec<u8> = records.iter().map(|r| r.symbol).collect();
        assert_eq!(symbols, vec![b'w', b'x', b'y', b'z']);
        for r in &records {
            assert_eq!(table.get(r.symbol), Some(r.code()));
        }
    }

    #[test]
    fn test_encoded_bits() {
        let freq = FrequencyTable::analyze(b"AAAABBBCCD");
        let tree = HuffmanTree::build(&freq).unwrap();
        let table = CodeTable::from_tree(&tree).unwrap();
        assert_eq!(table.encoded_bits(freq.counts()), 19);
    }

    #[test]
    fn test_depth_limit() {
        // Fibonacci weights produce a maximally skewed tree: n symbols -> depth n-1
        let mut counts = [0u64; MAX_SYMBOLS];
        let (mut a, mut b) = (1u64, 1u64);
        for slot in counts.iter_mut().take(34) {
            *slot = a;
            let next = a + b;
            a = b;
            b = next;
        }
        let tree = HuffmanTree::build(&FrequencyTable::from_counts(counts)).unwrap();
        let err = CodeTable::from_tree(&tree).unwrap_err();
        assert!(matches!(err, Error::Unsupported(_)));
    }

    #[test]
    fn test_prefix_relation() {
        let short = HuffmanCode::new(0b10, 2);
        assert!(short.is_prefix_of(&HuffmanCode::new(0b101, 3)));
        assert!(!short.is_prefix_of(&HuffmanCode::new(0b011, 3)));
        assert!(!HuffmanCode::new(0b101, 3).is_prefix_of(&short));
    }
}
