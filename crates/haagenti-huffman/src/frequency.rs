//! Symbol frequency analysis.

use crate::MAX_SYMBOLS;

/// Per-symbol occurrence counts for one input buffer.
///
/// Built once per compression call and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; MAX_SYMBOLS],
    distinct: usize,
}

impl FrequencyTable {
    /// Count every byte of `data`.
    ///
    /// An empty buffer yields a table with zero distinct symbols; callers treat
    /// that as the degenerate empty-payload case rather than an error.
    pub fn analyze(data: &[u8]) -> Self {
        let counts = count_frequencies(data);
        let distinct = counts.iter().filter(|&&c| c > 0).count();
        Self { counts, distinct }
    }

    /// Build a table directly from counts.
    pub fn from_counts(counts: [u64; MAX_SYMBOLS]) -> Self {
        let distinct = counts.iter().filter(|&&c| c > 0).count();
        Self { counts, distinct }
    }

    /// Occurrences of `symbol`.
    #[inline]
    pub fn count(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    /// All 256 counts, indexed by symbol.
    pub fn counts(&self) -> &[u64; MAX_SYMBOLS] {
        &self.counts
    }

    /// Number of symbols with a non-zero count.
    pub fn distinct_symbols(&self) -> usize {
        self.distinct
    }

    /// Total number of bytes counted.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Whether no bytes were counted.
    pub fn is_empty(&self) -> bool {
        self.distinct == 0
    }

    /// Symbols with a non-zero count, in ascending symbol order.
    pub fn present(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c > 0)
            .map(|(s, &c)| (s as u8, c))
    }
}

/// Histogram with four interleaved count arrays.
///
/// Consecutive bytes land in different arrays so repeated symbols do not
/// serialize on a single counter.
fn count_frequencies(data: &[u8]) -> [u64; MAX_SYMBOLS] {
    let mut freq0 = [0u64; MAX_SYMBOLS];
    let mut freq1 = [0u64; MAX_SYMBOLS];
    let mut freq2 = [0u64; MAX_SYMBOLS];
    let mut freq3 = [0u64; MAX_SYMBOLS];

    let chunks = data.chunks_exact(8);
    let remainder = chunks.remainder();

    for chunk in chunks {
        freq0[chunk[0] as usize] += 1;
        freq1[chunk[1] as usize] += 1;
        freq2[chunk[2] as usize] += 1;
        freq3[chunk[3] as usize] += 1;
        freq0[chunk[4] as usize] += 1;
        freq1[chunk[5] as usize] += 1;
        freq2[chunk[6] as usize] += 1;
        freq3[chunk[7] as usize] += 1;
    }

    for &byte in remainder {
        freq0[byte as usize] += 1;
    }

    for i in 0..MAX_SYMBOLS {
        freq0[i] += freq1[i] + freq2[i] + freq3[i];
    }

    freq0
}
