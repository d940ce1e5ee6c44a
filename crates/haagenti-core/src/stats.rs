//! Statistics and metrics for compression operations.

use std::fmt;

/// Compression ratio metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionRatio {
    /// Original uncompressed size in bytes.
    pub original_size: u64,
    /// Compressed size in bytes, including all framing.
    pub compressed_size: u64,
}

impl CompressionRatio {
    /// Create new ratio from sizes.
    pub fn new(original: u64, compressed: u64) -> Self {
        CompressionRatio {
            original_size: original,
            compressed_size: compressed,
        }
    }

    /// Calculate ratio (original / compressed).
    /// Higher is better (more compression).
    pub fn ratio(&self) -> f64 {
        if self.compressed_size == 0 {
            return 0.0;
        }
        self.original_size as f64 / self.compressed_size as f64
    }

    /// Calculate space savings as percentage. Negative when output grew.
    pub fn savings_percent(&self) -> f64 {
        if self.original_size == 0 {
            return 0.0;
        }
        (1.0 - (self.compressed_size as f64 / self.original_size as f64)) * 100.0
    }

    /// Calculate bytes saved.
    pub fn bytes_saved(&self) -> i64 {
        self.original_size as i64 - self.compressed_size as i64
    }

    /// Check if compression was effective (saved space).
    pub fn is_effective(&self) -> bool {
        self.compressed_size < self.original_size
    }
}

/// Statistics from a single compression/decompression operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompressionStats {
    /// Original (uncompressed) size in bytes.
    pub original_size: u64,

    /// Compressed size in bytes, including header and symbol table.
    pub compressed_size: u64,

    /// Time taken in microseconds.
    pub time_us: u64,

    /// Number of distinct symbols in the input.
    pub distinct_symbols: usize,

    /// Longest code length in bits.
    pub max_code_length: u8,

    /// CRC-32 of the original data.
    pub checksum: Option<u32>,
}

impl CompressionStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create stats from a completed operation.
    pub fn from_operation(original_size: u64, compressed_size: u64, time_us: u64) -> Self {
        CompressionStats {
            original_size,
            compressed_size,
            time_us,
            ..Default::default()
        }
    }

    /// Get compression ratio.
    pub fn ratio(&self) -> CompressionRatio {
        CompressionRatio::new(self.original_size, self.compressed_size)
    }

    /// Get throughput in bytes per second.
    pub fn throughput_bps(&self) -> f64 {
        if self.time_us == 0 {
            return 0.0;
        }
        self.original_size as f64 * 1_000_000.0 / self.time_us as f64
    }

    /// Get throughput in MB/s.
    pub fn throughput_mbs(&self) -> f64 {
        self.throughput_bps() / 1_000_000.0
    }

    /// Get space savings as percentage.
    pub fn savings_percent(&self) -> f64 {
        self.ratio().savings_percent()
    }
}

impl fmt::Display for CompressionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.original_size == 0 {
            return write!(f, "original size: 0 bytes");
        }
        write!(
            f,
            "original size: {} bytes, compressed size: {} bytes, ratio: {:.2}:1, savings: {:.1}%",
            self.original_size,
            self.compressed_size,
            self.ratio().ratio(),
            self.savings_percent(),
        )
    }
}

/// Metrics collector for aggregate statistics.
#[derive(Debug, Clone, Default)]
pub struct Metrics {
    /// Total operations performed.
    pub total_operations: u64,

    /// Total bytes consumed.
    pub total_bytes_in: u64,

    /// Total bytes produced.
    pub total_bytes_out: u64,

    /// Total time spent in microseconds.
    pub total_time_us: u64,

    /// Number of errors encountered.
    pub error_count: u64,
}

impl Metrics {
    /// Create new metrics collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed operation.
    pub fn record(&mut self, stats: &CompressionStats) {
        self.total_operations += 1;
        self.total_bytes_in += stats.original_size;
        self.total_bytes_out += stats.compressed_size;
        self.total_time_us += stats.time_us;
    }

    /// Record a failed operation.
    pub fn record_error(&mut self) {
        self.total_operations += 1;
        self.error_count += 1;
    }

    /// Get average compression ratio.
    pub fn average_ratio(&self) -> f64 {
        if self.total_bytes_out == 0 {
            return 1.0;
        }
        self.total_bytes_in as f64 / self.total_bytes_out as f64
    }

    /// Get average throughput in MB/s.
    pub fn average_throughput_mbs(&self) -> f64 {
        if self.total_time_us == 0 {
            return 0.0;
        }
        self.total_bytes_in as f64 / self.total_time_us as f64
    }

    /// Get error rate (0.0 to 1.0).
    pub fn error_rate(&self) -> f64 {
        if self.total_operations == 0 {
            return 0.0;
        }
        self.error_count as f64 / self.total_operations as f64
    }

    /// Reset all metrics.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Get metrics summary as string.
    pub fn summary(&self) -> String {
        format!(
            "Operations: {}, Bytes: {} -> {} (ratio: {:.2}x), Throughput: {:.1} MB/s, Errors: {}",
            self.total_operations,
            self.total_bytes_in,
            self.total_bytes_out,
            self.average_ratio(),
            self.average_throughput_mbs(),
            self.error_count,
        )
    }
}
