//! Error types for compression operations.

use thiserror::Error;

/// Result type alias for compression operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Compression error types.
#[derive(Debug, Error)]
pub enum Error {
    /// Input buffer is empty or otherwise unusable for the requested operation.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Container framing is corrupted or inconsistent.
    #[error("corrupted data: {message}")]
    CorruptedData { message: String },

    /// A decode walk needed a code path the symbol table does not define.
    #[error("malformed code tree: {message}")]
    MalformedTree { message: String },

    /// Bitstream ran out before the declared symbol count was decoded.
    #[error("truncated input: decoded {decoded} of {expected} symbols")]
    TruncatedInput { decoded: usize, expected: usize },

    /// Checksum verification failed.
    #[error("checksum mismatch: expected 0x{expected:08x}, got 0x{actual:08x}")]
    ChecksumMismatch { expected: u32, actual: u32 },

    /// Decoded length differs from the declared original size.
    #[error("size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: u64, actual: u64 },

    /// Buffer too small for output.
    #[error("buffer too small: need {required} bytes, got {provided}")]
    BufferTooSmall { required: usize, provided: usize },

    /// I/O error from underlying file or stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Memory allocation failed.
    #[error("allocation failed: could not allocate {requested_bytes} bytes")]
    AllocationFailed { requested_bytes: usize },

    /// Unsupported feature or format.
    #[error("unsupported: {0}")]
    Unsupported(String),
}

impl Error {
    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Error::InvalidInput(message.into())
    }

    /// Create a corrupted data error.
    pub fn corrupted(message: impl Into<String>) -> Self {
        Error::CorruptedData {
            message: message.into(),
        }
    }

    /// Create a corrupted data error with offset context.
    pub fn corrupted_at(message: impl Into<String>, offset: usize) -> Self {
        Error::CorruptedData {
            message: format!("{} at offset {}", message.into(), offset),
        }
    }

    /// Create a malformed tree error.
    pub fn malformed_tree(message: impl Into<String>) -> Self {
        Error::MalformedTree {
            message: message.into(),
        }
    }

    /// Create a truncated input error.
    pub fn truncated(decoded: usize, expected: usize) -> Self {
        Error::TruncatedInput { decoded, expected }
    }

    /// Create a checksum mismatch error.
    pub fn checksum_mismatch(expected: u32, actual: u32) -> Self {
        Error::ChecksumMismatch { expected, actual }
    }

    /// Create a size mismatch error.
    pub fn size_mismatch(expected: u64, actual: u64) -> Self {
        Error::SizeMismatch { expected, actual }
    }

    /// Create a buffer too small error.
    pub fn buffer_too_small(required: usize, provided: usize) -> Self {
        Error::BufferTooSmall { required, provided }
    }

    /// Create an allocation failure error.
    pub fn allocation_failed(requested_bytes: usize) -> Self {
        Error::AllocationFailed { requested_bytes }
    }

    /// Create an I/O error with a custom message.
    pub fn io(message: impl Into<String>) -> Self {
        Error::Io(std::io::Error::other(message.into()))
    }

    /// Whether the error indicates the compressed data itself is damaged.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            Error::CorruptedData { .. }
                | Error::MalformedTree { .. }
                | Error::TruncatedInput { .. }
                | Error::ChecksumMismatch { .. }
                | Error::SizeMismatch { .. }
        )
    }

    /// Get error category for metrics.
    pub fn category(&self) -> &'static str {
        match self {
            Error::InvalidInput(_) => "invalid_input",
            Error::CorruptedData { .. } => "corrupted_data",
            Error::MalformedTree { .. } => "malformed_tree",
            Error::TruncatedInput { .. } => "truncated_input",
            Error::ChecksumMismatch { .. } => "checksum_mismatch",
            Error::SizeMismatch { .. } => "size_mismatch",
            Error::BufferTooSmall { .. } => "buffer_too_small",
            Error::Io(_) => "io_error",
            Error::AllocationFailed { .. } => "allocation_failed",
            Error::Unsupported(_) => "unsupported",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = Error::checksum_mismatch(0xdeadbeef, 0x1);
        assert_eq!(
            err.to_string(),
            "checksum mismatch: expected 0xdeadbeef, got 0x00000001"
        );

        let err = Error::truncated(3, 10);
        assert_eq!(err.to_string(), "truncated input: decoded 3 of 10 symbols");

        let err = Error::corrupted_at("bad magic", 0);
        assert_eq!(err.to_string(), "corrupted data: bad magic at offset 0");
    }

    #[test]
    fn test_categories() {
        assert_eq!(Error::malformed_tree("x").category(), "malformed_tree");
        assert_eq!(Error::size_mismatch(1, 2).category(), "size_mismatch");
        assert_eq!(Error::io("boom").category(), "io_error");
        assert_eq!(Error::allocation_failed(8).category(), "allocation_failed");
    }

    #[test]
    fn test_corruption_classification() {
        assert!(Error::truncated(0, 1).is_corruption());
        assert!(Error::checksum_mismatch(1, 2).is_corruption());
        assert!(!Error::invalid_input("empty").is_corruption());
        assert!(!Error::io("disk").is_corruption());
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
