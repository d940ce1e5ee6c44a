//! File entry points.
//!
//! Thin wrappers that read a whole file, run the codec, and write the
//! result. Each returns the [`CompressionStats`] of the operation.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use tracing::{info, warn};

use haagenti_core::{CompressionStats, Result};

use crate::codec::HuffmanCodec;
use crate::container::{Container, ContainerHeader};

impl HuffmanCodec {
    /// Compress `input` into a container file at `output`.
    pub fn compress_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<CompressionStats> {
        let (input, output) = (input.as_ref(), output.as_ref());
        let start = Instant::now();

        let data = std::fs::read(input)?;
        let container = self.compress_container(&data)?;

        let mut writer = BufWriter::new(File::create(output)?);
        container.write_to(&mut writer)?;
        writer.flush()?;

        let mut stats = CompressionStats::from_operation(
            data.len() as u64,
            container.encoded_len() as u64,
            start.elapsed().as_micros() as u64,
        );
        stats.distinct_symbols = container.symbols.len();
        stats.max_code_length = container.header.max_code_length as u8;
        stats.checksum = Some(container.header.checksum);

        info!(
            input = %input.display(),
            output = %output.display(),
            %stats,
            "compressed file"
        );
        Ok(stats)
    }

    /// Decompress the container file `input` into `output`.
    ///
    /// Nothing is written when decoding or verification fails.
    pub fn decompress_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<CompressionStats> {
        let (input, output) = (input.as_ref(), output.as_ref());
        let start = Instant::now();

        let bytes = std::fs::read(input)?;
        let container = Container::from_bytes(&bytes)?;
        let data = self.decompress_container(&container)?;

        let mut writer = BufWriter::new(File::create(output)?);
        writer.write_all(&data)?;
        writer.flush()?;

        let mut stats = CompressionStats::from_operation(
            data.len() as u64,
            bytes.len() as u64,
            start.elapsed().as_micros() as u64,
        );
        stats.distinct_symbols = container.symbols.len();
        stats.max_code_length = container.header.max_code_length as u8;
        stats.checksum = Some(container.header.checksum);

        info!(
            input = %input.display(),
            output = %output.display(),
            bytes = data.len(),
            "decompressed file"
        );
        Ok(stats)
    }
}

/// Compress a file with default settings.
pub fn compress_file(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<CompressionStats> {
    HuffmanCodec::new().compress_file(input, output)
}

/// Decompress a container file with default settings.
pub fn decompress_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> Result<CompressionStats> {
    HuffmanCodec::new().decompress_file(input, output)
}

/// Check that `path` starts with a readable container header.
///
/// Only the 32-byte header is read; the payload is not decoded.
pub fn validate_file(path: impl AsRef<Path>) -> bool {
    let path = path.as_ref();
    let result = File::open(path)
        .map_err(Into::into)
        .and_then(|mut file| ContainerHeader::read_from(&mut file));

    match result {
        Ok(_) => true,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "container validation failed");
            false
        }
    }
}

/// In-memory counterpart of [`validate_file`].
pub fn validate_container(bytes: &[u8]) -> bool {
    ContainerHeader::parse(bytes).is_ok()
}
