//! Compression and decompression pipelines.
//!
//! Compression: analyze -> build tree -> assign codes -> pack -> frame.
//! Decompression: parse frame -> rebuild decode tree -> unpack -> verify.

use tracing::{debug, warn};

use haagenti_core::{Codec, Compressor, Decompressor, Error, Result};

use crate::bitstream::BitWriter;
use crate::code::{CodeTable, SymbolRecord};
use crate::config::HuffmanConfig;
use crate::container::{Container, ContainerHeader, HEADER_SIZE, SYMBOL_RECORD_SIZE};
use crate::decoder::{self, DecodeTree};
use crate::frequency::FrequencyTable;
use crate::tree::HuffmanTree;
use crate::{MAX_CODE_LENGTH, MAX_SYMBOLS};

/// Output of the encoding stages, before framing.
#[derive(Debug, Default)]
struct EncodedBlock {
    payload: Vec<u8>,
    symbols: Vec<SymbolRecord>,
    max_code_length: u8,
}

fn encode_block(data: &[u8]) -> Result<EncodedBlock> {
    if data.is_empty() {
        return Ok(EncodedBlock::default());
    }

    let frequencies = FrequencyTable::analyze(data);
    let tree = HuffmanTree::build(&frequencies)?;
    let codes = CodeTable::from_tree(&tree)?;

    let bits = codes.encoded_bits(frequencies.counts());
    let capacity = usize::try_from(bits.div_ceil(8))
        .map_err(|_| Error::allocation_failed(usize::MAX))?;
    let mut writer = BitWriter::try_with_capacity(capacity)?;
    for &byte in data {
        let code = codes
            .get(byte)
            .ok_or_else(|| Error::invalid_input(format!("no code assigned to byte {}", byte)))?;
        writer.write_code(code);
    }
    let payload = writer.finish();

    debug!(
        input_len = data.len(),
        payload_len = payload.len(),
        distinct_symbols = frequencies.distinct_symbols(),
        max_code_length = codes.max_length(),
        "encoded huffman block"
    );

    Ok(EncodedBlock {
        payload,
        symbols: codes.records(),
        max_code_length: codes.max_length(),
    })
}

fn decode_block(
    payload: &[u8],
    symbols: &[SymbolRecord],
    expected_size: u64,
    config: &HuffmanConfig,
) -> Result<Vec<u8>> {
    config.validate()?;
    if expected_size == 0 {
        return Ok(Vec::new());
    }
    if symbols.is_empty() {
        return Err(Error::malformed_tree(format!(
            "empty symbol table for {} bytes of output",
            expected_size
        )));
    }

    // every symbol costs at least one bit
    let available_bits = payload.len() as u64 * 8;
    if expected_size > available_bits {
        return Err(Error::truncated(0, expected_size as usize));
    }
    let expected = usize::try_from(expected_size)
        .map_err(|_| Error::allocation_failed(usize::MAX))?;

    let tree = DecodeTree::from_records(symbols)?;
    let output = decoder::decode(
        &tree,
        payload,
        expected,
        config.strategy,
        config.lookup_bits,
    )?;

    debug!(
        payload_len = payload.len(),
        output_len = output.len(),
        symbols = tree.leaf_count(),
        max_code_length = tree.max_depth(),
        strategy = ?config.strategy,
        "decoded huffman block"
    );

    Ok(output)
}

/// Compress `data` into a packed payload and its symbol table.
///
/// The table is sorted by symbol value. Empty input yields an empty payload
/// and table.
pub fn compress_block(data: &[u8]) -> Result<(Vec<u8>, Vec<SymbolRecord>)> {
    let block = encode_block(data)?;
    Ok((block.payload, block.symbols))
}

/// Decode exactly `expected_size` bytes from a payload and its symbol table.
pub fn decompress_block(
    payload: &[u8],
    symbols: &[SymbolRecord],
    expected_size: u64,
) -> Result<Vec<u8>> {
    decode_block(payload, symbols, expected_size, &HuffmanConfig::default())
}

/// Compress `data` into a framed container.
pub fn compress(data: &[u8]) -> Result<Container> {
    HuffmanCodec::new().compress_container(data)
}

/// Decompress a container and verify its checksum and size.
pub fn decompress(container: &Container) -> Result<Vec<u8>> {
    HuffmanCodec::new().decompress_container(container)
}

/// Huffman codec over framed containers.
#[derive(Debug, Clone, Default)]
pub struct HuffmanCodec {
    config: HuffmanConfig,
}

impl HuffmanCodec {
    /// Create a codec with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with explicit decode settings.
    pub fn with_config(config: HuffmanConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HuffmanConfig {
        &self.config
    }

    /// Compress `data` and frame it with header and symbol table.
    pub fn compress_container(&self, data: &[u8]) -> Result<Container> {
        let block = encode_block(data)?;
        let checksum = crc32fast::hash(data);

        let header = ContainerHeader::new(
            data.len() as u64,
            block.payload.len() as u64,
            block.symbols.len() as u16,
            u16::from(block.max_code_length),
            checksum,
        );

        Ok(Container {
            header,
            symbols: block.symbols,
            payload: block.payload,
        })
    }

    /// Decode a container, then check CRC-32 and length against the header.
    pub fn decompress_container(&self, container: &Container) -> Result<Vec<u8>> {
        let header = &container.header;
        if container.payload.len() as u64 != header.compressed_size {
            return Err(Error::corrupted(format!(
                "payload is {} bytes, header declares {}",
                container.payload.len(),
                header.compressed_size
            )));
        }
        if container.symbols.len() != header.symbol_count as usize {
            return Err(Error::corrupted(format!(
                "symbol table has {} records, header declares {}",
                container.symbols.len(),
                header.symbol_count
            )));
        }

        let output = decode_block(
            &container.payload,
            &container.symbols,
            header.original_size,
            &self.config,
        )?;

        if self.config.verify_checksum {
            let actual = crc32fast::hash(&output);
            if actual != header.checksum {
                warn!(
                    expected = header.checksum,
                    actual, "huffman checksum mismatch"
                );
                return Err(Error::checksum_mismatch(header.checksum, actual));
            }
        }

        if output.len() as u64 != header.original_size {
            return Err(Error::size_mismatch(
                header.original_size,
                output.len() as u64,
            ));
        }

        Ok(output)
    }
}

impl Compressor for HuffmanCodec {
    fn name(&self) -> &'static str {
        "huffman"
    }

    fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
        Ok(self.compress_container(input)?.to_bytes())
    }

    fn max_compressed_size(&self, input_len: usize) -> usize {
        // full alphabet table plus 32-bit codes for every byte
        let code_bytes = usize::from(MAX_CODE_LENGTH) / 8;
        HEADER_SIZE + MAX_SYMBOLS * SYMBOL_RECORD_SIZE + input_len.saturating_mul(code_bytes)
    }
}

impl Decompressor for HuffmanCodec {
    fn name(&self) -> &'static str {
        "huffman"
    }

    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>> {
        let container = Container::from_bytes(input)?;
        self.decompress_container(&container)
    }
}

impl Codec for HuffmanCodec {}
