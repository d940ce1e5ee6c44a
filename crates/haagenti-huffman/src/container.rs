//! Self-describing container format.
//!
//! ```text
//! +---------------------------+  offset 0
//! | magic            u32 LE   |  "HUFF" = 0x48554646
//! | version          u16 LE   |
//! | flags            u16 LE   |  reserved, preserved verbatim
//! | original_size    u64 LE   |
//! | compressed_size  u64 LE   |  payload bytes only
//! | symbol_count     u16 LE   |
//! | max_code_length  u16 LE   |
//! | checksum         u32 LE   |  CRC-32 of the original bytes
//! +---------------------------+  offset 32
//! | symbol_count x record     |  symbol u8, code_length u8, code u32 LE
//! +---------------------------+
//! | payload                   |  MSB-first packed codes, zero-padded
//! +---------------------------+
//! ```

use std::io::{Read, Write};

use haagenti_core::{Error, Result};

use crate::code::SymbolRecord;
use crate::{MAX_CODE_LENGTH, MAX_SYMBOLS};

/// Format identifier, "HUFF" read as a big-endian word.
pub const MAGIC: u32 = 0x4855_4646;
/// Current container version.
pub const VERSION: u16 = 1;
/// Fixed header length in bytes.
pub const HEADER_SIZE: usize = 32;
/// Length of one symbol table record in bytes.
pub const SYMBOL_RECORD_SIZE: usize = 6;

/// Fixed-size container header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerHeader {
    pub magic: u32,
    pub version: u16,
    pub flags: u16,
    /// Number of bytes a correct decode produces.
    pub original_size: u64,
    /// Payload length, excluding header and symbol table.
    pub compressed_size: u64,
    pub symbol_count: u16,
    pub max_code_length: u16,
    pub checksum: u32,
}

impl ContainerHeader {
    /// Header for a freshly compressed payload.
    pub fn new(
        original_size: u64,
        compressed_size: u64,
        symbol_count: u16,
        max_code_length: u16,
        checksum: u32,
    ) -> Self {
        Self {
            magic: MAGIC,
            version: VERSION,
            flags: 0,
            original_size,
            compressed_size,
            symbol_count,
            max_code_length,
            checksum,
        }
    }

    /// Parse and validate a header from the start of `data`.
    ///
    /// Magic and version are checked before any other field is trusted.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_SIZE {
            return Err(Error::corrupted(format!(
                "container header truncated: {} of {} bytes",
                data.len(),
                HEADER_SIZE
            )));
        }

        let magic = read_u32(data, 0);
        if magic != MAGIC {
            return Err(Error::corrupted(format!(
                "invalid magic number: {:#010x}",
                magic
            )));
        }

        let version = read_u16(data, 4);
        if version != VERSION {
            return Err(Error::Unsupported(format!(
                "container version {} (expected {})",
                version, VERSION
            )));
        }

        let header = Self {
            magic,
            version,
            flags: read_u16(data, 6),
            original_size: read_u64(data, 8),
            compressed_size: read_u64(data, 16),
            symbol_count: read_u16(data, 24),
            max_code_length: read_u16(data, 26),
            checksum: read_u32(data, 28),
        };

        if header.symbol_count as usize > MAX_SYMBOLS {
            return Err(Error::corrupted(format!(
                "symbol count {} exceeds {}",
                header.symbol_count, MAX_SYMBOLS
            )));
        }
        if header.max_code_length > u16::from(MAX_CODE_LENGTH) {
            return Err(Error::corrupted(format!(
                "max code length {} exceeds {}",
                header.max_code_length, MAX_CODE_LENGTH
            )));
        }

        Ok(header)
    }

    /// Read and validate exactly one header from `reader`.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let mut buf = [0u8; HEADER_SIZE];
        reader.read_exact(&mut buf)?;
        Self::parse(&buf)
    }

    /// Serialize to the 32-byte wire form.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        out[0..4].copy_from_slice(&self.magic.to_le_bytes());
        out[4..6].copy_from_slice(&self.version.to_le_bytes());
        out[6..8].copy_from_slice(&self.flags.to_le_bytes());
        out[8..16].copy_from_slice(&self.original_size.to_le_bytes());
        out[16..24].copy_from_slice(&self.compressed_size.to_le_bytes());
        out[24..26].copy_from_slice(&self.symbol_count.to_le_bytes());
        out[26..28].copy_from_slice(&self.max_code_length.to_le_bytes());
        out[28..32].copy_from_slice(&self.checksum.to_le_bytes());
        out
    }

    /// Size of the symbol table that follows the header.
    #[inline]
    pub fn symbol_table_size(&self) -> usize {
        self.symbol_count as usize * SYMBOL_RECORD_SIZE
    }

    /// Total container length declared by this header.
    pub fn container_size(&self) -> u64 {
        ((HEADER_SIZE + self.symbol_table_size()) as u64).saturating_add(self.compressed_size)
    }
}

/// Header, symbol table and packed payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub header: ContainerHeader,
    pub symbols: Vec<SymbolRecord>,
    pub payload: Vec<u8>,
}

impl Container {
    /// Parse a complete container.
    ///
    /// The buffer must hold exactly the declared symbol table and payload,
    /// and the header's `max_code_length` must agree with the table.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let header = ContainerHeader::parse(data)?;

        let declared = header.container_size();
        if data.len() as u64 != declared {
            return Err(Error::corrupted(format!(
                "container is {} bytes, header declares {}",
                data.len(),
                declared
            )));
        }

        let table_end = HEADER_SIZE + header.symbol_table_size();
        let symbols: Vec<SymbolRecord> = data[HEADER_SIZE..table_end]
            .chunks_exact(SYMBOL_RECORD_SIZE)
            .map(read_record)
            .collect();

        let longest = symbols.iter().map(|r| r.code_length).max().unwrap_or(0);
        if u16::from(longest) != header.max_code_length {
            return Err(Error::corrupted(format!(
                "header max code length {} disagrees with symbol table ({})",
                header.max_code_length, longest
            )));
        }

        Ok(Self {
            header,
            symbols,
            payload: data[table_end..].to_vec(),
        })
    }

    /// Serialized length in bytes.
    pub fn encoded_len(&self) -> usize {
        HEADER_SIZE + self.symbols.len() * SYMBOL_RECORD_SIZE + self.payload.len()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        out.extend_from_slice(&self.header.to_bytes());
        for record in &self.symbols {
            out.extend_from_slice(&write_record(record));
        }
        out.extend_from_slice(&self.payload);
        out
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.header.to_bytes())?;
        for record in &self.symbols {
            writer.write_all(&write_record(record))?;
        }
        writer.write_all(&self.payload)?;
        Ok(())
    }
}

fn read_record(bytes: &[u8]) -> SymbolRecord {
    SymbolRecord {
        symbol: bytes[0],
        code_length: bytes[1],
        code: read_u32(bytes, 2),
    }
}

fn write_record(record: &SymbolRecord) -> [u8; SYMBOL_RECORD_SIZE] {
    let mut out = [0u8; SYMBOL_RECORD_SIZE];
    out[0] = record.symbol;
    out[1] = record.code_length;
    out[2..6].copy_from_slice(&record.code.to_le_bytes());
    out
}

#[inline]
fn read_u16(data: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([data[offset], data[offset + 1]])
}

#[inline]
fn read_u32(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

#[inline]
fn read_u64(data: &[u8], offset: usize) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&data[offset..offset + 8]);
    u64::from_le_bytes(bytes)
}
