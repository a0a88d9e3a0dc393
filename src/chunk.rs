use std::fmt;
use std::io::Read;

use crate::error::{DecodeError, Result};

pub const SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Chunks larger than this are refused before their data is buffered.
pub(crate) const MAX_CHUNK_LEN: u64 = 1 << 28;

pub const IHDR: [u8; 4] = *b"IHDR";
pub const PLTE: [u8; 4] = *b"PLTE";
pub const IDAT: [u8; 4] = *b"IDAT";
pub const IEND: [u8; 4] = *b"IEND";

/// A chunk's 4-byte type tag, kept around both for dispatch and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkType(pub [u8; 4]);

impl ChunkType {
    /// Bit 5 of the first byte marks ancillary chunks; critical chunks have it clear.
    pub fn is_critical(&self) -> bool {
        self.0[0] & 0x20 == 0
    }
}

impl fmt::Display for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match std::str::from_utf8(&self.0) {
            Ok(s) if s.bytes().all(|b| b.is_ascii_alphabetic()) => write!(f, "{s}"),
            _ => write!(
                f,
                "{:02X}{:02X}{:02X}{:02X}",
                self.0[0], self.0[1], self.0[2], self.0[3]
            ),
        }
    }
}

pub struct RawChunk {
    pub chunk_type: ChunkType,
    pub data: Vec<u8>,
}

pub fn read_signature<R: Read>(reader: &mut R) -> Result<()> {
    let mut buf = [0u8; 8];
    reader
        .read_exact(&mut buf)
        .map_err(|_| DecodeError::truncated_stream())?;
    if buf != SIGNATURE {
        return Err(DecodeError::invalid_signature());
    }
    Ok(())
}

/// Reads one length-prefixed, CRC-checked chunk. The CRC is computed by
/// reading the type and data forward into a scratch buffer rather than
/// rewinding, so the source only needs to be a forward `Read`.
pub fn read_chunk<R: Read>(reader: &mut R) -> Result<RawChunk> {
    let mut len_buf = [0u8; 4];
    reader
        .read_exact(&mut len_buf)
        .map_err(|_| DecodeError::truncated_stream())?;
    let length = u32::from_be_bytes(len_buf) as u64;
    if length > MAX_CHUNK_LEN {
        return Err(DecodeError::chunk_too_large(length));
    }

    let mut buffer = vec![0u8; 4 + length as usize];
    reader
        .read_exact(&mut buffer)
        .map_err(|_| DecodeError::truncated_stream())?;

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(&buffer);
    let computed = hasher.finalize();

    let mut crc_buf = [0u8; 4];
    reader
        .read_exact(&mut crc_buf)
        .map_err(|_| DecodeError::truncated_stream())?;
    let stored = u32::from_be_bytes(crc_buf);

    let chunk_type = ChunkType([buffer[0], buffer[1], buffer[2], buffer[3]]);

    if computed != stored {
        return Err(DecodeError::crc_mismatch(chunk_type, stored, computed));
    }

    Ok(RawChunk {
        chunk_type,
        data: buffer.split_off(4),
    })
}

/// Consumes one byte to check whether the source is exhausted. Only ever
/// called right after IEND, so a byte found here always means trailing data.
pub fn at_eof<R: Read>(reader: &mut R) -> Result<bool> {
    let mut probe = [0u8; 1];
    let read = reader.read(&mut probe).unwrap_or(0);
    Ok(read == 0)
}
