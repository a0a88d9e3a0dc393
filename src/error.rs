use std::panic::Location;

use crate::chunk::ChunkType;

pub type Result<T> = std::result::Result<T, DecodeError>;

fn format_origin(loc: &Location) -> String {
    format!("{}:{}", loc.file(), loc.line())
}

/// Errors raised while turning a byte stream into a raster. Every variant
/// carries the context a caller needs to log the failure without re-parsing
/// the input themselves.
#[derive(thiserror::Error, Debug)]
pub enum DecodeError {
    #[error("invalid PNG signature ({origin})")]
    InvalidSignature { origin: String },

    #[error("unexpected end of stream ({origin})")]
    TruncatedStream { origin: String },

    #[error("invalid IHDR: {reason} ({origin})")]
    InvalidHeader { reason: String, origin: String },

    #[error("invalid PLTE: {reason} ({origin})")]
    InvalidPalette { reason: String, origin: String },

    #[error("CRC mismatch in chunk {chunk_type}: expected {expected:#010x}, got {actual:#010x}")]
    CrcMismatch {
        chunk_type: ChunkType,
        expected: u32,
        actual: u32,
    },

    #[error("unsupported critical chunk: {chunk_type}")]
    UnsupportedCriticalChunk { chunk_type: ChunkType },

    #[error("IDAT chunks must be contiguous ({origin})")]
    NonContiguousIdat { origin: String },

    #[error("trailing bytes found after IEND ({origin})")]
    TrailingBytes { origin: String },

    #[error("invalid filter method byte {value} ({origin})")]
    InvalidFilterMethod { value: u8, origin: String },

    #[error("palette index {index} is out of range (palette has {palette_len} entries)")]
    PaletteOutOfRange { index: usize, palette_len: usize },

    #[error("chunk length {length} exceeds the {limit}-byte limit")]
    ChunkTooLarge { length: u64, limit: u64 },

    #[error("image dimensions {width}x{height} exceed the allocation limit")]
    DimensionsExceedLimit { width: u32, height: u32 },

    #[error("deflate stream error ({origin})")]
    DeflateError { origin: String },

    #[error("deflate decompressor ran out of memory")]
    DeflateOutOfMemory,

    #[error("deflate/zlib version mismatch")]
    DeflateVersionMismatch,
}

impl DecodeError {
    #[track_caller]
    pub(crate) fn invalid_signature() -> Self {
        Self::InvalidSignature {
            origin: format_origin(Location::caller()),
        }
    }

    #[track_caller]
    pub(crate) fn truncated_stream() -> Self {
        Self::TruncatedStream {
            origin: format_origin(Location::caller()),
        }
    }

    #[track_caller]
    pub(crate) fn invalid_header(reason: impl Into<String>) -> Self {
        Self::InvalidHeader {
            reason: reason.into(),
            origin: format_origin(Location::caller()),
        }
    }

    #[track_caller]
    pub(crate) fn invalid_palette(reason: impl Into<String>) -> Self {
        Self::InvalidPalette {
            reason: reason.into(),
            origin: format_origin(Location::caller()),
        }
    }

    pub(crate) fn crc_mismatch(chunk_type: ChunkType, expected: u32, actual: u32) -> Self {
        Self::CrcMismatch {
            chunk_type,
            expected,
            actual,
        }
    }

    pub(crate) fn unsupported_critical_chunk(chunk_type: ChunkType) -> Self {
        Self::UnsupportedCriticalChunk { chunk_type }
    }

    #[track_caller]
    pub(crate) fn non_contiguous_idat() -> Self {
        Self::NonContiguousIdat {
            origin: format_origin(Location::caller()),
        }
    }

    #[track_caller]
    pub(crate) fn trailing_bytes() -> Self {
        Self::TrailingBytes {
            origin: format_origin(Location::caller()),
        }
    }

    #[track_caller]
    pub(crate) fn invalid_filter_method(value: u8) -> Self {
        Self::InvalidFilterMethod {
            value,
            origin: format_origin(Location::caller()),
        }
    }

    pub(crate) fn palette_out_of_range(index: usize, palette_len: usize) -> Self {
        Self::PaletteOutOfRange { index, palette_len }
    }

    pub(crate) fn chunk_too_large(length: u64) -> Self {
        Self::ChunkTooLarge {
            length,
            limit: crate::chunk::MAX_CHUNK_LEN,
        }
    }

    pub(crate) fn dimensions_exceed_limit(width: u32, height: u32) -> Self {
        Self::DimensionsExceedLimit { width, height }
    }

    #[track_caller]
    pub(crate) fn deflate_error() -> Self {
        Self::DeflateError {
            origin: format_origin(Location::caller()),
        }
    }

    pub(crate) fn deflate_out_of_memory() -> Self {
        Self::DeflateOutOfMemory
    }
}
