use std::io::Read;

use flate2::read::ZlibDecoder;

use crate::error::{DecodeError, Result};

/// Matches the ~16 KiB intermediate buffer convention of typical zlib
/// wrappers; the core only needs the final concatenated bytes.
const CHUNK_SIZE: usize = 16 * 1024;

/// Inflates the concatenated IDAT payload, which is presumed to be wrapped
/// in the zlib container (2-byte header, Adler-32 trailer).
pub fn inflate(payload: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(payload);
    let mut out = Vec::new();
    let mut buf = [0u8; CHUNK_SIZE];

    loop {
        match decoder.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => out.extend_from_slice(&buf[..n]),
            Err(err) => return Err(classify_error(&err)),
        }
    }

    Ok(out)
}

fn classify_error(err: &std::io::Error) -> DecodeError {
    match err.kind() {
        std::io::ErrorKind::OutOfMemory => DecodeError::deflate_out_of_memory(),
        _ => DecodeError::deflate_error(),
    }
}
