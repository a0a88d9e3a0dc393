//! Decodes a PNG bitstream into an in-memory RGBA raster.
//!
//! The three hard subsystems — chunk framing, compressed-stream
//! reconstruction, and pixel materialization — live in their own modules;
//! [`decode`] wires them together. Decoding is synchronous and produces the
//! full raster in one call: there is no partial/streaming decode API.

mod chunk;
mod defilter;
mod error;
mod header;
mod inflate;
mod raster;
mod scanline;
mod strategy;

pub use chunk::ChunkType;
pub use error::{DecodeError, Result};
pub use header::{ColorModel, Ihdr, Interlace, PaletteEntry};
pub use raster::{Raster, Rgba8};
pub use strategy::RescalePolicy;

use std::io::Read;

/// Decodes `source` into a raster, or fails with the first error
/// encountered. Partial rasters are never returned.
pub fn decode<R: Read>(mut source: R, policy: RescalePolicy) -> Result<Raster> {
    chunk::read_signature(&mut source)?;

    let mut ihdr: Option<header::Ihdr> = None;
    let mut palette: Option<Vec<header::PaletteEntry>> = None;
    let mut payload: Vec<u8> = Vec::new();
    let mut idat_started = false;
    let mut idat_finished = false;
    let mut chunk_index = 0u64;

    loop {
        let raw = chunk::read_chunk(&mut source)?;
        let is_idat = raw.chunk_type.0 == chunk::IDAT;

        if chunk_index == 0 && raw.chunk_type.0 != chunk::IHDR {
            return Err(DecodeError::invalid_header("IHDR must be the first chunk"));
        }
        if !is_idat && idat_started {
            idat_finished = true;
        }

        match raw.chunk_type.0 {
            chunk::IHDR => {
                if ihdr.is_some() {
                    return Err(DecodeError::invalid_header("duplicate IHDR chunk"));
                }
                if raw.data.len() != 13 {
                    return Err(DecodeError::invalid_header("IHDR chunk must be 13 bytes"));
                }
                let parsed = header::Ihdr::parse(&raw.data)?;
                log::trace!(
                    "IHDR: {}x{} bit_depth={} interlace={:?}",
                    parsed.width,
                    parsed.height,
                    parsed.bit_depth,
                    parsed.interlace
                );
                ihdr = Some(parsed);
            }
            chunk::PLTE => {
                if palette.is_some() {
                    return Err(DecodeError::invalid_palette("duplicate PLTE chunk"));
                }
                if idat_started {
                    return Err(DecodeError::invalid_palette(
                        "PLTE chunk must precede the first IDAT chunk",
                    ));
                }
                palette = Some(header::parse_palette(&raw.data)?);
            }
            chunk::IDAT => {
                if idat_finished {
                    return Err(DecodeError::non_contiguous_idat());
                }
                idat_started = true;
                payload.extend_from_slice(&raw.data);
            }
            chunk::IEND => {
                if !raw.data.is_empty() {
                    return Err(DecodeError::invalid_header("IEND chunk must be empty"));
                }
                if !chunk::at_eof(&mut source)? {
                    return Err(DecodeError::trailing_bytes());
                }
                break;
            }
            _ => {
                if raw.chunk_type.is_critical() {
                    return Err(DecodeError::unsupported_critical_chunk(raw.chunk_type));
                }
                log::debug!("skipping ancillary chunk {}", raw.chunk_type);
            }
        }

        chunk_index += 1;
    }

    let ihdr = ihdr.ok_or_else(|| DecodeError::invalid_header("missing IHDR chunk"))?;

    match ihdr.color_model {
        header::ColorModel::Palette if palette.is_none() => {
            return Err(DecodeError::invalid_palette(
                "color type 3 requires a PLTE chunk",
            ));
        }
        header::ColorModel::Gray | header::ColorModel::GrayAlpha if palette.is_some() => {
            return Err(DecodeError::invalid_palette(
                "PLTE chunk is forbidden for this color type",
            ));
        }
        _ => {}
    }

    let inflated = inflate::inflate(&payload)?;
    log::debug!(
        "inflated {} bytes of IDAT payload into {} bytes",
        payload.len(),
        inflated.len()
    );

    let mut raster = raster::Raster::new(ihdr.width, ihdr.height)?;
    let palette_slice = palette.as_deref();

    match ihdr.interlace {
        header::Interlace::None => {
            raster::fill_null(&mut raster, &ihdr, &inflated, palette_slice, policy)?
        }
        header::Interlace::Adam7 => {
            raster::fill_adam7(&mut raster, &ihdr, &inflated, palette_slice, policy)?
        }
    }

    Ok(raster)
}
