use std::ops::Index;

use crate::error::{DecodeError, Result};
use crate::header::{ColorModel, Ihdr, PaletteEntry};
use crate::scanline::ScanlineReader;
use crate::strategy::RescalePolicy;

/// Bounds how much memory a raster allocation may claim, checked before the
/// allocation happens.
const MAX_RASTER_BYTES: u64 = 1 << 32;

/// (starting_col, starting_row, col_increment, row_increment) for Adam7 passes 1..7.
pub const ADAM7_PASSES: [(u32, u32, u32, u32); 7] = [
    (0, 0, 8, 8),
    (4, 0, 8, 8),
    (0, 4, 4, 8),
    (2, 0, 4, 4),
    (0, 2, 2, 4),
    (1, 0, 2, 2),
    (0, 1, 1, 2),
];

/// One fully materialized pixel: four unsigned 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// A dense `height x width` grid of [`Rgba8`] pixels, produced in one call
/// and handed back to the caller by move.
#[derive(Debug, Clone)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<Rgba8>,
}

impl Raster {
    pub(crate) fn new(width: u32, height: u32) -> Result<Self> {
        let cell_count = width as u64 * height as u64;
        if cell_count.saturating_mul(4) > MAX_RASTER_BYTES {
            return Err(DecodeError::dimensions_exceed_limit(width, height));
        }
        Ok(Self {
            width,
            height,
            pixels: vec![Rgba8::default(); cell_count as usize],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, row: u32, col: u32) -> Rgba8 {
        self.pixels[self.offset(row, col)]
    }

    fn set(&mut self, row: u32, col: u32, pixel: Rgba8) {
        let offset = self.offset(row, col);
        self.pixels[offset] = pixel;
    }

    fn offset(&self, row: u32, col: u32) -> usize {
        (row as u64 * self.width as u64 + col as u64) as usize
    }
}

impl Index<(u32, u32)> for Raster {
    type Output = Rgba8;

    fn index(&self, (row, col): (u32, u32)) -> &Rgba8 {
        &self.pixels[self.offset(row, col)]
    }
}

pub(crate) fn pass_dims(
    width: u32,
    height: u32,
    start_col: u32,
    start_row: u32,
    col_inc: u32,
    row_inc: u32,
) -> (u32, u32) {
    let pw = if width > start_col {
        (width - start_col + col_inc - 1) / col_inc
    } else {
        0
    };
    let ph = if height > start_row {
        (height - start_row + row_inc - 1) / row_inc
    } else {
        0
    };
    (pw, ph)
}

fn scanline_bytes_for(color_model: ColorModel, bit_depth: u8, width: u32) -> usize {
    let bits = color_model.samples_per_pixel() as u64 * bit_depth as u64 * width as u64;
    ((bits + 7) / 8) as usize
}

/// Null (non-interlaced) layout: one pass spanning the whole image.
pub(crate) fn fill_null(
    raster: &mut Raster,
    ihdr: &Ihdr,
    inflated: &[u8],
    palette: Option<&[PaletteEntry]>,
    policy: RescalePolicy,
) -> Result<()> {
    let mut reader = ScanlineReader::new(
        ihdr.width,
        ihdr.height,
        ihdr.color_model,
        ihdr.bit_depth,
        palette,
        inflated,
        policy,
    );

    let mut row = 0u32;
    while reader.has_next() {
        let pixels = reader.read()?;
        for (col, pixel) in pixels.into_iter().enumerate() {
            raster.set(row, col as u32, pixel);
        }
        row += 1;
    }

    Ok(())
}

/// Adam7 layout: seven interlaced sub-images, each sliced out of the
/// inflated buffer in pass order and scattered into the raster by its
/// own stride.
pub(crate) fn fill_adam7(
    raster: &mut Raster,
    ihdr: &Ihdr,
    inflated: &[u8],
    palette: Option<&[PaletteEntry]>,
    policy: RescalePolicy,
) -> Result<()> {
    let mut dims = [(0u32, 0u32); 7];
    for (i, &(start_col, start_row, col_inc, row_inc)) in ADAM7_PASSES.iter().enumerate() {
        dims[i] = pass_dims(ihdr.width, ihdr.height, start_col, start_row, col_inc, row_inc);
    }

    let mut offset = 0usize;
    let mut segments: [&[u8]; 7] = [&[]; 7];
    for (i, &(pass_width, pass_height)) in dims.iter().enumerate() {
        if pass_width == 0 || pass_height == 0 {
            continue;
        }
        let len =
            (scanline_bytes_for(ihdr.color_model, ihdr.bit_depth, pass_width) + 1) * pass_height as usize;
        if offset + len > inflated.len() {
            return Err(DecodeError::truncated_stream());
        }
        segments[i] = &inflated[offset..offset + len];
        offset += len;
    }

    for (i, &(start_col, start_row, col_inc, row_inc)) in ADAM7_PASSES.iter().enumerate() {
        let (pass_width, pass_height) = dims[i];
        if pass_width == 0 || pass_height == 0 {
            continue;
        }

        let mut reader = ScanlineReader::new(
            pass_width,
            pass_height,
            ihdr.color_model,
            ihdr.bit_depth,
            palette,
            segments[i],
            policy,
        );

        let mut local_row = 0u32;
        while reader.has_next() {
            let pixels = reader.read()?;
            let full_row = local_row * row_inc + start_row;
            for (col, pixel) in pixels.into_iter().enumerate() {
                let full_col = col as u32 * col_inc + start_col;
                raster.set(full_row, full_col, pixel);
            }
            local_row += 1;
        }

        log::trace!(
            "adam7 pass {} filled a {}x{} sub-image",
            i + 1,
            pass_width,
            pass_height
        );
    }

    Ok(())
}
