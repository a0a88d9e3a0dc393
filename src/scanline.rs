use crate::defilter::{defilter_scanline, Filter};
use crate::error::{DecodeError, Result};
use crate::header::{ColorModel, PaletteEntry};
use crate::raster::Rgba8;
use crate::strategy::{pixel_at, RescalePolicy};

/// Walks one packed pass buffer scanline by scanline, defiltering each row
/// against the one before it and materializing pixels through a
/// [`ColorModel`] strategy. Holds a read-only borrow over the inflated
/// payload and owns the single scratch buffer it needs for the previous row.
pub struct ScanlineReader<'a> {
    width: u32,
    height: u32,
    color_model: ColorModel,
    bit_depth: u8,
    palette: Option<&'a [PaletteEntry]>,
    data: &'a [u8],
    policy: RescalePolicy,
    row: u32,
    previous: Vec<u8>,
    scanline_bytes: usize,
    bpp: usize,
}

impl<'a> ScanlineReader<'a> {
    pub fn new(
        width: u32,
        height: u32,
        color_model: ColorModel,
        bit_depth: u8,
        palette: Option<&'a [PaletteEntry]>,
        data: &'a [u8],
        policy: RescalePolicy,
    ) -> Self {
        let samples = color_model.samples_per_pixel();
        let bits = samples as u64 * bit_depth as u64 * width as u64;
        let scanline_bytes = ((bits + 7) / 8) as usize;
        let bpp = std::cmp::max(1, (samples * bit_depth as u32) / 8) as usize;

        Self {
            width,
            height,
            color_model,
            bit_depth,
            palette,
            data,
            policy,
            row: 0,
            previous: vec![0u8; scanline_bytes],
            scanline_bytes,
            bpp,
        }
    }

    pub fn scanline_size(&self) -> usize {
        self.scanline_bytes
    }

    pub fn has_next(&self) -> bool {
        self.row < self.height
    }

    pub fn read(&mut self) -> Result<Vec<Rgba8>> {
        let offset = self.row as usize * (self.scanline_bytes + 1);
        if offset + 1 + self.scanline_bytes > self.data.len() {
            return Err(DecodeError::truncated_stream());
        }

        let filter = Filter::from_byte(self.data[offset])?;
        let mut current = self.data[offset + 1..offset + 1 + self.scanline_bytes].to_vec();
        defilter_scanline(filter, &mut current, &self.previous, self.bpp);

        let mut pixels = Vec::with_capacity(self.width as usize);
        for i in 0..self.width as usize {
            pixels.push(pixel_at(
                self.color_model,
                &current,
                i,
                self.bit_depth,
                self.palette,
                self.policy,
            )?);
        }

        self.previous = current;
        self.row += 1;
        Ok(pixels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_one_row_per_call_until_height() {
        // 2x1 grayscale, bit depth 8, filter None: [filter=0, 10] then [filter=0, 20]
        let data = [0u8, 10, 0, 20];
        let mut reader =
            ScanlineReader::new(1, 2, ColorModel::Gray, 8, None, &data, RescalePolicy::Scaled);

        assert!(reader.has_next());
        let row0 = reader.read().unwrap();
        assert_eq!(row0, vec![Rgba8 { r: 10, g: 10, b: 10, a: 255 }]);

        assert!(reader.has_next());
        let row1 = reader.read().unwrap();
        assert_eq!(row1, vec![Rgba8 { r: 20, g: 20, b: 20, a: 255 }]);

        assert!(!reader.has_next());
    }

    #[test]
    fn truncated_pass_buffer_is_an_error() {
        let data = [0u8, 10];
        let mut reader =
            ScanlineReader::new(1, 2, ColorModel::Gray, 8, None, &data, RescalePolicy::Scaled);
        reader.read().unwrap();
        assert!(matches!(
            reader.read(),
            Err(DecodeError::TruncatedStream { .. })
        ));
    }
}
