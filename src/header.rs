use crate::error::{DecodeError, Result};

/// The five color interpretations a PNG sample stream can be decoded as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorModel {
    Gray,
    Rgb,
    Palette,
    GrayAlpha,
    Rgba,
}

impl ColorModel {
    pub fn from_color_type(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::Gray),
            2 => Ok(Self::Rgb),
            3 => Ok(Self::Palette),
            4 => Ok(Self::GrayAlpha),
            6 => Ok(Self::Rgba),
            other => Err(DecodeError::invalid_header(format!(
                "unsupported color type {other}"
            ))),
        }
    }

    pub fn samples_per_pixel(self) -> u32 {
        match self {
            Self::Gray | Self::Palette => 1,
            Self::GrayAlpha => 2,
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }

    pub fn allows_bit_depth(self, bit_depth: u8) -> bool {
        match self {
            Self::Gray | Self::Palette => matches!(bit_depth, 1 | 2 | 4 | 8),
            Self::Rgb | Self::GrayAlpha | Self::Rgba => bit_depth == 8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interlace {
    None,
    Adam7,
}

#[derive(Debug, Clone, Copy)]
pub struct Ihdr {
    pub width: u32,
    pub height: u32,
    pub bit_depth: u8,
    pub color_model: ColorModel,
    pub interlace: Interlace,
}

/// PNG dimensions are stored as u32 but the format only allows 1..=2^31-1.
const MAX_DIMENSION: u32 = (1u32 << 31) - 1;

impl Ihdr {
    pub fn parse(data: &[u8]) -> Result<Self> {
        debug_assert_eq!(data.len(), 13, "caller must pass exactly 13 IHDR bytes");

        let width = u32::from_be_bytes([data[0], data[1], data[2], data[3]]);
        let height = u32::from_be_bytes([data[4], data[5], data[6], data[7]]);
        let bit_depth = data[8];
        let color_type = data[9];
        let compression_method = data[10];
        let filter_method = data[11];
        let interlace_method = data[12];

        if width == 0 || width > MAX_DIMENSION || height == 0 || height > MAX_DIMENSION {
            return Err(DecodeError::invalid_header(
                "width and height must be in 1..=2^31-1",
            ));
        }

        let color_model = ColorModel::from_color_type(color_type)?;
        if !color_model.allows_bit_depth(bit_depth) {
            return Err(DecodeError::invalid_header(format!(
                "bit depth {bit_depth} is not legal for color type {color_type}"
            )));
        }

        if compression_method != 0 {
            return Err(DecodeError::invalid_header(format!(
                "compression method {compression_method} must be 0"
            )));
        }
        if filter_method != 0 {
            return Err(DecodeError::invalid_header(format!(
                "filter method {filter_method} must be 0"
            )));
        }

        let interlace = match interlace_method {
            0 => Interlace::None,
            1 => Interlace::Adam7,
            other => {
                return Err(DecodeError::invalid_header(format!(
                    "interlace method {other} is not 0 or 1"
                )))
            }
        };

        Ok(Self {
            width,
            height,
            bit_depth,
            color_model,
            interlace,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteEntry {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

pub fn parse_palette(data: &[u8]) -> Result<Vec<PaletteEntry>> {
    if data.len() % 3 != 0 {
        return Err(DecodeError::invalid_palette(
            "PLTE length must be a multiple of 3",
        ));
    }
    let count = data.len() / 3;
    if count > 256 {
        return Err(DecodeError::invalid_palette(
            "PLTE may not contain more than 256 entries",
        ));
    }

    Ok(data
        .chunks_exact(3)
        .map(|c| PaletteEntry {
            r: c[0],
            g: c[1],
            b: c[2],
        })
        .collect())
}
