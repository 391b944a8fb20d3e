//! RGB to luminance conversion.

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::image::{GrayImage, RasterView};

/// Fixed luma formula applied to 3-channel rasters.
///
/// All variants use 14-bit fixed point weights with rounding, so the result
/// is bit-exact across platforms.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LumaWeights {
    /// ITU-R BT.601: `0.299 R + 0.587 G + 0.114 B`.
    #[default]
    Rec601,
    /// ITU-R BT.709: `0.2126 R + 0.7152 G + 0.0722 B`.
    Rec709,
    /// Plain channel mean.
    Average,
}

const SHIFT: u32 = 14;
const HALF: u32 = 1 << (SHIFT - 1);

impl LumaWeights {
    #[inline]
    fn coefficients(self) -> Option<[u32; 3]> {
        match self {
            LumaWeights::Rec601 => Some([4899, 9617, 1868]),
            LumaWeights::Rec709 => Some([3483, 11718, 1183]),
            LumaWeights::Average => None,
        }
    }

    /// Luminance of a single RGB sample.
    #[inline]
    pub fn luma(self, r: u8, g: u8, b: u8) -> u8 {
        let (r, g, b) = (r as u32, g as u32, b as u32);
        match self.coefficients() {
            Some([wr, wg, wb]) => ((wr * r + wg * g + wb * b + HALF) >> SHIFT) as u8,
            None => ((r + g + b + 1) / 3) as u8,
        }
    }
}

/// Reduce a 1- or 3-channel raster to single-channel luminance.
///
/// One-channel input is copied unchanged. The output always has the source
/// width and height.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        level = "debug",
        skip(src),
        fields(width = src.width, height = src.height, channels = src.channels)
    )
)]
pub fn to_grayscale(src: &RasterView<'_>, weights: LumaWeights) -> Result<GrayImage, AnalysisError> {
    if src.channels != 1 && src.channels != 3 {
        return Err(AnalysisError::invalid_image(format!(
            "unsupported channel count {} (expected 1 or 3)",
            src.channels
        )));
    }
    let expected = src
        .width
        .checked_mul(src.height)
        .and_then(|n| n.checked_mul(src.channels))
        .ok_or_else(|| {
            AnalysisError::invalid_image(format!(
                "image dimensions {}x{} overflow",
                src.width, src.height
            ))
        })?;
    if src.data.len() != expected {
        return Err(AnalysisError::invalid_image(format!(
            "buffer holds {} bytes, {}x{}x{} needs {}",
            src.data.len(),
            src.width,
            src.height,
            src.channels,
            expected
        )));
    }

    let data = if src.channels == 1 {
        src.data.to_vec()
    } else {
        src.data
            .chunks_exact(3)
            .map(|px| weights.luma(px[0], px[1], px[2]))
            .collect()
    };

    Ok(GrayImage {
        width: src.width,
        height: src.height,
        data,
    })
}
