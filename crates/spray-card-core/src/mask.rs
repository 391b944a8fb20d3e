//! Boolean deposit mask produced by thresholding.

use crate::image::{GrayImage, GrayImageView};

/// Per-pixel deposit classification, `true` where spray landed.
///
/// Invariant: `get(x, y) == (gray(x, y) <= threshold)` for the gray image
/// and threshold it was built from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoverageMask {
    pub width: usize,
    pub height: usize,
    pub data: Vec<bool>, // row-major, len = w*h
}

/// Classify every pixel: darker than or equal to `threshold` is deposit.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "debug", skip(gray), fields(width = gray.width, height = gray.height))
)]
pub fn binarize(gray: &GrayImageView<'_>, threshold: u8) -> CoverageMask {
    CoverageMask {
        width: gray.width,
        height: gray.height,
        data: gray.data.iter().map(|&v| v <= threshold).collect(),
    }
}

impl CoverageMask {
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.data[y * self.width + x]
    }

    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.data.len()
    }

    pub fn covered_count(&self) -> usize {
        self.data.iter().filter(|&&m| m).count()
    }

    /// Number of deposit pixels in each column, left to right.
    pub fn column_counts(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.width];
        if self.width == 0 {
            return counts;
        }
        for row in self.data.chunks_exact(self.width) {
            for (count, &m) in counts.iter_mut().zip(row) {
                *count += m as usize;
            }
        }
        counts
    }

    /// Whole-image deposit percentage; 0 for an empty mask.
    pub fn coverage_pct(&self) -> f64 {
        coverage_pct(self.covered_count(), self.pixel_count())
    }

    /// Black-on-white rendering of the mask: deposit 0, background 255.
    pub fn to_gray(&self) -> GrayImage {
        GrayImage {
            width: self.width,
            height: self.height,
            data: self
                .data
                .iter()
                .map(|&m| if m { 0 } else { 255 })
                .collect(),
        }
    }
}

#[inline]
pub(crate) fn coverage_pct(covered: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    100.0 * covered as f64 / total as f64
}
