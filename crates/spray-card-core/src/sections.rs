//! Vertical band partitioning and per-band coverage.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::mask::{coverage_pct, CoverageMask};

/// Where the `width % sections` leftover columns go.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemainderPolicy {
    /// The last section absorbs all leftover columns.
    #[default]
    #[serde(alias = "last")]
    LastSection,
    /// The first `width % sections` sections get one extra column each.
    Distribute,
}

/// Contiguous, non-overlapping column ranges covering `[0, width)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionLayout {
    width: usize,
    ranges: Vec<Range<usize>>,
}

impl SectionLayout {
    /// Split `width` columns into `sections` bands.
    ///
    /// Requires `1 <= sections <= width`, which guarantees every band is at
    /// least one column wide.
    pub fn new(
        width: usize,
        sections: usize,
        remainder: RemainderPolicy,
    ) -> Result<Self, AnalysisError> {
        if sections == 0 || sections > width {
            return Err(AnalysisError::InvalidSectionCount { sections, width });
        }

        let base = width / sections;
        let extra = width % sections;
        let mut ranges = Vec::with_capacity(sections);
        let mut start = 0usize;
        for i in 0..sections {
            let w = match remainder {
                RemainderPolicy::LastSection if i + 1 == sections => base + extra,
                RemainderPolicy::LastSection => base,
                RemainderPolicy::Distribute => base + usize::from(i < extra),
            };
            ranges.push(start..start + w);
            start += w;
        }
        debug_assert_eq!(start, width);

        Ok(Self { width, ranges })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn ranges(&self) -> &[Range<usize>] {
        &self.ranges
    }

    /// Interior boundaries between neighbouring sections (`x_end` of all but
    /// the last section).
    pub fn boundaries(&self) -> impl Iterator<Item = usize> + '_ {
        self.ranges[..self.ranges.len().saturating_sub(1)]
            .iter()
            .map(|r| r.end)
    }
}

/// Coverage of one vertical band.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SectionResult {
    /// Zero-based, left to right.
    pub index: usize,
    /// Half-open column range `[x_start, x_end)`.
    pub x_range: [usize; 2],
    pub covered_pixels: usize,
    pub total_pixels: usize,
    /// `100 * covered_pixels / total_pixels`, in `[0, 100]`.
    pub coverage_pct: f64,
}

impl SectionResult {
    pub fn x_start(&self) -> usize {
        self.x_range[0]
    }

    pub fn x_end(&self) -> usize {
        self.x_range[1]
    }

    pub fn width(&self) -> usize {
        self.x_range[1] - self.x_range[0]
    }
}

/// Measure deposit coverage in each band of `layout`.
///
/// Fails with `InvalidImage` when `layout` was built for another width or
/// the mask buffer does not hold `width * height` pixels.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "debug", skip(mask, layout), fields(sections = layout.len()))
)]
pub fn measure_sections(
    mask: &CoverageMask,
    layout: &SectionLayout,
) -> Result<Vec<SectionResult>, AnalysisError> {
    if mask.width != layout.width() {
        return Err(AnalysisError::invalid_image(format!(
            "section layout spans {} columns but the mask is {} wide",
            layout.width(),
            mask.width
        )));
    }
    if mask.data.len() != mask.pixel_count() {
        return Err(AnalysisError::invalid_image(format!(
            "mask holds {} pixels, expected {}x{}",
            mask.data.len(),
            mask.width,
            mask.height
        )));
    }
    let columns = mask.column_counts();

    Ok(layout
        .ranges()
        .iter()
        .enumerate()
        .map(|(index, r)| {
            let covered_pixels: usize = columns[r.clone()].iter().sum();
            let total_pixels = r.len() * mask.height;
            SectionResult {
                index,
                x_range: [r.start, r.end],
                covered_pixels,
                total_pixels,
                coverage_pct: coverage_pct(covered_pixels, total_pixels),
            }
        })
        .collect())
}

/// Aggregate statistics over the section results.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoverageSummary {
    /// Deposit percentage of the whole image.
    pub overall_pct: f64,
    pub mean_pct: f64,
    pub min_pct: f64,
    pub max_pct: f64,
    /// Population standard deviation of section coverage.
    pub std_dev_pct: f64,
    /// `std_dev_pct / mean_pct`; 0 when the mean is 0.
    pub coefficient_of_variation: f64,
}

pub fn summarize(mask: &CoverageMask, sections: &[SectionResult]) -> CoverageSummary {
    let overall_pct = mask.coverage_pct();
    if sections.is_empty() {
        return CoverageSummary {
            overall_pct,
            mean_pct: 0.0,
            min_pct: 0.0,
            max_pct: 0.0,
            std_dev_pct: 0.0,
            coefficient_of_variation: 0.0,
        };
    }

    let n = sections.len() as f64;
    let mut min_pct = f64::INFINITY;
    let mut max_pct = f64::NEG_INFINITY;
    let mut sum = 0.0;
    for s in sections {
        min_pct = min_pct.min(s.coverage_pct);
        max_pct = max_pct.max(s.coverage_pct);
        sum += s.coverage_pct;
    }
    let mean_pct = sum / n;
    let var = sections
        .iter()
        .map(|s| (s.coverage_pct - mean_pct).powi(2))
        .sum::<f64>()
        / n;
    let std_dev_pct = var.sqrt();
    let coefficient_of_variation = if mean_pct > 0.0 {
        std_dev_pct / mean_pct
    } else {
        0.0
    };

    CoverageSummary {
        overall_pct,
        mean_pct,
        min_pct,
        max_pct,
        std_dev_pct,
        coefficient_of_variation,
    }
}
