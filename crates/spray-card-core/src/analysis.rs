//! End-to-end coverage measurement: grayscale -> Otsu -> mask -> sections.

use std::time::Instant;

use log::{debug, info};

use crate::error::AnalysisError;
use crate::grayscale::to_grayscale;
use crate::image::RasterView;
use crate::mask::{binarize, CoverageMask};
use crate::params::AnalysisParams;
use crate::sections::{measure_sections, summarize, CoverageSummary, SectionLayout, SectionResult};
use crate::threshold::{otsu_threshold, OtsuThreshold};

/// Output of one analysis run.
#[derive(Clone, Debug)]
pub struct CoverageAnalysis {
    pub width: usize,
    pub height: usize,
    pub threshold: OtsuThreshold,
    pub mask: CoverageMask,
    /// Left-to-right, one entry per configured section.
    pub sections: Vec<SectionResult>,
    pub summary: CoverageSummary,
}

/// Run the measurement pipeline on a 1- or 3-channel raster.
///
/// Each stage consumes the previous stage's output; the first failing stage
/// aborts the run.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        level = "info",
        skip(src, params),
        fields(width = src.width, height = src.height, sections = params.sections)
    )
)]
pub fn analyze(
    src: &RasterView<'_>,
    params: &AnalysisParams,
) -> Result<CoverageAnalysis, AnalysisError> {
    let t0 = Instant::now();

    let gray = to_grayscale(src, params.luma)?;
    let threshold = otsu_threshold(&gray.as_view())?;
    debug!(
        "otsu threshold {} (separability {:.3}) on {}x{}",
        threshold.value, threshold.separability, gray.width, gray.height
    );

    let layout = SectionLayout::new(gray.width, params.sections, params.remainder)?;
    let mask = binarize(&gray.as_view(), threshold.value);
    let sections = measure_sections(&mask, &layout)?;
    let summary = summarize(&mask, &sections);

    info!(
        "measured {} sections: overall {:.2}%, cv {:.3} ({:.1} ms)",
        sections.len(),
        summary.overall_pct,
        summary.coefficient_of_variation,
        t0.elapsed().as_secs_f64() * 1e3
    );

    Ok(CoverageAnalysis {
        width: gray.width,
        height: gray.height,
        threshold,
        mask,
        sections,
        summary,
    })
}
