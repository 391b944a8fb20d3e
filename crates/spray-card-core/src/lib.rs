//! Core measurement pipeline for spray card coverage.
//!
//! The crate is image-library free: it works on plain `u8` buffers
//! ([`RasterView`], [`GrayImageView`]) and returns plain data. The stages are
//! usable individually or chained through [`analyze`]:
//!
//! 1. [`to_grayscale`]: 1- or 3-channel raster to luminance,
//! 2. [`otsu_threshold`]: global cut-point between deposit and card,
//! 3. [`binarize`]: deposit mask (`gray <= threshold`),
//! 4. [`SectionLayout`] + [`measure_sections`] + [`summarize`]: per-band
//!    coverage and its aggregate statistics.
//!
//! ```
//! use spray_card_core::{analyze, AnalysisParams, GrayImage};
//!
//! let card = GrayImage::from_fn(100, 10, |x, _| if x < 50 { 0 } else { 255 });
//! let res = analyze(&card.as_raster(), &AnalysisParams::with_sections(2)).unwrap();
//! assert_eq!(res.sections[0].coverage_pct, 100.0);
//! assert_eq!(res.sections[1].coverage_pct, 0.0);
//! ```

mod analysis;
mod error;
mod grayscale;
mod image;
mod logger;
mod mask;
mod params;
mod sections;
mod threshold;

pub use analysis::{analyze, CoverageAnalysis};
pub use error::AnalysisError;
pub use grayscale::{to_grayscale, LumaWeights};
pub use image::{GrayImage, GrayImageView, RasterImage, RasterView};
pub use mask::{binarize, CoverageMask};
pub use params::{AnalysisParams, DEFAULT_SECTIONS};
pub use sections::{
    measure_sections, summarize, CoverageSummary, RemainderPolicy, SectionLayout, SectionResult,
};
pub use threshold::{histogram, otsu_threshold, OtsuThreshold};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_with_level, level_from_verbosity};
