//! Spray card coverage analysis.
//!
//! This crate provides:
//! - re-exports of the image-free measurement pipeline in
//!   [`spray_card_core`] (grayscale, Otsu threshold, deposit mask,
//!   per-section coverage),
//! - JSON configuration and report types,
//! - (feature `image`) image loading, annotated rendering and atomic output
//!   writing, plus [`process_card`] which chains them for one file.
//!
//! ## Quickstart
//!
//! ```no_run
//! use spray_card::{process_card, SprayCardConfig};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut config = SprayCardConfig::default();
//! config.analysis.sections = 15;
//!
//! let outcome = process_card(Path::new("card.jpeg"), &config)?;
//! for s in &outcome.analysis.sections {
//!     println!("section {}: {:.1}%", s.index + 1, s.coverage_pct);
//! }
//! println!("annotated image: {}", outcome.output_path.display());
//! # Ok(())
//! # }
//! ```

pub use spray_card_core as core;

pub use spray_card_core::{
    analyze, AnalysisError, AnalysisParams, CoverageAnalysis, CoverageSummary, LumaWeights,
    RemainderPolicy, SectionResult, DEFAULT_SECTIONS,
};

mod config;
mod report;
mod staging;

pub use config::{ConfigIoError, RenderBackground, RenderParams, SprayCardConfig};
pub use report::CoverageReport;

#[cfg(feature = "image")]
mod error;
#[cfg(feature = "image")]
mod font;
#[cfg(feature = "image")]
pub mod io;
#[cfg(feature = "image")]
mod process;
#[cfg(feature = "image")]
pub mod render;

#[cfg(feature = "image")]
pub use error::SprayCardError;
#[cfg(feature = "image")]
pub use process::{process_card, CardOutcome};
