//! File-to-file processing of one spray card.

use std::fs;
use std::path::{Path, PathBuf};

use spray_card_core::{analyze, CoverageAnalysis};

use crate::config::{ConfigIoError, SprayCardConfig};
use crate::error::SprayCardError;
use crate::io::{load_raster, resolve_output_path, stage_image};
use crate::render::render_annotated;
use crate::report::CoverageReport;

/// Result of [`process_card`].
#[derive(Clone, Debug)]
pub struct CardOutcome {
    pub analysis: CoverageAnalysis,
    /// Annotated image that was written.
    pub output_path: PathBuf,
    /// JSON report that was written, when configured.
    pub report_path: Option<PathBuf>,
}

/// Load `input`, measure its coverage, and write the annotated image (and
/// the JSON report when `config.report_path` is set).
///
/// Outputs are staged as temp files and only moved into place once every
/// one of them has been written, so a failed run leaves no output behind.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "info", skip(config), fields(sections = config.analysis.sections))
)]
pub fn process_card(input: &Path, config: &SprayCardConfig) -> Result<CardOutcome, SprayCardError> {
    let raster = load_raster(input)?;
    let analysis = analyze(&raster.as_view(), &config.analysis)?;
    let annotated = render_annotated(&raster.as_view(), &analysis, &config.render)?;
    drop(raster);

    let output_path = resolve_output_path(input, config.output_filename.as_deref());
    let staged_image = stage_image(&annotated, &output_path)?;
    let report = match config.report_path.as_deref() {
        Some(path) => Some(
            CoverageReport::new(input, Some(&output_path), &config.analysis, &analysis)
                .stage_json(Path::new(path))?,
        ),
        None => None,
    };

    staged_image.persist().map_err(|source| SprayCardError::Io {
        path: output_path.clone(),
        source,
    })?;
    log::info!("wrote annotated image to {}", output_path.display());

    let report_path = match report.map(|staged| staged.persist()) {
        Some(Ok(path)) => {
            log::info!("wrote report to {}", path.display());
            Some(path)
        }
        Some(Err(err)) => {
            if let Err(cleanup) = fs::remove_file(&output_path) {
                log::warn!(
                    "cannot remove {} after failed report write: {cleanup}",
                    output_path.display()
                );
            }
            return Err(ConfigIoError::from(err).into());
        }
        None => None,
    };

    Ok(CardOutcome {
        analysis,
        output_path,
        report_path,
    })
}
