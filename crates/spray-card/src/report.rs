//! JSON report of a coverage analysis.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use spray_card_core::{
    AnalysisParams, CoverageAnalysis, CoverageSummary, OtsuThreshold, SectionResult,
};

use crate::config::ConfigIoError;
use crate::staging::{stage_bytes, StagedFile};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageReport {
    pub image_path: String,
    #[serde(default)]
    pub output_path: Option<String>,
    pub width: usize,
    pub height: usize,
    pub params: AnalysisParams,
    pub threshold: OtsuThreshold,
    pub sections: Vec<SectionResult>,
    pub summary: CoverageSummary,
}

impl CoverageReport {
    pub fn new(
        image_path: &Path,
        output_path: Option<&Path>,
        params: &AnalysisParams,
        analysis: &CoverageAnalysis,
    ) -> Self {
        Self {
            image_path: image_path.to_string_lossy().into_owned(),
            output_path: output_path.map(|p| p.to_string_lossy().into_owned()),
            width: analysis.width,
            height: analysis.height,
            params: *params,
            threshold: analysis.threshold,
            sections: analysis.sections.clone(),
            summary: analysis.summary,
        }
    }

    /// Load a report from JSON on disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this report to disk as pretty JSON, atomically.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigIoError> {
        self.stage_json(path.as_ref())?.persist()?;
        Ok(())
    }

    /// Serialize into a staged temp file next to `path`.
    pub(crate) fn stage_json(&self, path: &Path) -> Result<StagedFile, ConfigIoError> {
        let json = serde_json::to_string_pretty(self)?;
        Ok(stage_bytes(json.as_bytes(), path)?)
    }
}
