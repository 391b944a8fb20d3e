//! JSON configuration for a spray card run.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use spray_card_core::AnalysisParams;

#[derive(thiserror::Error, Debug)]
pub enum ConfigIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// What the annotations are drawn on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderBackground {
    /// The scanned card as loaded.
    #[default]
    Original,
    /// The binarized deposit mask, deposit black on white.
    Mask,
}

fn default_line_color() -> [u8; 3] {
    [0, 0, 0]
}

fn default_text_color() -> [u8; 3] {
    [255, 0, 0]
}

/// Annotation style.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderParams {
    #[serde(default)]
    pub background: RenderBackground,
    /// Section border thickness in pixels; 0 picks `max(1, min(w, h) / 200)`.
    #[serde(default)]
    pub line_thickness: u32,
    #[serde(default = "default_line_color")]
    pub line_color: [u8; 3],
    #[serde(default = "default_text_color")]
    pub text_color: [u8; 3],
    /// Pixels per font dot; `None` fits the labels to the narrowest section.
    #[serde(default)]
    pub label_scale: Option<u32>,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            background: RenderBackground::default(),
            line_thickness: 0,
            line_color: default_line_color(),
            text_color: default_text_color(),
            label_scale: None,
        }
    }
}

/// Full run configuration, loadable from JSON.
///
/// Every field has a default, so `{}` is a valid config.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SprayCardConfig {
    /// Input image; the CLI argument takes precedence.
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(default)]
    pub analysis: AnalysisParams,
    /// Replaces the derived `<stem>_analyzed.<ext>` name.
    #[serde(default)]
    pub output_filename: Option<String>,
    /// Where to write the JSON report, if anywhere.
    #[serde(default)]
    pub report_path: Option<String>,
    #[serde(default)]
    pub render: RenderParams,
}

impl SprayCardConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spray_card_core::{LumaWeights, RemainderPolicy, DEFAULT_SECTIONS};

    #[test]
    fn empty_json_uses_defaults() {
        let cfg: SprayCardConfig = serde_json::from_str("{}").expect("parse");
        assert_eq!(cfg, SprayCardConfig::default());
        assert_eq!(cfg.analysis.sections, DEFAULT_SECTIONS);
        assert_eq!(cfg.render.text_color, [255, 0, 0]);
    }

    #[test]
    fn partial_json_overrides_fields() {
        let cfg: SprayCardConfig = serde_json::from_str(
            r#"{
                "analysis": { "sections": 15, "luma": "rec709", "remainder": "distribute" },
                "output_filename": "out.png",
                "render": { "background": "mask", "line_thickness": 4 }
            }"#,
        )
        .expect("parse");
        assert_eq!(cfg.analysis.sections, 15);
        assert_eq!(cfg.analysis.luma, LumaWeights::Rec709);
        assert_eq!(cfg.analysis.remainder, RemainderPolicy::Distribute);
        assert_eq!(cfg.output_filename.as_deref(), Some("out.png"));
        assert_eq!(cfg.render.background, RenderBackground::Mask);
        assert_eq!(cfg.render.line_thickness, 4);
        assert_eq!(cfg.render.line_color, [0, 0, 0]);
    }

    #[test]
    fn json_file_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("cfg.json");
        let mut cfg = SprayCardConfig::default();
        cfg.analysis.sections = 6;
        cfg.report_path = Some("report.json".into());
        cfg.write_json(&path).expect("write");
        assert_eq!(SprayCardConfig::load_json(&path).expect("load"), cfg);
    }
}
