use serde::{Deserialize, Serialize};

use crate::grayscale::LumaWeights;
use crate::sections::RemainderPolicy;

/// Number of vertical bands when nothing else is configured.
pub const DEFAULT_SECTIONS: usize = 10;

fn default_sections() -> usize {
    DEFAULT_SECTIONS
}

/// Parameters of the measurement pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisParams {
    /// Number of equal-width vertical bands, `1..=image width`.
    #[serde(default = "default_sections")]
    pub sections: usize,
    /// Luma formula used for RGB input.
    #[serde(default)]
    pub luma: LumaWeights,
    /// Placement of the columns left over by `width / sections`.
    #[serde(default)]
    pub remainder: RemainderPolicy,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            sections: DEFAULT_SECTIONS,
            luma: LumaWeights::default(),
            remainder: RemainderPolicy::default(),
        }
    }
}

impl AnalysisParams {
    pub fn with_sections(sections: usize) -> Self {
        Self {
            sections,
            ..Self::default()
        }
    }
}
