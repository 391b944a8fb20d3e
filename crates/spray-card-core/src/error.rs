/// Errors returned by the coverage analysis stages.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("invalid image: {reason}")]
    InvalidImage { reason: String },

    #[error("image has no pixels")]
    EmptyImage,

    #[error("invalid section count {sections} for an image {width} px wide (expected 1..={width})")]
    InvalidSectionCount { sections: usize, width: usize },
}

impl AnalysisError {
    pub(crate) fn invalid_image(reason: impl Into<String>) -> Self {
        Self::InvalidImage {
            reason: reason.into(),
        }
    }
}
