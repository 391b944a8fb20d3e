use std::path::PathBuf;

use spray_card_core::AnalysisError;

use crate::config::ConfigIoError;

/// Errors produced by the file-level helpers.
#[derive(thiserror::Error, Debug)]
pub enum SprayCardError {
    #[error("cannot read image {}: {source}", .path.display())]
    InvalidImage {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("no image encoder for output path {}", .path.display())]
    UnsupportedOutputFormat { path: PathBuf },

    #[error("cannot encode {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("cannot write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigIoError),
}
