use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PerceptronError {
    #[error("could not access {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("layer file holds {actual} bytes, expected {expected}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("layer dimensions differ: {left:?} vs {right:?}")]
    DimensionMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, PerceptronError>;

impl PerceptronError {
    /// Wraps an I/O error together with the path that caused it.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PerceptronError::Io {
            path: path.into(),
            source,
        }
    }
}
