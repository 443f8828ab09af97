use std::path::PathBuf;

use crate::model::Mismatch;

#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("map structure: {0}")]
    Structural(String),

    #[error("map xml: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("config: {0}")]
    Config(String),

    #[error("chunk at ({chunk_x}, {chunk_y}): token {position} `{token}` is not a non-negative integer")]
    Parse {
        chunk_x: i64,
        chunk_y: i64,
        position: usize,
        token: String,
    },

    #[error("cannot parse screen index from `{file}`")]
    Naming { file: String },

    #[error("screen {index} lies outside the addressable tile range")]
    ScreenOutOfRange { index: u32 },

    #[error("size {actual} != expected {expected}")]
    SizeMismatch { actual: usize, expected: usize },

    #[error("{0}")]
    ContentMismatch(Mismatch),

    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("no binary files found matching `{0}`")]
    NoBinaries(String),

    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl VerifyError {
    /// Whether the error aborts the whole run instead of a single file.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            VerifyError::Naming { .. }
                | VerifyError::ScreenOutOfRange { .. }
                | VerifyError::SizeMismatch { .. }
                | VerifyError::ContentMismatch(_)
                | VerifyError::Io { .. }
        )
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            VerifyError::NotFound(path)
        } else {
            VerifyError::Io { path, source }
        }
    }
}

pub type Result<T> = std::result::Result<T, VerifyError>;
