// RustPixel
// copyright zipxing@hotmail.com 2022～2025
//
// Error types for atlas generation

use std::path::{Path, PathBuf};

/// Atlas generation result type
pub type AtlasResult<T> = Result<T, AtlasError>;

/// Every failure aborts the whole build, none of them are retried.
#[derive(Debug)]
pub enum AtlasError {
    /// Invalid grid or character set configuration
    Config(String),
    /// Font or sprite missing or unreadable
    ResourceLoad { path: PathBuf, reason: String },
    /// Failed to write an output file
    Io { path: PathBuf, source: std::io::Error },
    /// Failed to encode an output image
    Image { path: PathBuf, source: image::ImageError },
}

impl AtlasError {
    pub fn resource(path: &Path, reason: impl ToString) -> Self {
        AtlasError::ResourceLoad {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    pub fn io(path: &Path, source: std::io::Error) -> Self {
        AtlasError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Attach the file an I/O or encoding error refers to
    pub fn with_path(self, file: &Path) -> Self {
        match self {
            AtlasError::Io { source, .. } => AtlasError::io(file, source),
            AtlasError::Image { source, .. } => AtlasError::Image {
                path: file.to_path_buf(),
                source,
            },
            other => other,
        }
    }
}

impl std::fmt::Display for AtlasError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AtlasError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AtlasError::ResourceLoad { path, reason } => {
                write!(f, "Cannot load {}: {}", path.display(), reason)
            }
            AtlasError::Io { path, source } => {
                write!(f, "Cannot write {}: {}", path.display(), source)
            }
            AtlasError::Image { path, source } => {
                write!(f, "Cannot encode {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for AtlasError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AtlasError::Io { source, .. } => Some(source),
            AtlasError::Image { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<std::io::Error> for AtlasError {
    fn from(err: std::io::Error) -> AtlasError {
        AtlasError::Io {
            path: PathBuf::new(),
            source: err,
        }
    }
}

impl From<image::ImageError> for AtlasError {
    fn from(err: image::ImageError) -> AtlasError {
        AtlasError::Image {
            path: PathBuf::new(),
            source: err,
        }
    }
}
