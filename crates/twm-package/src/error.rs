use std::path::PathBuf;

use thiserror::Error;
use zip::result::ZipError;

#[derive(Debug, Error)]
pub enum PackageError {
    #[error("file {path} does not exist")]
    NotFound { path: PathBuf },

    #[error("unsupported file type {path} (expected .twbx, .tdsx, .twb or .tds)")]
    UnsupportedExtension { path: PathBuf },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("zip error in {path}: {source}")]
    Zip {
        path: PathBuf,
        #[source]
        source: ZipError,
    },

    #[error("cannot locate descriptor in {path}: {message}")]
    PrimaryDescriptor { path: PathBuf, message: String },
}

impl PackageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn zip(path: impl Into<PathBuf>, source: ZipError) -> Self {
        Self::Zip {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, PackageError>;
