//! Crate-level error type.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigurationError;
use crate::parser::SyntaxError;

/// Failure of one unit of work: one file, or one configuration.
#[derive(Debug, Error)]
pub enum Error {
    /// Source that cannot be parsed.
    #[error("{}: {}", .path.display(), .source.format())]
    Syntax {
        path: PathBuf,
        #[source]
        source: SyntaxError,
    },

    /// Configuration that cannot be compiled.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// File that cannot be read.
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File whose extension names no supported language.
    #[error("{}: unsupported file extension", .path.display())]
    UnsupportedLanguage { path: PathBuf },
}

impl Error {
    pub fn syntax(path: impl Into<PathBuf>, source: SyntaxError) -> Self {
        Self::Syntax {
            path: path.into(),
            source,
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// The file the error concerns, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::Syntax { path, .. } | Self::Io { path, .. } | Self::UnsupportedLanguage { path } => {
                Some(path)
            }
            Self::Configuration(_) => None,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
