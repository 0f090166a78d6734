//! Supported source languages.

use std::path::Path;

/// Source language of a file handed to the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    CSharp,
    VisualBasic,
}

impl Language {
    /// Detect the language from a file extension (`cs`, `vb`), case-insensitively.
    pub fn from_extension(extension: &str) -> Option<Self> {
        if extension.eq_ignore_ascii_case("cs") {
            Some(Self::CSharp)
        } else if extension.eq_ignore_ascii_case("vb") {
            Some(Self::VisualBasic)
        } else {
            None
        }
    }

    /// Detect the language from a file path.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CSharp => "C#",
            Self::VisualBasic => "Visual Basic",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
