//! Attributes that conditions, GroupBy and SortBy read from elements and
//! files.

use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::elements::CodeElement;

/// An element attribute addressable as `$(Name)` or `$(Element.Name)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ElementAttribute {
    #[default]
    Name,
    Access,
    Modifier,
    ElementType,
    /// Field/property/event type, return type, or type subkind
    Type,
    /// Comma-joined names of the applied attributes
    Attributes,
}

impl ElementAttribute {
    pub const ALL: [ElementAttribute; 6] = [
        Self::Name,
        Self::Access,
        Self::Modifier,
        Self::ElementType,
        Self::Type,
        Self::Attributes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Access => "Access",
            Self::Modifier => "Modifier",
            Self::ElementType => "ElementType",
            Self::Type => "Type",
            Self::Attributes => "Attributes",
        }
    }

    /// Look an attribute up by name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|attribute| attribute.as_str().eq_ignore_ascii_case(name))
    }

    /// The attribute's textual value for `element`.
    pub fn value<'e>(&self, element: &'e CodeElement) -> Cow<'e, str> {
        match self {
            Self::Name => Cow::Borrowed(element.name.as_str()),
            Self::Access => Cow::Borrowed(element.access.as_str()),
            Self::Modifier => Cow::Owned(element.modifiers.to_string()),
            Self::ElementType => Cow::Borrowed(element.element_type().as_str()),
            Self::Type => Cow::Borrowed(element.type_text()),
            Self::Attributes => {
                let names: Vec<&str> = element
                    .attributes
                    .iter()
                    .flat_map(|attribute| attribute.names())
                    .collect();
                Cow::Owned(names.join(", "))
            }
        }
    }
}

impl fmt::Display for ElementAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file attribute addressable as `$(File.Name)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FileAttribute {
    /// File name without directories
    Name,
    Path,
    /// Comma-joined file system attributes, e.g. `ReadOnly`
    Attributes,
}

impl FileAttribute {
    pub const ALL: [FileAttribute; 3] = [Self::Name, Self::Path, Self::Attributes];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Path => "Path",
            Self::Attributes => "Attributes",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|attribute| attribute.as_str().eq_ignore_ascii_case(name))
    }

    pub fn value<'f>(&self, file: &'f FileContext) -> Cow<'f, str> {
        match self {
            Self::Name => file
                .path
                .file_name()
                .map(|name| name.to_string_lossy())
                .unwrap_or(Cow::Borrowed("")),
            Self::Path => file.path.to_string_lossy(),
            Self::Attributes => Cow::Owned(file.attributes.join(", ")),
        }
    }
}

impl fmt::Display for FileAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The file an arranged tree came from, for `$(File.*)` references.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileContext {
    pub path: PathBuf,
    pub attributes: Vec<String>,
}

impl FileContext {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            attributes: Vec::new(),
        }
    }

    pub fn with_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes = attributes.into_iter().map(Into::into).collect();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
