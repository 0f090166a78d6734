//! Arranging many files.
//!
//! Files are independent: each is read, parsed and arranged on its own, so
//! a batch fans out over a rayon parallel iterator sharing one [`Arranger`].
//! Every file yields its own `Result`, in input order; one failing file
//! never stops the others.

mod files;

#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, warn};

pub use files::{collect_source_files, read_source};

use crate::arrange::Arranger;
use crate::base::Language;
use crate::condition::FileContext;
use crate::elements::CodeElement;
use crate::error::{Error, Result};
use crate::parser::{ParserOptions, parse_source_with};

/// Source text of one file, already in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub text: String,
    /// File system attributes, for `$(File.Attributes)`
    pub attributes: Vec<String>,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
            attributes: Vec::new(),
        }
    }

    pub fn language(&self) -> Option<Language> {
        Language::from_path(&self.path)
    }
}

/// The arranged element tree of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrangedFile {
    pub path: PathBuf,
    pub language: Language,
    pub elements: Vec<CodeElement>,
}

/// Parse and arrange one in-memory file.
pub fn arrange_source(
    arranger: &Arranger,
    options: &ParserOptions,
    source: &SourceFile,
) -> Result<ArrangedFile> {
    let language = source
        .language()
        .ok_or_else(|| Error::UnsupportedLanguage {
            path: source.path.clone(),
        })?;
    let parsed = parse_source_with(language, &source.text, options)
        .map_err(|err| Error::syntax(&source.path, err))?;
    let file = FileContext::new(&source.path).with_attributes(source.attributes.iter().cloned());
    let elements = arranger.arrange(&parsed, &file);
    debug!(path = %source.path.display(), %language, "arranged file");
    Ok(ArrangedFile {
        path: source.path.clone(),
        language,
        elements,
    })
}

/// Parse and arrange in-memory files in parallel.
pub fn arrange_sources(
    arranger: &Arranger,
    options: &ParserOptions,
    sources: &[SourceFile],
) -> Vec<Result<ArrangedFile>> {
    let results: Vec<Result<ArrangedFile>> = sources
        .par_iter()
        .map(|source| arrange_source(arranger, options, source))
        .collect();
    report(&results);
    results
}

/// Read, parse and arrange files in parallel.
pub fn arrange_files<P>(
    arranger: &Arranger,
    options: &ParserOptions,
    paths: &[P],
) -> Vec<Result<ArrangedFile>>
where
    P: AsRef<Path> + Sync,
{
    let results: Vec<Result<ArrangedFile>> = paths
        .par_iter()
        .map(|path| {
            let source = read_source(path.as_ref())?;
            arrange_source(arranger, options, &source)
        })
        .collect();
    report(&results);
    results
}

/// Arrange every supported source file under `dir`.
pub fn arrange_directory(
    arranger: &Arranger,
    options: &ParserOptions,
    dir: &Path,
) -> Result<Vec<Result<ArrangedFile>>> {
    let paths = collect_source_files(dir)?;
    Ok(arrange_files(arranger, options, &paths))
}

fn report(results: &[Result<ArrangedFile>]) {
    let failed = results.iter().filter(|result| result.is_err()).count();
    if failed > 0 {
        warn!(failed, total = results.len(), "some files could not be arranged");
    } else {
        debug!(total = results.len(), "arranged all files");
    }
}
