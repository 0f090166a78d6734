//! Reading source files and finding them on disk.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::trace;

use super::SourceFile;
use crate::base::Language;
use crate::error::{Error, Result};

/// Read one file, recording its read-only flag as a file attribute.
pub fn read_source(path: &Path) -> Result<SourceFile> {
    let text = fs::read_to_string(path).map_err(|err| Error::io(path, err))?;
    let metadata = fs::metadata(path).map_err(|err| Error::io(path, err))?;
    let mut source = SourceFile::new(path, text);
    if metadata.permissions().readonly() {
        source.attributes.push("ReadOnly".to_string());
    }
    Ok(source)
}

/// Every file under `dir` with a supported extension, sorted by path.
pub fn collect_source_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    collect(dir, &mut paths)?;
    paths.sort();
    trace!(dir = %dir.display(), files = paths.len(), "collected source files");
    Ok(paths)
}

fn collect(dir: &Path, paths: &mut Vec<PathBuf>) -> Result<()> {
    let entries = fs::read_dir(dir).map_err(|err| Error::io(dir, err))?;
    for entry in entries {
        let path = entry.map_err(|err| Error::io(dir, err))?.path();
        if path.is_dir() {
            collect(&path, paths)?;
        } else if Language::from_path(&path).is_some() {
            paths.push(path);
        }
    }
    Ok(())
}
