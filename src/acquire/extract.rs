//! Filtered archive extraction.
//!
//! Extraction works against [`ArchiveEntries`], anything that can hand out entries
//! as (relative path, byte stream) pairs. [`TarGzArchive`] is the gzip-compressed
//! tarball implementation used for MaxMind downloads.

use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Component, Path, PathBuf};

use flate2::read::GzDecoder;
use tar::Archive;

use crate::error_handling::ExtractError;

/// Visitor invoked once per file entry with its relative path and contents.
pub type EntryVisitor<'a> = dyn FnMut(&Path, &mut dyn Read) -> Result<(), ExtractError> + 'a;

/// An archive whose file entries can be walked in order.
pub trait ArchiveEntries {
    /// Calls `visit` for every regular file entry.
    fn for_each_entry(&mut self, visit: &mut EntryVisitor<'_>) -> Result<(), ExtractError>;
}

/// A `.tar.gz` file on disk.
#[derive(Debug, Clone)]
pub struct TarGzArchive {
    path: PathBuf,
}

impl TarGzArchive {
    /// Points at the archive; nothing is read until entries are walked.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ArchiveEntries for TarGzArchive {
    fn for_each_entry(&mut self, visit: &mut EntryVisitor<'_>) -> Result<(), ExtractError> {
        let archive_error = |source: std::io::Error| ExtractError::Archive {
            path: self.path.clone(),
            source,
        };

        let file = File::open(&self.path).map_err(archive_error)?;
        let mut archive = Archive::new(GzDecoder::new(BufReader::new(file)));

        for entry_result in archive.entries().map_err(archive_error)? {
            let mut entry = entry_result.map_err(archive_error)?;
            if !entry.header().entry_type().is_file() {
                continue;
            }
            let entry_path = entry.path().map_err(archive_error)?.into_owned();
            visit(&entry_path, &mut entry)?;
        }

        Ok(())
    }
}

/// Selects archive entries by extension after stripping leading path segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionFilter {
    extension: String,
    strip_depth: usize,
}

impl ExtractionFilter {
    /// Keeps entries whose stripped path ends in `.<extension>`.
    pub fn by_extension(extension: impl Into<String>, strip_depth: usize) -> Self {
        Self {
            extension: extension.into(),
            strip_depth,
        }
    }

    /// Extension this filter selects (without the dot).
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Returns the output path relative to the target directory, or `None` if the
    /// entry is not selected.
    ///
    /// Entries containing `..`, a root or a drive prefix are never selected.
    pub fn apply(&self, entry_path: &Path) -> Option<PathBuf> {
        let mut segments = Vec::new();
        for component in entry_path.components() {
            match component {
                Component::Normal(segment) => segments.push(segment),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
            }
        }

        let stripped: PathBuf = segments.into_iter().skip(self.strip_depth).collect();
        if stripped.as_os_str().is_empty() {
            return None;
        }

        (stripped.extension() == Some(OsStr::new(&self.extension))).then_some(stripped)
    }
}

/// Writes the entries selected by `filter` below `target_dir`.
///
/// Returns the paths written, in archive order. An empty result is not an error
/// here; callers decide how many matches they expect.
pub fn extract(
    archive: &mut dyn ArchiveEntries,
    target_dir: &Path,
    filter: &ExtractionFilter,
) -> Result<Vec<PathBuf>, ExtractError> {
    let mut written = Vec::new();

    archive.for_each_entry(
        &mut |entry_path: &Path, contents: &mut dyn Read| -> Result<(), ExtractError> {
            let Some(relative) = filter.apply(entry_path) else {
                log::debug!("Skipping archive entry {:?}", entry_path);
                return Ok(());
            };

            let out_path = target_dir.join(relative);
            let write_error = |source: std::io::Error| ExtractError::Write {
                path: out_path.clone(),
                source,
            };

            if let Some(parent) = out_path.parent() {
                std::fs::create_dir_all(parent).map_err(write_error)?;
            }
            let mut file = File::create(&out_path).map_err(write_error)?;
            let bytes = std::io::copy(contents, &mut file).map_err(write_error)?;

            log::info!("Extracted {:?} ({} bytes)", out_path, bytes);
            written.push(out_path);
            Ok(())
        },
    )?;

    Ok(written)
}
