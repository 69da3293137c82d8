//! Layered loading of commodity data files.
//!
//! Sources load in the order given; within a directory, files load in sorted
//! path order. The resulting record order is the precedence order used by the
//! index builder (later wins).
//!
//! A file that fails to read, parse or validate is skipped as a whole and
//! reported as `"Error loading <path>: <detail>"`; the remaining files still
//! load.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_yaml::Value;
use tracing::{debug, warn};

use crate::bundled::BUNDLED_FILES;
use crate::{Commodity, CommodityFile, LoadError};

/// File extensions picked up when walking a directory.
pub const DATA_FILE_EXTENSIONS: [&str; 2] = ["yaml", "yml"];

/// One layer of commodity data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrySource {
    /// Files packaged with the library.
    Bundled,
    /// A data file, or a directory walked recursively.
    Path(PathBuf),
}

/// Records and per-file errors accumulated over a load.
#[derive(Debug, Default)]
pub struct LoadOutcome {
    pub records: Vec<Commodity>,
    pub errors: Vec<String>,
}

impl LoadOutcome {
    fn record_error(&mut self, label: &str, error: impl std::fmt::Display) {
        let message = format!("Error loading {label}: {error}");
        warn!("{message}");
        self.errors.push(message);
    }
}

/// Load every source in order.
pub fn load(sources: &[RegistrySource]) -> LoadOutcome {
    let mut outcome = LoadOutcome::default();
    for source in sources {
        match source {
            RegistrySource::Bundled => load_bundled(&mut outcome),
            RegistrySource::Path(path) => load_path(path, &mut outcome),
        }
    }
    debug!(
        records = outcome.records.len(),
        errors = outcome.errors.len(),
        "commodity load finished"
    );
    outcome
}

fn load_bundled(outcome: &mut LoadOutcome) {
    for file in BUNDLED_FILES {
        match parse_document(file.contents) {
            Ok(records) => outcome.records.extend(records),
            Err(error) => outcome.record_error(&file.label(), error),
        }
    }
}

/// Load a single file, or every data file below a directory.
///
/// A path that does not exist is skipped without error.
pub fn load_path(path: &Path, outcome: &mut LoadOutcome) {
    if !path.exists() {
        debug!(path = %path.display(), "skipping missing registry path");
        return;
    }

    if path.is_dir() {
        match discover_files(path) {
            Ok(files) => {
                for file in files {
                    load_file(&file, outcome);
                }
            }
            Err(error) => outcome.record_error(&path.display().to_string(), error),
        }
    } else {
        load_file(path, outcome);
    }
}

/// Recursively list data files below `dir`, sorted by path.
///
/// Symlinked directories are not descended into; symlinked files are kept.
pub fn discover_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    collect_files(dir, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        let path = entry.path();
        if file_type.is_dir() {
            collect_files(&path, files)?;
        } else if (!file_type.is_symlink() || path.is_file()) && has_data_extension(&path) {
            files.push(path);
        }
    }
    Ok(())
}

fn has_data_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| DATA_FILE_EXTENSIONS.contains(&ext))
}

fn load_file(path: &Path, outcome: &mut LoadOutcome) {
    let label = path.display().to_string();
    let result = fs::read_to_string(path)
        .map_err(LoadError::from)
        .and_then(|contents| parse_document(&contents));

    match result {
        Ok(records) => {
            debug!(path = %label, count = records.len(), "loaded commodity file");
            outcome.records.extend(records);
        }
        Err(error) => outcome.record_error(&label, error),
    }
}

/// Parse one YAML document holding a `commodities` list.
///
/// Duplicate mapping keys anywhere in the document are rejected. An empty
/// document yields no records.
pub fn parse_document(contents: &str) -> Result<Vec<Commodity>, LoadError> {
    if is_blank_document(contents) {
        return Ok(Vec::new());
    }

    // Parsing into `Value` first rejects duplicate keys before any typed
    // deserialization can silently keep the last one.
    let value: Value = serde_yaml::from_str(contents).map_err(|error| {
        let message = error.to_string();
        if message.contains("duplicate") {
            LoadError::DuplicateKey(message)
        } else {
            LoadError::Parse(error)
        }
    })?;

    if value.is_null() {
        return Ok(Vec::new());
    }

    let file: CommodityFile = serde_yaml::from_value(value).map_err(LoadError::Schema)?;
    Ok(file.commodities)
}

fn is_blank_document(contents: &str) -> bool {
    contents.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#')
    })
}
