//! Report Catalog
//!
//! File selection over the processed-cores directory. Report filenames
//! embed a 6-digit period token (e.g. "Core Report 062024.csv"); the
//! catalog surfaces those tokens and the files behind them so a front-end
//! can populate its pickers.

use crate::error::{DeepDiveError, Result};
use chrono::NaiveDate;
use itertools::Itertools;
use lazy_static::lazy_static;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

lazy_static! {
    static ref SEQUENCE_RE: Regex = Regex::new(r"\d{6}").unwrap();
}

/// Default location of the pre-processed report exports.
pub const DEFAULT_REPORTS_DIR: &str = "processed_cores";

/// One selectable report file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFile {
    /// Actual filename inside the reports directory.
    pub file_name: String,
    /// User-facing label: the filename up to its first dot.
    pub display_name: String,
}

impl ReportFile {
    fn from_file_name(file_name: String) -> Self {
        let display_name = file_name
            .split('.')
            .next()
            .unwrap_or(file_name.as_str())
            .to_string();
        Self {
            file_name,
            display_name,
        }
    }
}

/// Scans a reports directory for period tokens and selectable files.
pub struct ReportCatalog {
    dir: PathBuf,
}

impl ReportCatalog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Resolve a selected filename to its full path.
    pub fn path_of(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    fn file_names(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.dir).map_err(|e| {
            DeepDiveError::Catalog(format!("Cannot read {}: {}", self.dir.display(), e))
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                DeepDiveError::Catalog(format!("Cannot read {}: {}", self.dir.display(), e))
            })?;
            if entry.path().is_file() {
                names.push(entry.file_name().to_string_lossy().to_string());
            }
        }
        Ok(names)
    }

    /// All distinct 6-digit period tokens across filenames, newest first.
    pub fn sequences(&self) -> Result<Vec<String>> {
        let sequences = self
            .file_names()?
            .iter()
            .flat_map(|name| {
                SEQUENCE_RE
                    .find_iter(name)
                    .map(|m| m.as_str().to_string())
                    .collect::<Vec<_>>()
            })
            .unique()
            .sorted_by(|a, b| b.cmp(a))
            .collect();
        Ok(sequences)
    }

    /// Selectable files, restricted to a period token when one is given.
    /// Sorted by display label so pickers are stable.
    pub fn files(&self, sequence: Option<&str>) -> Result<Vec<ReportFile>> {
        let files = self
            .file_names()?
            .into_iter()
            .filter(|name| match sequence {
                Some(token) => name.contains(token),
                None => true,
            })
            .map(ReportFile::from_file_name)
            .sorted_by(|a, b| a.display_name.cmp(&b.display_name))
            .collect();
        Ok(files)
    }
}

/// Human-readable label for a period token.
///
/// Tokens follow the MMYYYY export convention; anything that does not
/// parse as a month/year is shown verbatim.
pub fn sequence_label(token: &str) -> String {
    if token.len() == 6 {
        if let (Ok(month), Ok(year)) = (token[..2].parse::<u32>(), token[2..].parse::<i32>()) {
            if let Some(date) = NaiveDate::from_ymd_opt(year, month, 1) {
                return date.format("%b %Y").to_string();
            }
        }
    }
    token.to_string()
}
