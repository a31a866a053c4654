//! Configuration
//!
//! Optional JSON file overriding the built-in defaults, e.g.:
//!
//! ```json
//! { "reports_dir": "exports/cores", "target_vendor": "Supreme Lending", "top_n": 6 }
//! ```

use crate::aggregate::{DEFAULT_TARGET_VENDOR, DEFAULT_TOP_N};
use crate::catalog::DEFAULT_REPORTS_DIR;
use crate::error::{DeepDiveError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeepDiveConfig {
    /// Directory holding the pre-processed report exports.
    #[serde(default = "default_reports_dir")]
    pub reports_dir: PathBuf,

    /// Vendor whose volume share the step-4 summary breaks out.
    #[serde(default = "default_target_vendor")]
    pub target_vendor: String,

    /// Associates kept in the step-4 summary.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

fn default_reports_dir() -> PathBuf {
    PathBuf::from(DEFAULT_REPORTS_DIR)
}

fn default_target_vendor() -> String {
    DEFAULT_TARGET_VENDOR.to_string()
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

impl Default for DeepDiveConfig {
    fn default() -> Self {
        Self {
            reports_dir: default_reports_dir(),
            target_vendor: default_target_vendor(),
            top_n: default_top_n(),
        }
    }
}

impl DeepDiveConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DeepDiveError::Config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&content)
            .map_err(|e| DeepDiveError::Config(format!("Cannot parse {}: {}", path.display(), e)))
    }
}
