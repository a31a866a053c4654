//! Report Loading

use crate::error::{DeepDiveError, Result};
use polars::prelude::*;
use std::path::Path;

/// Load a pre-processed core report CSV into a frame.
///
/// Schema inference is bounded so a stray value deep in the file cannot
/// flip a column's type between runs; currency columns usually come in as
/// strings and are normalized later, per pipeline.
pub fn load_report(path: &Path) -> Result<DataFrame> {
    if !path.exists() {
        return Err(DeepDiveError::Catalog(format!(
            "Report file not found: {}",
            path.display()
        )));
    }

    let df = LazyCsvReader::new(path)
        .with_try_parse_dates(true)
        .with_infer_schema_length(Some(1000))
        .finish()
        .map_err(|e| DeepDiveError::Polars(format!("Failed to scan {}: {}", path.display(), e)))?
        .collect()
        .map_err(|e| {
            DeepDiveError::Polars(format!("Failed to collect {}: {}", path.display(), e))
        })?;

    Ok(df)
}
