//! Report Schema
//!
//! Column names fixed by the upstream core report format.

use crate::error::{DeepDiveError, Result};
use polars::prelude::*;

/// Single-letter vendor category code; only "M" rows participate.
pub const VENDOR_CATEGORY: &str = "Ven";

/// Lending entity attributed to a closed sale.
pub const VENDOR_NAME: &str = "Vendor Name";

/// Loan officer attributed to a closed sale.
pub const ASSOCIATE_NAME: &str = "Associate Name";

/// Year-to-date closed volume; currency text or numeric in the source.
pub const CLOSED_VOLUME: &str = "Closed Sales Volume YTD";

/// Category value that marks a row as eligible for any report.
pub const ELIGIBLE_CATEGORY: &str = "M";

/// Derived column: volume attributable to the target vendor.
pub const TARGET_VOLUME: &str = "Supreme Volume";

/// Derived column: target vendor share of an associate's total volume.
pub const TARGET_SHARE: &str = "Supreme Volume %";

/// Fail with the first required column that is absent from the frame.
pub fn ensure_columns(df: &DataFrame, required: &[&str]) -> Result<()> {
    let present = df.get_column_names();
    for name in required {
        if !present.iter().any(|c| c == name) {
            return Err(DeepDiveError::MissingField(name.to_string()));
        }
    }
    Ok(())
}
