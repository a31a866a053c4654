//! Currency Normalization
//!
//! The upstream report exports monetary columns as currency text
//! ("$1,234.56") or plain numbers depending on how the sheet was saved.
//! Aggregation requires Float64, so string columns are scrubbed and parsed
//! before any grouping runs.

use crate::error::{DeepDiveError, Result};
use polars::prelude::*;

/// Strip `$` and comma separators from a currency cell and parse it.
pub fn clean_currency(raw: &str) -> std::result::Result<f64, String> {
    let stripped: String = raw
        .trim()
        .chars()
        .filter(|c| *c != '$' && *c != ',')
        .collect();
    stripped.parse::<f64>().map_err(|_| raw.to_string())
}

/// Replace a currency column with its Float64 equivalent.
///
/// String columns go through [`clean_currency`] cell by cell so a bad value
/// can be reported with its row; already-numeric columns are cast through
/// unchanged. Null cells stay null and drop out of later sums.
pub fn normalize_currency_column(df: DataFrame, column: &str) -> Result<DataFrame> {
    let series = df
        .column(column)
        .map_err(|_| DeepDiveError::MissingField(column.to_string()))?;

    let numeric = match series.dtype() {
        DataType::String => {
            let values = series
                .str()
                .map_err(|e| DeepDiveError::Polars(format!("Column {}: {}", column, e)))?;

            let mut parsed: Vec<Option<f64>> = Vec::with_capacity(values.len());
            for (row, cell) in values.into_iter().enumerate() {
                match cell {
                    None => parsed.push(None),
                    Some(raw) => match clean_currency(raw) {
                        Ok(v) => parsed.push(Some(v)),
                        Err(value) => {
                            return Err(DeepDiveError::Format {
                                column: column.to_string(),
                                row,
                                value,
                            })
                        }
                    },
                }
            }
            Series::new(column, parsed)
        }
        _ => series
            .cast(&DataType::Float64)
            .map_err(|e| DeepDiveError::Polars(format!("Cast {} to Float64: {}", column, e)))?,
    };

    let mut result = df;
    result
        .with_column(numeric)
        .map_err(|e| DeepDiveError::Polars(format!("Replace column {}: {}", column, e)))?;

    Ok(result)
}
