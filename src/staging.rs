//! Clipboard Staging
//!
//! Text that crosses the clipboard boundary in either direction. Outbound
//! tables are rendered as a tab-separated grid, which Excel expands into
//! cells on paste; step 4 reads the same dialect back in. The OS clipboard
//! itself stays outside the crate behind [`StageSink`].

use crate::error::{DeepDiveError, Result};
use csv::ReaderBuilder;
use polars::prelude::*;
use std::io::Write;

/// Render a frame as an Excel-paste-compatible grid.
///
/// Header row first, then one line per row; nulls become empty cells.
pub fn to_excel_text(df: &DataFrame) -> Result<String> {
    let names = df.get_column_names();
    let mut out = String::new();
    out.push_str(&names.join("\t"));
    out.push('\n');

    for row in 0..df.height() {
        let mut cells: Vec<String> = Vec::with_capacity(names.len());
        for series in df.get_columns() {
            let value = series
                .get(row)
                .map_err(|e| DeepDiveError::Staging(format!("Row {}: {}", row, e)))?;
            // Floats are written out in full; the default AnyValue display
            // switches to scientific notation above ~1e7, which Excel would
            // paste as text.
            let cell = match value {
                AnyValue::Null => String::new(),
                AnyValue::String(s) => s.to_string(),
                AnyValue::StringOwned(s) => s.to_string(),
                AnyValue::Float64(v) => v.to_string(),
                AnyValue::Float32(v) => v.to_string(),
                AnyValue::Int64(v) => v.to_string(),
                AnyValue::Int32(v) => v.to_string(),
                AnyValue::Boolean(v) => v.to_string(),
                other => other.to_string(),
            };
            cells.push(cell);
        }
        out.push_str(&cells.join("\t"));
        out.push('\n');
    }

    Ok(out)
}

/// Parse a pasted-back grid into a string-typed frame.
///
/// Everything stays text here; numeric coercion happens in the pipeline
/// that consumes the table, the same as for a freshly loaded report.
pub fn from_excel_text(text: &str) -> Result<DataFrame> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = rdr
        .headers()
        .map_err(|e| DeepDiveError::Staging(format!("Failed to read pasted headers: {}", e)))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect::<Vec<_>>();

    if headers.is_empty() {
        return Err(DeepDiveError::Staging(
            "Pasted grid has no header row".to_string(),
        ));
    }

    let mut columns: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    for record in rdr.records() {
        let record =
            record.map_err(|e| DeepDiveError::Staging(format!("Failed to read pasted row: {}", e)))?;
        for (idx, column) in columns.iter_mut().enumerate() {
            let cell = record.get(idx).unwrap_or("");
            if cell.is_empty() {
                column.push(None);
            } else {
                column.push(Some(cell.to_string()));
            }
        }
    }

    let series = headers
        .iter()
        .zip(columns)
        .map(|(name, values)| Series::new(name, values))
        .collect::<Vec<_>>();

    DataFrame::new(series)
        .map_err(|e| DeepDiveError::Staging(format!("Pasted grid is not tabular: {}", e)))
}

/// Where a staged table goes. The GUI front-end puts payloads on the OS
/// clipboard; the CLI writes them to stdout for the shell to forward.
pub trait StageSink {
    fn stage(&mut self, label: &str, df: &DataFrame) -> Result<()>;
}

/// Stages rendered grids to any writer.
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> StageSink for WriterSink<W> {
    fn stage(&mut self, _label: &str, df: &DataFrame) -> Result<()> {
        let text = to_excel_text(df)?;
        self.writer.write_all(text.as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Collects staged payloads in memory; used by session tests.
#[derive(Default)]
pub struct MemorySink {
    pub staged: Vec<(String, String)>,
}

impl StageSink for MemorySink {
    fn stage(&mut self, label: &str, df: &DataFrame) -> Result<()> {
        self.staged.push((label.to_string(), to_excel_text(df)?));
        Ok(())
    }
}
