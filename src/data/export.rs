use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::model::SmoothedSeriesTable;
use crate::error::PlotError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn from_path(path: &Path) -> Result<Self, PlotError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(PlotError::UnsupportedExport {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// `--export` value parser: rejects unknown extensions before anything
/// is written.
pub fn parse_export(s: &str) -> Result<PathBuf, PlotError> {
    let path = PathBuf::from(s);
    ExportFormat::from_path(&path)?;
    Ok(path)
}

/// Write the smoothed table next to the chart. Dispatch by extension.
///
/// * `.csv`  – header of series names, one record per epoch, undefined
///   values left empty
/// * `.json` – `{ "window", "columns": [{ "name", "values" }], "dropped" }`
pub fn export(table: &SmoothedSeriesTable, path: &Path) -> Result<()> {
    let format = ExportFormat::from_path(path)?;
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    match format {
        ExportFormat::Csv => write_csv(table, file)?,
        ExportFormat::Json => write_json(table, file)?,
    }

    log::info!("Exported smoothed series to {}", path.display());
    Ok(())
}

fn write_csv<W: Write>(table: &SmoothedSeriesTable, out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer
        .write_record(table.columns.iter().map(|c| c.name.as_str()))
        .context("writing CSV header")?;

    for i in 0..table.n_samples() {
        let record = table.columns.iter().map(|c| match c.values.get(i) {
            Some(Some(v)) => v.to_string(),
            _ => String::new(),
        });
        writer
            .write_record(record)
            .with_context(|| format!("writing CSV row {i}"))?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_json<W: Write>(table: &SmoothedSeriesTable, out: W) -> Result<()> {
    let mut out = BufWriter::new(out);
    serde_json::to_writer_pretty(&mut out, table).context("serializing JSON")?;
    out.flush().context("flushing JSON")?;
    Ok(())
}
