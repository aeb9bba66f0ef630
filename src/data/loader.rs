use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ErrorKind, ReaderBuilder};

use super::model::{Cell, Column, RawTable, SeriesTable};
use crate::error::PlotError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a headerless metrics CSV and reshape it into named series.
///
/// Layout: one record per run, the first field is the run's name and the
/// remaining fields are its samples, e.g.
///
/// ```text
/// train_acc,12.5,30.1,55.0
/// train_loss,2.31,1.80,1.20
/// ```
///
/// The grid is transposed and the first transposed row (the first field of
/// every record) becomes the column names.
pub fn load(path: &Path) -> Result<SeriesTable, PlotError> {
    if !path.exists() {
        return Err(PlotError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let file = File::open(path).map_err(|source| PlotError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let table = load_from_reader(file, path)?;

    log::info!(
        "Loaded {} series of {} samples from {}",
        table.len(),
        table.n_samples(),
        path.display()
    );
    Ok(table)
}

/// Same as [`load`] for any reader. `origin` only labels error messages.
pub fn load_from_reader<R: Read>(reader: R, origin: &Path) -> Result<SeriesTable, PlotError> {
    let raw = read_raw(reader, origin)?;
    Ok(reshape(&raw))
}

// ---------------------------------------------------------------------------
// CSV → RawTable
// ---------------------------------------------------------------------------

fn read_raw<R: Read>(reader: R, origin: &Path) -> Result<RawTable, PlotError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(false)
        .from_reader(reader);

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| csv_error(e, origin))?;
        rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }

    if rows.is_empty() {
        return Err(PlotError::malformed(origin, "file is empty"));
    }
    Ok(RawTable { rows })
}

fn csv_error(err: csv::Error, origin: &Path) -> PlotError {
    match err.into_kind() {
        ErrorKind::UnequalLengths {
            pos,
            expected_len,
            len,
        } => {
            let line = pos.map(|p| p.line()).unwrap_or_default();
            PlotError::malformed(
                origin,
                format!("line {line} has {len} fields, expected {expected_len}"),
            )
        }
        ErrorKind::Utf8 { pos, err } => {
            let line = pos.map(|p| p.line()).unwrap_or_default();
            PlotError::malformed(origin, format!("line {line}: {err}"))
        }
        ErrorKind::Io(source) => PlotError::Io {
            path: origin.to_path_buf(),
            source,
        },
        other => PlotError::malformed(origin, format!("{other:?}")),
    }
}

// ---------------------------------------------------------------------------
// RawTable → SeriesTable
// ---------------------------------------------------------------------------

/// Transpose, promote the first row to names, coerce the rest.
fn reshape(raw: &RawTable) -> SeriesTable {
    let transposed = raw.transpose();
    let mut rows = transposed.rows.into_iter();
    let names = rows.next().unwrap_or_default();
    let data: Vec<Vec<String>> = rows.collect();

    let mut seen = HashSet::new();
    let columns = names
        .into_iter()
        .enumerate()
        .map(|(j, name)| {
            if !seen.insert(name.clone()) {
                log::warn!("Duplicate series name '{name}' at position {j}, kept as a separate line");
            }
            let cells = data.iter().map(|row| Cell::coerce(&row[j])).collect();
            Column { name, cells }
        })
        .collect();

    SeriesTable { columns }
}
