use super::model::{Column, DroppedColumn, SeriesTable, SmoothedColumn, SmoothedSeriesTable};
use crate::error::PlotError;

pub const DEFAULT_WINDOW: usize = 5;

// ---------------------------------------------------------------------------
// Column classification
// ---------------------------------------------------------------------------

/// Whether a column can be averaged.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnKind {
    /// Samples in order; `None` for empty or NaN cells.
    Numeric(Vec<Option<f64>>),
    /// Holds at least one cell that is not a number.
    NonNumeric { offending: String },
}

pub fn classify(column: &Column) -> ColumnKind {
    match column.cells.iter().find(|c| !c.is_numeric()) {
        Some(cell) => ColumnKind::NonNumeric {
            offending: cell.to_string(),
        },
        None => ColumnKind::Numeric(column.cells.iter().map(|c| c.as_f64()).collect()),
    }
}

// ---------------------------------------------------------------------------
// Rolling mean
// ---------------------------------------------------------------------------

/// Trailing mean over the last `window` samples. Positions with fewer than
/// `window` samples of history, or with a missing sample inside the window,
/// are `None`. Output has the same length as the input.
pub fn rolling_mean(samples: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; samples.len()];
    }
    let lead = (window - 1).min(samples.len());
    let mut out = vec![None; lead];
    out.extend(samples.windows(window).map(|w| {
        w.iter()
            .copied()
            .try_fold(0.0, |acc, v| v.map(|x| acc + x))
            .map(|sum| sum / window as f64)
    }));
    out
}

/// Smooth every numeric column of `table` with a trailing window.
///
/// Non-numeric columns are dropped and listed in
/// [`SmoothedSeriesTable::dropped`].
pub fn smooth(table: &SeriesTable, window: usize) -> Result<SmoothedSeriesTable, PlotError> {
    if window < 1 {
        return Err(PlotError::InvalidWindow(window));
    }
    if table.is_empty() {
        return Err(PlotError::EmptyTable);
    }

    let mut columns = Vec::with_capacity(table.len());
    let mut dropped = Vec::new();

    for column in &table.columns {
        match classify(column) {
            ColumnKind::Numeric(samples) => columns.push(SmoothedColumn {
                name: column.name.clone(),
                values: rolling_mean(&samples, window),
            }),
            ColumnKind::NonNumeric { offending } => {
                log::warn!(
                    "Dropping non-numeric series '{}' (cell '{offending}' is not a number)",
                    column.name
                );
                dropped.push(DroppedColumn {
                    name: column.name.clone(),
                    offending,
                });
            }
        }
    }

    if columns.is_empty() {
        return Err(PlotError::EmptyTable);
    }

    log::info!(
        "Smoothed {} series with window {window} ({} dropped)",
        columns.len(),
        dropped.len()
    );
    Ok(SmoothedSeriesTable {
        window,
        columns,
        dropped,
    })
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use approx::assert_relative_eq;

    use super::*;
    use crate::data::loader::load_from_reader;
    use crate::data::model::Cell;

    fn numeric(name: &str, values: &[f64]) -> Column {
        Column {
            name: name.into(),
            cells: values.iter().map(|&v| Cell::Float(v)).collect(),
        }
    }

    fn table(columns: Vec<Column>) -> SeriesTable {
        SeriesTable { columns }
    }

    #[test]
    fn window_of_three() {
        let t = table(vec![numeric("x", &[1.0, 2.0, 3.0, 4.0, 5.0])]);
        let s = smooth(&t, 3).unwrap();
        assert_eq!(
            s.get("x").unwrap().values,
            vec![None, None, Some(2.0), Some(3.0), Some(4.0)]
        );
    }

    #[test]
    fn window_of_one_is_identity() {
        let input = [0.5, 10.0, -3.25, 7.0];
        let t = table(vec![numeric("x", &input)]);
        let s = smooth(&t, 1).unwrap();
        let values = &s.get("x").unwrap().values;
        for (got, want) in values.iter().zip(input) {
            assert_relative_eq!(got.unwrap(), want);
        }
    }

    #[test]
    fn defined_count_follows_window() {
        let samples: Vec<Option<f64>> = (0..7).map(|i| Some(i as f64)).collect();
        for window in 1..=10 {
            let out = rolling_mean(&samples, window);
            assert_eq!(out.len(), samples.len());
            let defined = out.iter().filter(|v| v.is_some()).count();
            let expected = (samples.len() + 1).saturating_sub(window);
            assert_eq!(defined, expected, "window {window}");
            assert!(out[..window.min(samples.len()) - 1].iter().all(Option::is_none));
        }
    }

    #[test]
    fn missing_sample_blanks_every_window_it_touches() {
        let samples = [Some(1.0), Some(2.0), None, Some(4.0), Some(5.0), Some(6.0)];
        let out = rolling_mean(&samples, 2);
        assert_eq!(out, vec![None, Some(1.5), None, None, Some(4.5), Some(5.5)]);
    }

    #[test]
    fn zero_window_is_rejected() {
        let t = table(vec![numeric("x", &[1.0])]);
        assert!(matches!(smooth(&t, 0), Err(PlotError::InvalidWindow(0))));
    }

    #[test]
    fn empty_table_is_rejected() {
        assert!(matches!(smooth(&table(vec![]), 3), Err(PlotError::EmptyTable)));
    }

    #[test]
    fn non_numeric_column_is_dropped() {
        let mut bad = numeric("bad", &[1.0, 2.0]);
        bad.cells.push(Cell::Text("NaN_token".into()));
        let t = table(vec![numeric("good", &[1.0, 2.0, 3.0]), bad]);

        let s = smooth(&t, 1).unwrap();
        assert_eq!(s.column_names(), vec!["good"]);
        assert_eq!(s.get("good").unwrap().values, vec![Some(1.0), Some(2.0), Some(3.0)]);
        assert_eq!(s.dropped.len(), 1);
        assert_eq!(s.dropped[0].name, "bad");
        assert_eq!(s.dropped[0].offending, "NaN_token");
    }

    #[test]
    fn only_non_numeric_columns_is_empty() {
        let t = table(vec![Column {
            name: "labels".into(),
            cells: vec![Cell::Text("a".into())],
        }]);
        assert!(matches!(smooth(&t, 1), Err(PlotError::EmptyTable)));
    }

    #[test]
    fn loaded_csv_keeps_numeric_rows_unchanged_at_window_one() {
        let t = load_from_reader("a,b,c\n1,2,3\n4,5,6\n".as_bytes(), Path::new("a.csv")).unwrap();
        let s = smooth(&t, 1).unwrap();
        assert_eq!(s.column_names(), vec!["1", "4"]);
        assert_eq!(s.get("1").unwrap().values, vec![Some(2.0), Some(3.0)]);
        assert_eq!(s.get("4").unwrap().values, vec![Some(5.0), Some(6.0)]);
        assert_eq!(s.dropped[0].name, "a");
    }

    #[test]
    fn classify_reports_first_offending_cell() {
        let column = Column {
            name: "c".into(),
            cells: vec![Cell::Int(1), Cell::Text("oops".into()), Cell::Text("later".into())],
        };
        assert_eq!(
            classify(&column),
            ColumnKind::NonNumeric {
                offending: "oops".into()
            }
        );
    }
}
