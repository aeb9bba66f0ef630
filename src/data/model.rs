use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Cell – a single coerced value in a series
// ---------------------------------------------------------------------------

/// A CSV cell after lenient numeric coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Int(i64),
    Float(f64),
    /// Empty field. Counts as numeric but carries no sample.
    Missing,
    /// Anything that failed numeric coercion, kept verbatim.
    Text(String),
}

impl Cell {
    /// Coerce a raw CSV field: empty → `Missing`, then integer, then float,
    /// otherwise the original string.
    pub fn coerce(raw: &str) -> Self {
        let s = raw.trim();
        if s.is_empty() {
            return Cell::Missing;
        }
        if let Ok(i) = s.parse::<i64>() {
            return Cell::Int(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return Cell::Float(f);
        }
        Cell::Text(raw.to_string())
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, Cell::Text(_))
    }

    /// The sample carried by this cell. NaN counts as no sample.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Int(i) => Some(*i as f64),
            Cell::Float(v) if !v.is_nan() => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Int(i) => write!(f, "{i}"),
            Cell::Float(v) => write!(f, "{v}"),
            Cell::Missing => Ok(()),
            Cell::Text(s) => write!(f, "{s}"),
        }
    }
}

// ---------------------------------------------------------------------------
// RawTable – the grid exactly as read
// ---------------------------------------------------------------------------

/// Rectangular grid of strings, rows = CSV records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn n_cols(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Row i, column j becomes row j, column i.
    pub fn transpose(&self) -> RawTable {
        let rows = (0..self.n_cols())
            .map(|j| self.rows.iter().map(|row| row[j].clone()).collect())
            .collect();
        RawTable { rows }
    }
}

// ---------------------------------------------------------------------------
// SeriesTable – transposed grid with promoted names
// ---------------------------------------------------------------------------

/// One named series (one original CSV row).
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub cells: Vec<Cell>,
}

/// Ordered columns. Duplicate names are kept positionally.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesTable {
    pub columns: Vec<Column>,
}

impl SeriesTable {
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// First column with the given name.
    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Longest column length (all equal for rectangular input).
    pub fn n_samples(&self) -> usize {
        self.columns.iter().map(|c| c.cells.len()).max().unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// SmoothedSeriesTable – rolling means of the numeric subset
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SmoothedColumn {
    pub name: String,
    /// `None` where the window has insufficient history or a missing sample.
    pub values: Vec<Option<f64>>,
}

/// A column excluded from smoothing and why.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DroppedColumn {
    pub name: String,
    pub offending: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SmoothedSeriesTable {
    pub window: usize,
    pub columns: Vec<SmoothedColumn>,
    pub dropped: Vec<DroppedColumn>,
}

impl SmoothedSeriesTable {
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<&SmoothedColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn n_samples(&self) -> usize {
        self.columns.iter().map(|c| c.values.len()).max().unwrap_or(0)
    }
}
