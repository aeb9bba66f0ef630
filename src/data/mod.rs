/// Data layer: core types, loading, smoothing and export.
///
/// Architecture:
/// ```text
///   headerless .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  read grid → transpose → SeriesTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  smooth   │  classify columns, rolling mean → SmoothedSeriesTable
///   └──────────┘
///        │
///        ├──────────────► export (.csv / .json)
///        ▼
///     figure / render / ui
/// ```

pub mod export;
pub mod loader;
pub mod model;
pub mod smooth;
