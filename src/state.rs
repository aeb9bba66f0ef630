use std::path::{Path, PathBuf};

use crate::data::model::{SeriesTable, SmoothedSeriesTable};
use crate::data::smooth::smooth;
use crate::figure::Figure;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full viewer state, independent of rendering.
pub struct AppState {
    /// File the current table came from.
    pub source: Option<PathBuf>,

    /// Reshaped table as loaded (before smoothing).
    pub table: Option<SeriesTable>,

    /// Rolling window applied to `table`.
    pub window: usize,

    /// Chart title.
    pub title: String,

    /// Latest smoothing result.
    pub smoothed: Option<SmoothedSeriesTable>,

    /// Chart built from `smoothed`.
    pub figure: Option<Figure>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(title: &str, window: usize) -> Self {
        Self {
            source: None,
            table: None,
            window,
            title: title.to_string(),
            smoothed: None,
            figure: None,
            status_message: None,
        }
    }

    /// Start from a table that was already loaded and smoothed.
    pub fn with_data(
        title: &str,
        source: &Path,
        table: SeriesTable,
        smoothed: SmoothedSeriesTable,
    ) -> Self {
        let mut state = Self::new(title, smoothed.window);
        state.source = Some(source.to_path_buf());
        state.table = Some(table);
        state.figure = Some(Figure::from_smoothed(&smoothed, title));
        state.smoothed = Some(smoothed);
        state
    }

    /// Ingest a newly loaded table and smooth it with the current window.
    pub fn set_table(&mut self, source: &Path, table: SeriesTable) {
        self.source = Some(source.to_path_buf());
        self.table = Some(table);
        self.resmooth();
    }

    /// Change the window and rebuild the chart.
    pub fn set_window(&mut self, window: usize) {
        if window != self.window {
            self.window = window;
            self.resmooth();
        }
    }

    /// Recompute `smoothed` and `figure` from `table`. On failure the
    /// previous chart is cleared and the error shown.
    pub fn resmooth(&mut self) {
        let Some(table) = &self.table else {
            return;
        };
        match smooth(table, self.window) {
            Ok(smoothed) => {
                self.figure = Some(Figure::from_smoothed(&smoothed, &self.title));
                self.smoothed = Some(smoothed);
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Smoothing failed: {e}");
                self.figure = None;
                self.smoothed = None;
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Largest window worth offering in the UI.
    pub fn max_window(&self) -> usize {
        let samples = self.table.as_ref().map_or(0, SeriesTable::n_samples);
        samples.max(self.window).max(1)
    }
}
