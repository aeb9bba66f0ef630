//! Chart description shared by the interactive viewer and the file renderer.
//!
//! A [`Figure`] is a plain value. Each configuration step takes it by value
//! and hands it back, so the chart being built is always explicit.

use std::collections::HashMap;

use crate::color::{generate_palette, Rgb};
use crate::data::model::SmoothedSeriesTable;

pub const DEFAULT_TITLE: &str = "MultiLine Plot";
const SMOOTHED_SUFFIX: &str = " (smoothed)";
const LINE_ALPHA: f64 = 0.5;
/// Lower bound of a log axis when no positive value is plotted.
const LOG_FLOOR: f64 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    Linear,
    Log,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub label: String,
    pub scale: Scale,
    /// Declared bounds.
    pub range: (f64, f64),
    /// Fit the effective range to the plotted data instead of `range`.
    pub autoscale: bool,
}

impl Axis {
    pub fn new(label: &str, scale: Scale, range: (f64, f64)) -> Self {
        Axis {
            label: label.to_string(),
            scale,
            range,
            autoscale: true,
        }
    }

    /// Bounds actually drawn. Log axes never start at or below zero.
    pub fn effective_range(&self, data: Option<(f64, f64)>) -> (f64, f64) {
        let (mut lo, mut hi) = match (self.autoscale, data) {
            (true, Some(extent)) => extent,
            _ => self.range,
        };
        if self.scale == Scale::Log {
            if lo <= 0.0 {
                lo = data
                    .map(|(min, _)| min)
                    .filter(|&min| min > 0.0 && min.is_finite())
                    .unwrap_or(LOG_FLOOR);
            }
            if hi <= lo {
                hi = lo * 10.0;
            }
        } else if hi <= lo {
            hi = lo + 1.0;
        }
        (lo, hi)
    }
}

/// One smoothed series ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotLine {
    /// Legend entry: the original series name.
    pub name: String,
    /// Line label, the name plus a smoothing marker.
    pub label: String,
    pub color: Rgb,
    pub alpha: f64,
    /// y per epoch; `None` is a gap.
    pub points: Vec<Option<f64>>,
}

impl PlotLine {
    /// Contiguous runs of drawable `(epoch, value)` points. Undefined
    /// entries, and non-positive ones on a log scale, split runs.
    pub fn segments(&self, scale: Scale) -> Vec<Vec<(f64, f64)>> {
        let mut segments = Vec::new();
        let mut current = Vec::new();
        for (i, point) in self.points.iter().copied().enumerate() {
            match point.filter(|&v| is_drawable(v, scale)) {
                Some(v) => current.push((i as f64, v)),
                None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
                None => {}
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }
        segments
    }

    /// Like [`segments`](Self::segments), but a series with nothing
    /// drawable still yields one empty run so it keeps its legend entry.
    pub fn legend_segments(&self, scale: Scale) -> Vec<Vec<(f64, f64)>> {
        let mut segments = self.segments(scale);
        if segments.is_empty() {
            segments.push(Vec::new());
        }
        segments
    }
}

fn is_drawable(v: f64, scale: Scale) -> bool {
    v.is_finite() && (scale == Scale::Linear || v > 0.0)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub title: String,
    pub x_label: String,
    pub lines: Vec<PlotLine>,
    /// Left axis; every line is plotted against it.
    pub primary: Axis,
    /// Right axis sharing the x axis.
    pub secondary: Option<Axis>,
}

impl Figure {
    pub fn new(title: &str) -> Self {
        Figure {
            title: title.to_string(),
            x_label: String::new(),
            lines: Vec::new(),
            primary: Axis::new("", Scale::Linear, (0.0, 1.0)),
            secondary: None,
        }
    }

    /// One line per smoothed column, coloured from an evenly spaced palette.
    pub fn with_series(mut self, table: &SmoothedSeriesTable) -> Self {
        let palette = generate_palette(table.columns.len());
        self.lines = table
            .columns
            .iter()
            .zip(palette)
            .map(|(col, color)| PlotLine {
                name: col.name.clone(),
                label: format!("{}{SMOOTHED_SUFFIX}", col.name),
                color,
                alpha: LINE_ALPHA,
                points: col.values.clone(),
            })
            .collect();
        self
    }

    pub fn with_x_label(mut self, label: &str) -> Self {
        self.x_label = label.to_string();
        self
    }

    pub fn with_primary_axis(mut self, axis: Axis) -> Self {
        self.primary = axis;
        self
    }

    pub fn with_secondary_axis(mut self, axis: Axis) -> Self {
        self.secondary = Some(axis);
        self
    }

    /// The accuracy/loss chart: log accuracy on the left, linear loss on
    /// the right, epochs along x.
    pub fn from_smoothed(table: &SmoothedSeriesTable, title: &str) -> Self {
        Figure::new(title)
            .with_series(table)
            .with_x_label("Epoch")
            .with_primary_axis(Axis::new("accuracy", Scale::Log, (0.0, 100.0)))
            .with_secondary_axis(Axis::new("loss", Scale::Linear, (0.0, 10.0)))
    }

    pub fn legend_names(&self) -> Vec<&str> {
        self.lines.iter().map(|l| l.name.as_str()).collect()
    }

    /// Legend names made unique by position: a repeated name gets a
    /// ` [n]` suffix counting its occurrences.
    pub fn legend_keys(&self) -> Vec<String> {
        let mut seen: HashMap<&str, usize> = HashMap::new();
        self.lines
            .iter()
            .map(|l| {
                let count = seen.entry(l.name.as_str()).or_insert(0);
                *count += 1;
                match *count {
                    1 => l.name.clone(),
                    n => format!("{} [{n}]", l.name),
                }
            })
            .collect()
    }

    /// Number of epochs on the x axis.
    pub fn n_epochs(&self) -> usize {
        self.lines.iter().map(|l| l.points.len()).max().unwrap_or(0)
    }

    /// Min and max of every value drawable on the primary axis.
    pub fn data_extent(&self) -> Option<(f64, f64)> {
        self.lines
            .iter()
            .flat_map(|l| l.points.iter().flatten())
            .copied()
            .filter(|&v| is_drawable(v, self.primary.scale))
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Effective primary range after autoscaling.
    pub fn primary_range(&self) -> (f64, f64) {
        let range = self.primary.effective_range(self.data_extent());
        log::debug!("Primary axis '{}' range {range:?}", self.primary.label);
        range
    }

    /// Effective secondary range. No data is plotted against it, so it
    /// always shows its declared bounds.
    pub fn secondary_range(&self) -> Option<(f64, f64)> {
        self.secondary.as_ref().map(|a| a.effective_range(None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::SmoothedColumn;

    fn table(columns: &[(&str, Vec<Option<f64>>)]) -> SmoothedSeriesTable {
        SmoothedSeriesTable {
            window: 3,
            columns: columns
                .iter()
                .map(|(name, values)| SmoothedColumn {
                    name: name.to_string(),
                    values: values.clone(),
                })
                .collect(),
            dropped: Vec::new(),
        }
    }

    #[test]
    fn default_chart_layout() {
        let t = table(&[
            ("acc", vec![None, Some(10.0), Some(20.0)]),
            ("loss", vec![None, Some(2.0), Some(1.0)]),
        ]);
        let fig = Figure::from_smoothed(&t, DEFAULT_TITLE);

        assert_eq!(fig.title, "MultiLine Plot");
        assert_eq!(fig.x_label, "Epoch");
        assert_eq!(fig.legend_names(), vec!["acc", "loss"]);
        assert_eq!(fig.lines[0].label, "acc (smoothed)");
        assert_eq!(fig.lines[1].alpha, 0.5);
        assert_ne!(fig.lines[0].color, fig.lines[1].color);

        assert_eq!(fig.primary.label, "accuracy");
        assert_eq!(fig.primary.scale, Scale::Log);
        assert_eq!(fig.primary.range, (0.0, 100.0));
        let secondary = fig.secondary.as_ref().unwrap();
        assert_eq!(secondary.label, "loss");
        assert_eq!(secondary.scale, Scale::Linear);
        assert_eq!(fig.secondary_range(), Some((0.0, 10.0)));
        assert_eq!(fig.n_epochs(), 3);
    }

    #[test]
    fn undefined_points_become_gaps() {
        let line = PlotLine {
            name: "x".into(),
            label: "x (smoothed)".into(),
            color: Rgb(0, 0, 0),
            alpha: 1.0,
            points: vec![None, Some(1.0), Some(2.0), None, Some(4.0)],
        };
        assert_eq!(
            line.segments(Scale::Linear),
            vec![vec![(1.0, 1.0), (2.0, 2.0)], vec![(4.0, 4.0)]]
        );
    }

    #[test]
    fn undrawable_series_keeps_one_empty_run() {
        let line = PlotLine {
            name: "x".into(),
            label: "x (smoothed)".into(),
            color: Rgb(0, 0, 0),
            alpha: 1.0,
            points: vec![None, None, Some(0.0)],
        };
        assert!(line.segments(Scale::Log).is_empty());
        assert_eq!(line.legend_segments(Scale::Log), vec![Vec::<(f64, f64)>::new()]);
        assert_eq!(
            line.legend_segments(Scale::Linear),
            vec![vec![(2.0, 0.0)]]
        );
    }

    #[test]
    fn repeated_names_get_positional_legend_keys() {
        let t = table(&[
            ("acc", vec![Some(1.0)]),
            ("loss", vec![Some(1.0)]),
            ("acc", vec![Some(2.0)]),
            ("acc", vec![Some(3.0)]),
        ]);
        let fig = Figure::from_smoothed(&t, "t");
        assert_eq!(fig.legend_keys(), vec!["acc", "loss", "acc [2]", "acc [3]"]);
        assert_eq!(fig.legend_names(), vec!["acc", "loss", "acc", "acc"]);
    }

    #[test]
    fn log_scale_skips_non_positive_values() {
        let line = PlotLine {
            name: "x".into(),
            label: "x (smoothed)".into(),
            color: Rgb(0, 0, 0),
            alpha: 1.0,
            points: vec![Some(0.0), Some(1.0), Some(-2.0), Some(3.0)],
        };
        assert_eq!(
            line.segments(Scale::Log),
            vec![vec![(1.0, 1.0)], vec![(3.0, 3.0)]]
        );
    }

    #[test]
    fn autoscaled_log_axis_fits_positive_data() {
        let t = table(&[("acc", vec![None, Some(0.0), Some(5.0), Some(50.0)])]);
        let fig = Figure::from_smoothed(&t, "t");
        assert_eq!(fig.data_extent(), Some((5.0, 50.0)));
        assert_eq!(fig.primary_range(), (5.0, 50.0));
    }

    #[test]
    fn fixed_log_axis_clamps_zero_lower_bound() {
        let axis = Axis {
            autoscale: false,
            ..Axis::new("accuracy", Scale::Log, (0.0, 100.0))
        };
        assert_eq!(axis.effective_range(Some((2.0, 8.0))), (2.0, 100.0));
        assert_eq!(axis.effective_range(None), (1e-3, 100.0));
    }

    #[test]
    fn flat_data_still_has_a_span() {
        let axis = Axis::new("loss", Scale::Linear, (0.0, 10.0));
        assert_eq!(axis.effective_range(Some((3.0, 3.0))), (3.0, 4.0));
        let log_axis = Axis::new("accuracy", Scale::Log, (0.0, 100.0));
        assert_eq!(log_axis.effective_range(Some((3.0, 3.0))), (3.0, 30.0));
    }
}
