//! Static chart output with `plotters`.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::error::PlotError;
use crate::figure::{Figure, Scale};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Svg,
}

impl ImageFormat {
    pub fn from_path(path: &Path) -> Result<Self, PlotError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match ext.as_str() {
            "png" => Ok(ImageFormat::Png),
            "svg" => Ok(ImageFormat::Svg),
            _ => Err(PlotError::UnsupportedOutput {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// `--output` value parser: rejects unknown extensions before anything
/// is written.
pub fn parse_output(s: &str) -> Result<PathBuf, PlotError> {
    let path = PathBuf::from(s);
    ImageFormat::from_path(&path)?;
    Ok(path)
}

/// Draw `figure` into `path`. `.png` goes through the bitmap backend,
/// `.svg` through the SVG backend.
pub fn render_to_file(figure: &Figure, path: &Path, size: (u32, u32)) -> Result<()> {
    let format = ImageFormat::from_path(path)?;

    log::debug!("Drawing {:?} into {}", figure.legend_names(), path.display());
    let drawn = match format {
        ImageFormat::Png => draw(&BitMapBackend::new(path, size).into_drawing_area(), figure),
        ImageFormat::Svg => draw(&SVGBackend::new(path, size).into_drawing_area(), figure),
    };
    drawn.with_context(|| format!("rendering chart to {}", path.display()))?;

    log::info!("Saved chart to {}", path.display());
    Ok(())
}

/// Parse `WIDTHxHEIGHT`, e.g. `1280x720`.
pub fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let w: u32 = w.trim().parse().map_err(|e| format!("width '{w}': {e}"))?;
    let h: u32 = h.trim().parse().map_err(|e| format!("height '{h}': {e}"))?;
    if w == 0 || h == 0 {
        return Err(format!("size must be non-zero, got {w}x{h}"));
    }
    Ok((w, h))
}

// The primary coordinate type differs between log and linear axes, so the
// chart body is shared through a macro rather than a generic function.
macro_rules! draw_chart {
    ($root:expr, $figure:expr, $y_spec:expr) => {{
        let figure: &Figure = $figure;
        let x_max = figure.n_epochs().saturating_sub(1).max(1) as f64;
        let (s_lo, s_hi) = figure.secondary_range().unwrap_or((0.0, 1.0));
        let right_area = if figure.secondary.is_some() { 65 } else { 0 };

        let mut chart = ChartBuilder::on($root)
            .caption(figure.title.as_str(), ("sans-serif", 28))
            .margin(12)
            .x_label_area_size(45)
            .y_label_area_size(65)
            .right_y_label_area_size(right_area)
            .build_cartesian_2d(0f64..x_max, $y_spec)?
            .set_secondary_coord(0f64..x_max, s_lo..s_hi);

        chart
            .configure_mesh()
            .x_desc(figure.x_label.as_str())
            .y_desc(figure.primary.label.as_str())
            .draw()?;

        if let Some(axis) = &figure.secondary {
            chart
                .configure_secondary_axes()
                .y_desc(axis.label.as_str())
                .draw()?;
        }

        for line in &figure.lines {
            let style = RGBColor(line.color.0, line.color.1, line.color.2)
                .mix(line.alpha)
                .stroke_width(2);
            let segments = line.legend_segments(figure.primary.scale);
            for (k, segment) in segments.into_iter().enumerate() {
                let anno = chart.draw_series(LineSeries::new(segment, style))?;
                // one legend entry per series, however many gaps it has
                if k == 0 {
                    anno.label(line.name.as_str()).legend(move |(x, y)| {
                        PathElement::new(vec![(x, y), (x + 20, y)], style)
                    });
                }
            }
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .border_style(BLACK)
            .background_style(WHITE.mix(0.8))
            .draw()?;
    }};
}

fn draw<DB>(root: &DrawingArea<DB, Shift>, figure: &Figure) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let (lo, hi) = figure.primary_range();
    match figure.primary.scale {
        Scale::Log => draw_chart!(root, figure, (lo..hi).log_scale()),
        Scale::Linear => draw_chart!(root, figure, lo..hi),
    }

    root.present()?;
    Ok(())
}
