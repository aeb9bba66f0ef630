use eframe::egui::{Color32, Ui};
use egui_plot::{AxisHints, GridMark, HPlacement, Legend, Line, Plot, PlotPoints};

use crate::figure::{Figure, Scale};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Metrics plot (central panel)
// ---------------------------------------------------------------------------

/// Render the smoothed series in the central panel.
pub fn metrics_plot(ui: &mut Ui, state: &AppState) {
    let figure = match &state.figure {
        Some(fig) => fig,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a metrics CSV to plot  (File → Open…)");
            });
            return;
        }
    };

    ui.vertical_centered(|ui: &mut Ui| {
        ui.strong(&figure.title);
    });

    let scale = figure.primary.scale;
    let (lo, hi) = figure.primary_range();
    let (p_lo, p_hi) = (to_plot(lo, scale), to_plot(hi, scale));

    let mut y_axes = vec![AxisHints::new_y()
        .label(figure.primary.label.as_str())
        .formatter(move |mark: GridMark, _range| format_tick(from_plot(mark.value, scale)))];

    if let Some(axis) = &figure.secondary {
        let (s_lo, s_hi) = figure.secondary_range().unwrap_or(axis.range);
        y_axes.push(
            AxisHints::new_y()
                .label(axis.label.as_str())
                .placement(HPlacement::Right)
                .formatter(move |mark: GridMark, _range| {
                    format_tick(rescale(mark.value, (p_lo, p_hi), (s_lo, s_hi)))
                }),
        );
    }

    let keys = figure.legend_keys();
    Plot::new("metrics_plot")
        .legend(Legend::default())
        .x_axis_label(figure.x_label.as_str())
        .custom_y_axes(y_axes)
        .include_x(0.0)
        .include_x(figure.n_epochs().saturating_sub(1).max(1) as f64)
        .include_y(p_lo)
        .include_y(p_hi)
        .label_formatter(move |name, value| {
            let label = keys
                .iter()
                .position(|k| k == name)
                .map_or(name, |i| figure.lines[i].label.as_str());
            format!(
                "{label}\nepoch {:.0}\n{}",
                value.x,
                format_tick(from_plot(value.y, scale))
            )
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for line in lines(figure) {
                plot_ui.line(line);
            }
        });
}

/// One egui line per contiguous segment. Segments of a series share its
/// legend key and colour, so the legend shows each series once; a series
/// with nothing drawable still gets an empty line for its entry.
fn lines(figure: &Figure) -> Vec<Line> {
    let scale = figure.primary.scale;
    figure
        .lines
        .iter()
        .zip(figure.legend_keys())
        .flat_map(|(pl, key)| {
            let c = pl.color;
            let color = Color32::from_rgba_unmultiplied(c.0, c.1, c.2, (pl.alpha * 255.0) as u8);
            pl.legend_segments(scale).into_iter().map(move |segment| {
                let points: PlotPoints = segment
                    .into_iter()
                    .map(|(x, y)| [x, to_plot(y, scale)])
                    .collect();
                Line::new(points).name(&key).color(color).width(2.0)
            })
        })
        .collect()
}

fn to_plot(v: f64, scale: Scale) -> f64 {
    match scale {
        Scale::Log => v.log10(),
        Scale::Linear => v,
    }
}

fn from_plot(v: f64, scale: Scale) -> f64 {
    match scale {
        Scale::Log => 10f64.powf(v),
        Scale::Linear => v,
    }
}

/// Map `v` linearly from one interval onto another.
fn rescale(v: f64, from: (f64, f64), to: (f64, f64)) -> f64 {
    let span = from.1 - from.0;
    if span == 0.0 {
        return to.0;
    }
    to.0 + (v - from.0) / span * (to.1 - to.0)
}

fn format_tick(v: f64) -> String {
    let a = v.abs();
    if a != 0.0 && !(1e-3..1e5).contains(&a) {
        format!("{v:.1e}")
    } else {
        let s = format!("{v:.3}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}
