mod app;
mod color;
mod data;
mod error;
mod figure;
mod render;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;

use data::smooth::DEFAULT_WINDOW;
use figure::{Figure, DEFAULT_TITLE};
use state::AppState;

/// Smooth per-run metrics from a headerless CSV and plot them.
///
/// Every CSV row is one series: its first field is the name, the rest are
/// samples per epoch.
#[derive(Debug, Parser)]
#[command(name = "metric-plot", author, version, about)]
struct Args {
    /// CSV file to read
    file: PathBuf,

    /// Rolling window size
    #[arg(short, long, default_value_t = DEFAULT_WINDOW)]
    window: usize,

    /// Save the chart to a .png or .svg file instead of opening a window
    #[arg(short, long, value_parser = render::parse_output)]
    output: Option<PathBuf>,

    /// Also write the smoothed series to a .csv or .json file
    #[arg(long, value_parser = data::export::parse_export)]
    export: Option<PathBuf>,

    /// Chart title
    #[arg(long, default_value = DEFAULT_TITLE)]
    title: String,

    /// Saved image size as WIDTHxHEIGHT
    #[arg(long, value_parser = render::parse_size, default_value = "1024x768")]
    size: (u32, u32),
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let table = data::loader::load(&args.file)?;
    let smoothed = data::smooth::smooth(&table, args.window)?;
    log::info!("Plotting {:?}", smoothed.column_names());

    // Output and export paths were validated during argument parsing; the
    // chart is drawn before the export so a failed render writes nothing.
    match &args.output {
        Some(path) => {
            let figure = Figure::from_smoothed(&smoothed, &args.title);
            render::render_to_file(&figure, path, args.size)?;
            if let Some(export) = &args.export {
                data::export::export(&smoothed, export)?;
            }
            Ok(())
        }
        None => {
            if let Some(export) = &args.export {
                data::export::export(&smoothed, export)?;
            }
            let state = AppState::with_data(&args.title, &args.file, table, smoothed);
            app::run_viewer(state).map_err(|e| anyhow!("viewer failed: {e}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_accuracy_loss_chart() {
        let args = Args::try_parse_from(["metric-plot", "runs.csv"]).unwrap();
        assert_eq!(args.file, PathBuf::from("runs.csv"));
        assert_eq!(args.window, 5);
        assert_eq!(args.title, "MultiLine Plot");
        assert_eq!(args.size, (1024, 768));
        assert!(args.output.is_none());
    }

    #[test]
    fn short_and_long_window_flags() {
        let args = Args::try_parse_from(["metric-plot", "-w", "3", "runs.csv"]).unwrap();
        assert_eq!(args.window, 3);
        let args = Args::try_parse_from(["metric-plot", "runs.csv", "--window", "9"]).unwrap();
        assert_eq!(args.window, 9);
    }

    #[test]
    fn file_is_required() {
        assert!(Args::try_parse_from(["metric-plot"]).is_err());
        assert!(Args::try_parse_from(["metric-plot", "runs.csv", "-w", "-2"]).is_err());
    }

    #[test]
    fn unsupported_formats_fail_during_parsing() {
        let chart = Args::try_parse_from([
            "metric-plot",
            "runs.csv",
            "--export",
            "out.csv",
            "-o",
            "chart.gif",
        ]);
        assert!(chart.is_err());

        let export = Args::try_parse_from(["metric-plot", "runs.csv", "--export", "out.xlsx"]);
        assert!(export.is_err());
    }

    #[test]
    fn output_and_size() {
        let args = Args::try_parse_from([
            "metric-plot",
            "runs.csv",
            "-o",
            "chart.svg",
            "--size",
            "800x600",
        ])
        .unwrap();
        assert_eq!(args.output, Some(PathBuf::from("chart.svg")));
        assert_eq!(args.size, (800, 600));
    }
}
