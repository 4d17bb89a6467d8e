//! Happiness Dashboard - World Happiness Report explorer
//!
//! Opens the interactive dashboard, or with `--export` renders the charts of
//! one country to PNG files and exits.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use eframe::egui;
use happiness_dashboard::charts::{DashboardData, StaticChartRenderer};
use happiness_dashboard::cli::{setup_logging, Args};
use happiness_dashboard::data::{DataLoader, ViewProjector};
use happiness_dashboard::gui::DashboardApp;
use std::process;
use std::sync::Arc;
use tracing::info;

fn main() {
    let args = Args::parse();
    setup_logging(&args);

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let (dataset, report) = DataLoader::load_csv(&args.data_path)
        .with_context(|| format!("Failed to load {}", args.data_path.display()))?;

    let countries = ViewProjector::countries(&dataset);
    let initial_country = args.initial_country(&countries);
    if let (Some(requested), Some(chosen)) = (&args.country, &initial_country) {
        if requested != chosen {
            tracing::warn!("Country '{}' not in dataset, showing {}", requested, chosen);
        }
    }

    if let Some(dir) = &args.export_dir {
        let country = initial_country.context("Dataset contains no countries")?;
        info!("Exporting charts for {} to {}", country, dir.display());

        let data = DashboardData::compute(&dataset, &country);
        let summary = StaticChartRenderer::export(&data, dir, args.export_size())?;
        println!(
            "Exported {} charts and {} for {} to {}",
            summary.images.len(),
            summary.json.display(),
            country,
            summary.dir.display()
        );
        return Ok(());
    }

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 800.0])
            .with_min_inner_size([1200.0, 700.0])
            .with_title("Happiness Dashboard"),
        ..Default::default()
    };

    let dataset = Arc::new(dataset);
    let export_size = args.export_size();
    let data_path = args.data_path.clone();

    // Run the application
    eframe::run_native(
        "Happiness Dashboard",
        options,
        Box::new(move |cc| {
            Ok(Box::new(DashboardApp::new(
                cc,
                dataset,
                report,
                &data_path,
                initial_country,
                export_size,
            )))
        }),
    )
    .map_err(|e| anyhow!("Failed to start the dashboard window: {}", e))
}
