mod app;
mod color;
mod data;
mod state;
mod ui;

use std::path::PathBuf;

use app::HrDashboardApp;
use clap::Parser;
use data::aggregate::DEFAULT_SALARY_BINS;
use data::loader::DatasetCache;
use eframe::egui;
use state::AppState;

/// Interactive HR analytics dashboard.
#[derive(Parser, Debug)]
#[command(name = "hr-dashboard", version, about)]
struct Args {
    /// Employee table loaded at startup (.csv, .json or .parquet).
    #[arg(long, default_value = "hr_data.csv")]
    data: PathBuf,

    /// Number of bins in the salary histogram.
    #[arg(long, default_value_t = DEFAULT_SALARY_BINS as u16, value_parser = clap::value_parser!(u16).range(1..))]
    bins: u16,
}

fn main() -> eframe::Result {
    env_logger::init();
    let args = Args::parse();

    let mut state = AppState::new(usize::from(args.bins));
    state.load_initial(DatasetCache::global(), &args.data);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Advanced HR Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(HrDashboardApp::new(state)))),
    )
}
