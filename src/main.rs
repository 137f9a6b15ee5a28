mod app;
mod color;
mod data;
mod state;
mod ui;

use std::path::Path;

use anyhow::Context;
use app::WorldTrendsApp;
use eframe::egui;

/// Source dataset, resolved relative to the working directory.
const DATA_PATH: &str = "fertility_gdp_2014_2024.json";

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // The base table is constructed once, before the UI starts. A malformed
    // dataset halts startup: no dashboard can render without it.
    let table = data::loader::load_file(Path::new(DATA_PATH))
        .with_context(|| format!("loading dataset {DATA_PATH}"))?;
    log::info!(
        "Loaded {} records covering {} countries",
        table.len(),
        table.country_names().len()
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([700.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "World Trends – Fertility & GDP",
        options,
        Box::new(move |_cc| Ok(Box::new(WorldTrendsApp::new(table)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe: {e}"))
}
