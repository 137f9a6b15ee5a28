use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::model::Metric;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – selector widgets
// ---------------------------------------------------------------------------

/// Render the selector panel. Every widget writes straight into
/// [`AppState`]; the chart sections re-query the table from those values on
/// the same frame.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Controls");
    ui.separator();

    let (min_year, max_year) = state.table.year_bounds().unwrap_or((2014, 2023));

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Metric selector ----
            ui.strong("Metric");
            egui::ComboBox::from_id_salt("metric")
                .selected_text(state.metric.label())
                .show_ui(ui, |ui: &mut Ui| {
                    for metric in Metric::ALL {
                        if ui
                            .selectable_label(state.metric == metric, metric.label())
                            .clicked()
                        {
                            state.metric = metric;
                        }
                    }
                });
            ui.separator();

            // ---- Animation frame for the map and scatter sections ----
            ui.strong("Map / scatter year");
            ui.add(egui::Slider::new(&mut state.frame_year, min_year..=max_year));
            ui.separator();

            // ---- Trend window ----
            ui.strong("Trend window");
            ui.add(egui::Slider::new(&mut state.trend_years.0, min_year..=max_year).text("from"));
            ui.add(egui::Slider::new(&mut state.trend_years.1, min_year..=max_year).text("to"));
            if state.trend_years.1 < state.trend_years.0 {
                state.trend_years.1 = state.trend_years.0;
            }
            ui.separator();

            // ---- Country multi-select ----
            // Clone what we need so we can mutate state inside the loop.
            let countries = state.table.country_names().to_vec();
            let n_selected = state.selected_countries.len();
            let header = format!("Countries  ({n_selected}/{})", countries.len());

            egui::CollapsingHeader::new(RichText::new(header).strong())
                .id_salt("countries")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all_countries();
                        }
                        if ui.small_button("None").clicked() {
                            state.select_no_countries();
                        }
                    });

                    for name in &countries {
                        let swatch = state.country_colors.color_for(name);
                        let mut checked = state.selected_countries.contains(name);
                        if ui
                            .checkbox(&mut checked, RichText::new(name).color(swatch))
                            .changed()
                        {
                            state.toggle_country(name);
                        }
                    }
                });
            ui.separator();

            // ---- Country search ----
            ui.strong("Search");
            ui.label("Enter a country name:");
            ui.text_edit_singleline(&mut state.search_text);
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} records, {} countries",
            state.table.len(),
            state.table.country_names().len()
        ));

        ui.separator();

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

/// Load another dataset snapshot. The current table stays in place when the
/// new file fails to load.
pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open country-year data")
        .add_filter("Supported files", &["json", "csv", "parquet", "pq"])
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(table) => {
                log::info!(
                    "Loaded {} records covering {} countries from {}",
                    table.len(),
                    table.country_names().len(),
                    path.display()
                );
                state.replace_table(table);
            }
            Err(e) => {
                log::error!("Failed to load file: {e}");
                state.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}
