use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};
use egui_extras::{Column, TableBuilder};

use crate::color::MetricScale;
use crate::data::model::{Metric, Record};
use crate::data::query::{self, Direction};
use crate::state::AppState;

/// Maximum scatter bubble radius.
const MAX_BUBBLE_RADIUS: f32 = 15.0;

// ---------------------------------------------------------------------------
// Central panel – one vertical scroll of chart sections
// ---------------------------------------------------------------------------

/// Render the dashboard. Each section runs its queries against the current
/// state on every frame; queries are pure and cheap, so there is nothing to
/// cache or invalidate.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Global Population Growth and Fertility Trends in Relation to Economic Development");
            ui.add_space(8.0);

            map_section(ui, state);
            ui.separator();
            scatter_section(ui, state);
            ui.separator();
            trends_section(ui, state);
            ui.separator();
            rankings_section(ui, state);
            ui.separator();
            search_section(ui, state);
        });
}

fn no_data(ui: &mut Ui) {
    ui.label(RichText::new("No data found.").italics());
}

// ---------------------------------------------------------------------------
// Map view – choropleth stand-in
// ---------------------------------------------------------------------------

/// One colored tile per country for the frame year, on a continuous scale
/// normalized over the metric's full display range. egui has no geographic
/// geometry, so the tiles stand in for choropleth regions; the inputs are
/// the same (location codes, a color column, and a scale range).
fn map_section(ui: &mut Ui, state: &AppState) {
    let metric = state.metric;
    ui.strong(format!("Map – {}", metric.label()));
    let title = match metric {
        Metric::GdpPerCapita => "Global GDP per Capita",
        Metric::FertilityRate => "Global Fertility Rates",
        Metric::GdpPercentage => "Global GDP Percentage Growth",
    };
    ui.label(format!("{title} ({})", state.frame_year));

    let rows = query::year_slice(&state.table, state.frame_year);
    let Some(range) = query::metric_range(&state.table, metric) else {
        // Whole column is null: no scale to draw against.
        no_data(ui);
        return;
    };
    if rows.is_empty() {
        no_data(ui);
        return;
    }

    let scale = MetricScale::new(range);
    ui.horizontal_wrapped(|ui: &mut Ui| {
        for record in rows {
            let (fill, hover) = match metric.value_of(record) {
                Some(value) => (
                    scale.color_for(value),
                    format!("{}: {value:.2}", record.country_name),
                ),
                // Missing cells stay on the map, just uncolored.
                None => (
                    Color32::DARK_GRAY,
                    format!("{}: no data", record.country_name),
                ),
            };
            ui.add(
                egui::Button::new(
                    RichText::new(&record.country_code)
                        .color(Color32::WHITE)
                        .monospace(),
                )
                .fill(fill)
                .min_size(egui::vec2(46.0, 24.0)),
            )
            .on_hover_text(hover);
        }
    });
}

// ---------------------------------------------------------------------------
// Scatter – fertility vs GDP
// ---------------------------------------------------------------------------

/// Fertility rate against GDP per capita for the frame year, one bubble per
/// country, sized by the absolute growth percentage. Rows missing either
/// axis value are dropped.
fn scatter_section(ui: &mut Ui, state: &AppState) {
    ui.strong("Scatter – Fertility vs GDP");
    ui.label(format!(
        "Fertility Rate vs GDP Per Capita ({})",
        state.frame_year
    ));

    let rows: Vec<&Record> = query::year_slice(&state.table, state.frame_year)
        .into_iter()
        .filter(|r| r.gdp.is_some() && r.fertility_rate.is_some())
        .collect();
    if rows.is_empty() {
        no_data(ui);
        return;
    }

    let size_max = rows
        .iter()
        .filter_map(|r| r.gdp_percentage_size())
        .fold(0.0_f64, f64::max);

    Plot::new("scatter")
        .height(320.0)
        .x_axis_label("GDP per Capita")
        .y_axis_label("Fertility Rate")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for record in &rows {
                let (Some(gdp), Some(fertility)) = (record.gdp, record.fertility_rate) else {
                    continue;
                };
                let radius = match (record.gdp_percentage_size(), size_max > 0.0) {
                    (Some(size), true) => {
                        2.0 + (size / size_max) as f32 * (MAX_BUBBLE_RADIUS - 2.0)
                    }
                    _ => 3.0,
                };
                let points = Points::new(PlotPoints::from(vec![[gdp, fertility]]))
                    .radius(radius)
                    .color(state.country_colors.color_for(&record.country_name))
                    .name(&record.country_name);
                plot_ui.points(points);
            }
        });
}

// ---------------------------------------------------------------------------
// Trends – fertility over time for the selected countries
// ---------------------------------------------------------------------------

fn trends_section(ui: &mut Ui, state: &AppState) {
    let (from, to) = state.trend_years;
    ui.strong("Trends over Time");
    ui.label(format!("Fertility Rate Trends Over Time ({from}-{to})"));

    let windowed = query::window(&state.table, &state.selected_countries, from..=to);
    let rows = query::positive_only(&windowed);
    if rows.is_empty() {
        no_data(ui);
        return;
    }

    Plot::new("trends")
        .height(320.0)
        .legend(Legend::default())
        .x_axis_label("Year")
        .y_axis_label("Fertility Rate")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for country in &state.selected_countries {
                let series: Vec<[f64; 2]> = rows
                    .iter()
                    .filter(|r| r.country_name == *country)
                    .filter_map(|r| r.fertility_rate.map(|f| [f64::from(r.year), f]))
                    .collect();
                if series.is_empty() {
                    continue;
                }
                let color = state.country_colors.color_for(country);

                let line = Line::new(PlotPoints::from(series.clone()))
                    .color(color)
                    .width(1.5)
                    .name(country);
                plot_ui.line(line);

                // Marker overlay on top of the line, one per observation.
                let markers = Points::new(PlotPoints::from(series))
                    .radius(3.0)
                    .color(color)
                    .name(country);
                plot_ui.points(markers);
            }
        });
}

// ---------------------------------------------------------------------------
// Rankings – top/bottom 10 bar charts
// ---------------------------------------------------------------------------

fn rankings_section(ui: &mut Ui, state: &AppState) {
    ui.strong("Top 10 and Bottom 10 Countries");

    ranking_chart(
        ui,
        state,
        Metric::GdpPerCapita,
        2023,
        Direction::Top,
        "Top 10 Countries by GDP in 2023",
        "GDP per Capita",
    );
    ranking_chart(
        ui,
        state,
        Metric::GdpPerCapita,
        2023,
        Direction::Bottom,
        "Bottom 10 Countries by GDP in 2023",
        "GDP per Capita",
    );
    ranking_chart(
        ui,
        state,
        Metric::FertilityRate,
        2022,
        Direction::Top,
        "Top 10 Countries by Fertility Rate in 2022",
        "Fertility Rate (births per woman)",
    );
    ranking_chart(
        ui,
        state,
        Metric::FertilityRate,
        2022,
        Direction::Bottom,
        "Bottom 10 Countries by Fertility Rate in 2022",
        "Fertility Rate (births per woman)",
    );
}

fn ranking_chart(
    ui: &mut Ui,
    state: &AppState,
    metric: Metric,
    year: i32,
    direction: Direction,
    title: &str,
    y_label: &str,
) {
    ui.add_space(6.0);
    ui.label(title);

    let rows = query::rank_year(&state.table, metric, year, direction, 10);
    if rows.is_empty() {
        no_data(ui);
        return;
    }

    let bars: Vec<Bar> = rows
        .iter()
        .enumerate()
        .filter_map(|(i, r)| {
            metric
                .value_of(r)
                .map(|v| Bar::new(i as f64, v).name(&r.country_name))
        })
        .collect();
    let codes: Vec<String> = rows.iter().map(|r| r.country_code.clone()).collect();

    Plot::new(title.to_string())
        .height(220.0)
        .y_axis_label(y_label)
        .allow_scroll(false)
        .x_axis_formatter(move |mark, _range| {
            let slot = mark.value.round();
            if slot < 0.0 || (mark.value - slot).abs() > 0.25 {
                return String::new();
            }
            codes.get(slot as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

// ---------------------------------------------------------------------------
// Search – free-text country lookup
// ---------------------------------------------------------------------------

fn search_section(ui: &mut Ui, state: &AppState) {
    ui.strong("Search for a Country");

    if state.search_text.trim().is_empty() {
        ui.label("Type a country name in the side panel to search.");
        return;
    }

    let hits = query::search_country(&state.table, &state.search_text);
    if hits.is_empty() {
        ui.label("No data found for the selected country.");
        return;
    }

    let fmt = |v: Option<f64>| v.map(|v| format!("{v:.2}")).unwrap_or_else(|| "-".into());

    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .column(Column::auto().at_least(140.0))
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::remainder())
        .header(20.0, |mut header| {
            for label in [
                "Country",
                "Code",
                "Year",
                "GDP",
                "Fertility Rate",
                "GDP Percentage",
            ] {
                header.col(|ui| {
                    ui.strong(label);
                });
            }
        })
        .body(|mut body| {
            for record in hits {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(&record.country_name);
                    });
                    row.col(|ui| {
                        ui.label(&record.country_code);
                    });
                    row.col(|ui| {
                        ui.label(record.year.to_string());
                    });
                    row.col(|ui| {
                        ui.label(fmt(record.gdp));
                    });
                    row.col(|ui| {
                        ui.label(fmt(record.fertility_rate));
                    });
                    row.col(|ui| {
                        ui.label(fmt(record.gdp_percentage));
                    });
                });
            }
        });
}
