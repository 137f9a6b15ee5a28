use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

fn hsl_color(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let rgb: Srgb = Hsl::new(hue, saturation, lightness).into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| hsl_color((i as f32 / n.max(1) as f32) * 360.0, 0.75, 0.55))
        .collect()
}

// ---------------------------------------------------------------------------
// Categorical mapping: country name → Color32
// ---------------------------------------------------------------------------

/// Maps each country to a distinct colour, shared by the scatter points,
/// trend lines, and the swatches in the country selector.
#[derive(Debug, Clone)]
pub struct CountryColors {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl CountryColors {
    /// Build the mapping from the table's sorted country index.
    pub fn new(country_names: &[String]) -> Self {
        let palette = generate_palette(country_names.len());
        let mapping = country_names
            .iter()
            .cloned()
            .zip(palette)
            .collect();

        CountryColors {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    pub fn color_for(&self, country: &str) -> Color32 {
        self.mapping
            .get(country)
            .copied()
            .unwrap_or(self.default_color)
    }
}

// ---------------------------------------------------------------------------
// Continuous scale: metric value → Color32
// ---------------------------------------------------------------------------

/// Two-hue continuous scale over a metric's display range, used to colour
/// the map tiles. Low values are deep indigo, high values warm amber.
#[derive(Debug, Clone, Copy)]
pub struct MetricScale {
    min: f64,
    max: f64,
}

impl MetricScale {
    /// `range` is the (min, max) the query layer computed over non-null
    /// values of the selected metric.
    pub fn new(range: (f64, f64)) -> Self {
        MetricScale {
            min: range.0,
            max: range.1,
        }
    }

    /// Normalised position of `value` in the range, clamped to [0, 1].
    /// A degenerate range (single distinct value) sits in the middle.
    fn normalized(&self, value: f64) -> f32 {
        let span = self.max - self.min;
        if span <= f64::EPSILON {
            return 0.5;
        }
        (((value - self.min) / span).clamp(0.0, 1.0)) as f32
    }

    pub fn color_for(&self, value: f64) -> Color32 {
        let t = self.normalized(value);
        // Hue 265° → 45°, brightening toward the high end.
        hsl_color(265.0 - t * 220.0, 0.85, 0.30 + t * 0.30)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size_and_distinct_entries() {
        let palette = generate_palette(12);
        assert_eq!(palette.len(), 12);
        for pair in palette.windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
    }

    #[test]
    fn unknown_country_falls_back_to_gray() {
        let colors = CountryColors::new(&["Fiji".to_string()]);
        assert_eq!(colors.color_for("Atlantis"), Color32::GRAY);
        assert_ne!(colors.color_for("Fiji"), Color32::GRAY);
    }

    #[test]
    fn scale_endpoints_differ_and_out_of_range_clamps() {
        let scale = MetricScale::new((0.0, 100.0));
        let low = scale.color_for(0.0);
        let high = scale.color_for(100.0);
        assert_ne!(low, high);
        assert_eq!(scale.color_for(-50.0), low);
        assert_eq!(scale.color_for(500.0), high);
    }

    #[test]
    fn degenerate_range_still_produces_a_color() {
        let scale = MetricScale::new((7.0, 7.0));
        assert_eq!(scale.color_for(7.0), scale.color_for(123.0));
    }
}
