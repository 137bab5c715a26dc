use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use demand_dash::data::aggregate::AccuracyBand;
use demand_dash::data::fulfillment::RangeTone;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: category label → Color32
// ---------------------------------------------------------------------------

/// Stable colours for the slices of a pie or the bars of a category chart.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
}

impl ColorMap {
    /// One colour per distinct label, assigned in the given order.
    pub fn new(labels: &[String]) -> Self {
        let palette = generate_palette(labels.len());
        let mapping = labels.iter().cloned().zip(palette).collect();
        ColorMap { mapping }
    }

    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping.get(label).copied().unwrap_or(Color32::GRAY)
    }
}

// ---------------------------------------------------------------------------
// Semantic colours
// ---------------------------------------------------------------------------

pub const ACTUAL: Color32 = Color32::from_rgb(2, 70, 115);
pub const FITTED: Color32 = Color32::from_rgb(92, 153, 227);
pub const FORECAST: Color32 = Color32::from_rgb(255, 140, 0);

pub fn accuracy_band(band: AccuracyBand) -> Color32 {
    match band {
        AccuracyBand::Excellent => Color32::from_rgb(22, 163, 74),
        AccuracyBand::Good => Color32::from_rgb(37, 99, 235),
        AccuracyBand::Fair => Color32::from_rgb(202, 138, 4),
        AccuracyBand::Poor => Color32::from_rgb(220, 38, 38),
    }
}

pub fn range_tone(tone: RangeTone) -> Color32 {
    match tone {
        RangeTone::Red => Color32::from_rgb(239, 68, 68),
        RangeTone::Blue => Color32::from_rgb(59, 130, 246),
        RangeTone::Green => Color32::from_rgb(34, 197, 94),
    }
}
