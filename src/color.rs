use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

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
            to_color32(rgb)
        })
        .collect()
}

fn to_color32(rgb: Srgb) -> Color32 {
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0).round() as u8,
    )
}

// ---------------------------------------------------------------------------
// Color mapping: category label → Color32
// ---------------------------------------------------------------------------

/// Maps the labels of a categorical axis to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map, assigning palette entries in label order.
    pub fn new<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        let labels: Vec<&str> = labels.into_iter().collect();
        let palette = generate_palette(labels.len());
        let mapping: BTreeMap<String, Color32> = labels
            .into_iter()
            .zip(palette)
            .map(|(l, c)| (l.to_string(), c))
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a given label.
    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping
            .get(label)
            .copied()
            .unwrap_or(self.default_color)
    }
}

// ---------------------------------------------------------------------------
// Diverging scale for the heatmap
// ---------------------------------------------------------------------------

const COOL: (f32, f32, f32) = (0.230, 0.299, 0.754);
const NEUTRAL: (f32, f32, f32) = (0.865, 0.865, 0.865);
const WARM: (f32, f32, f32) = (0.706, 0.016, 0.150);

/// Blue → grey → red diverging scale. `t` is clamped into `[0, 1]`.
pub fn coolwarm(t: f64) -> Color32 {
    let t: f32 = if t.is_nan() { 0.5 } else { t.clamp(0.0, 1.0) as f32 };
    let lin = |(r, g, b): (f32, f32, f32)| -> LinSrgb { Srgb::new(r, g, b).into_linear() };
    let mixed = if t < 0.5 {
        lin(COOL).mix(lin(NEUTRAL), t * 2.0)
    } else {
        lin(NEUTRAL).mix(lin(WARM), (t - 0.5) * 2.0)
    };
    to_color32(Srgb::from_linear(mixed))
}

/// Position of `value` inside `[lo, hi]`, 0.5 when the range is empty.
pub fn normalize(value: f64, lo: f64, hi: f64) -> f64 {
    let span = hi - lo;
    if span.abs() < f64::EPSILON {
        0.5
    } else {
        (value - lo) / span
    }
}

/// Black or white, whichever reads better on `background`.
pub fn contrast_text(background: Color32) -> Color32 {
    let luma = 0.299 * background.r() as f32 + 0.587 * background.g() as f32 + 0.114 * background.b() as f32;
    if luma > 150.0 {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_size_and_distinctness() {
        assert!(generate_palette(0).is_empty());
        let p = generate_palette(5);
        assert_eq!(p.len(), 5);
        for i in 0..p.len() {
            for j in (i + 1)..p.len() {
                assert_ne!(p[i], p[j]);
            }
        }
    }

    #[test]
    fn test_color_map_falls_back_to_gray() {
        let cm = ColorMap::new(["Data", "Design"]);
        assert_ne!(cm.color_for("Data"), cm.color_for("Design"));
        assert_eq!(cm.color_for("Unknown"), Color32::GRAY);
    }

    #[test]
    fn test_coolwarm_endpoints() {
        let cold = coolwarm(0.0);
        let hot = coolwarm(1.0);
        assert!(cold.b() > cold.r());
        assert!(hot.r() > hot.b());
        // Out-of-range input is clamped.
        assert_eq!(coolwarm(-3.0), cold);
        assert_eq!(coolwarm(7.0), hot);
    }

    #[test]
    fn test_normalize_handles_flat_range() {
        assert_eq!(normalize(4.0, 4.0, 4.0), 0.5);
        assert_eq!(normalize(3.0, 2.0, 4.0), 0.5);
        assert_eq!(normalize(4.0, 2.0, 4.0), 1.0);
    }

    #[test]
    fn test_contrast_text() {
        assert_eq!(contrast_text(Color32::WHITE), Color32::BLACK);
        assert_eq!(contrast_text(Color32::from_rgb(20, 20, 80)), Color32::WHITE);
    }
}
