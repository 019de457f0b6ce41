use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

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

/// Colour of series `i`, cycling through `palette`.
pub fn series_color(palette: &[Color32], i: usize) -> Color32 {
    if palette.is_empty() {
        Color32::LIGHT_BLUE
    } else {
        palette[i % palette.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_colours_are_distinct() {
        let palette = generate_palette(6);
        assert_eq!(palette.len(), 6);
        for (i, a) in palette.iter().enumerate() {
            for b in &palette[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn series_colours_cycle() {
        let palette = generate_palette(3);
        assert_eq!(series_color(&palette, 4), palette[1]);
        assert_eq!(series_color(&[], 4), Color32::LIGHT_BLUE);
    }
}
