use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
///
/// Used for per-row overlays; the ensemble curve itself is drawn in black.
pub fn generate_palette(n: usize) -> Vec<Srgb<u8>> {
    if n == 0 {
        return Vec::new();
    }
    (0..n).map(|i| row_color(i, n)).collect()
}

/// Colour of row `index` out of `n_rows`.
pub fn row_color(index: usize, n_rows: usize) -> Srgb<u8> {
    let hue = (index as f32 / n_rows.max(1) as f32) * 360.0;
    let rgb: Srgb = Hsl::new(hue, 0.75, 0.55).into_color();
    rgb.into_format()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size_and_distinct_colors() {
        assert!(generate_palette(0).is_empty());
        let colors = generate_palette(6);
        assert_eq!(colors.len(), 6);
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn row_color_matches_palette() {
        let colors = generate_palette(5);
        for (i, c) in colors.iter().enumerate() {
            assert_eq!(row_color(i, 5), *c);
        }
    }
}
