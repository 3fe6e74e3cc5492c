//! Render step: charts and curve files.
//!
//! The interactive viewer lives in the binary; everything here is headless.

pub mod chart;
pub mod export;

use std::path::Path;

use crate::error::{Error, Result};
use crate::spectrum::SpectrumCurve;

pub use chart::{peak_caption, render_svg, render_svg_string, ChartOptions};

/// Round `value` up to a tidy axis limit: `ceil` up to 10, otherwise the same
/// rule applied to `value / 10` and scaled back (23 → 30, 412 → 500).
pub fn nice_ceiling(value: f64) -> f64 {
    const BASE: f64 = 10.0;
    if !value.is_finite() {
        return value;
    }
    let mut scale = 1.0;
    let mut v = value;
    while v > BASE {
        v /= BASE;
        scale *= BASE;
    }
    v.ceil() * scale
}

/// Write the curve to `path`, choosing the format from the extension
/// (`svg`, `csv` or `json`).
pub fn save_curve(curve: &SpectrumCurve, path: &Path, options: &ChartOptions) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "svg" => render_svg(curve, path, options),
        "csv" => export::save_csv(curve, path),
        "json" => export::save_json(curve, path),
        other => Err(Error::Render(format!(
            "unsupported output extension: .{other} (expected .svg, .csv or .json)"
        ))),
    }
}
