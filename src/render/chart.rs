use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use super::nice_ceiling;
use crate::error::{Error, Result};
use crate::spectrum::SpectrumCurve;

/// Layout of a rendered chart.
#[derive(Debug, Clone)]
pub struct ChartOptions {
    /// Pixel size of the drawing area.
    pub size: (u32, u32),
    pub caption: Option<String>,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            size: (900, 360),
            caption: None,
        }
    }
}

/// `σ = 0.2, max energy = 4.52 eV` / `σ = 10, λmax = 535.1 nm`.
pub fn peak_caption(curve: &SpectrumCurve, sigma: f64) -> String {
    match (curve.peak(), curve.unit.inverted_axis()) {
        (Some((x, _)), false) => format!("σ = {sigma}, max energy = {x:.2} eV"),
        (Some((x, _)), true) => format!("σ = {sigma}, λmax = {x:.1} nm"),
        (None, _) => format!("σ = {sigma}"),
    }
}

/// Render the curve as an SVG file.
pub fn render_svg(curve: &SpectrumCurve, path: &Path, options: &ChartOptions) -> Result<()> {
    let root = SVGBackend::new(path, options.size).into_drawing_area();
    draw(&root, curve, options)?;
    root.present().map_err(render_error)?;
    log::info!("Wrote chart to {}", path.display());
    Ok(())
}

/// Render the curve to an SVG document in memory.
pub fn render_svg_string(curve: &SpectrumCurve, options: &ChartOptions) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, options.size).into_drawing_area();
        draw(&root, curve, options)?;
        root.present().map_err(render_error)?;
    }
    Ok(svg)
}

fn draw<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    curve: &SpectrumCurve,
    options: &ChartOptions,
) -> Result<()> {
    if curve.is_empty() {
        return Err(Error::Render("cannot draw an empty curve".into()));
    }
    root.fill(&WHITE).map_err(render_error)?;

    // Wavelength axes run right-to-left: plot -x and print |x| on the ticks.
    let flip: f64 = if curve.unit.inverted_axis() { -1.0 } else { 1.0 };
    let (mut x_lo, mut x_hi) = curve
        .x
        .iter()
        .map(|&x| x * flip)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
            (lo.min(x), hi.max(x))
        });
    if x_lo == x_hi {
        x_lo -= 0.5;
        x_hi += 0.5;
    }

    let top = nice_ceiling(curve.max_intensity());
    let y_hi = if top > 0.0 { top } else { 1.0 };

    let mut builder = ChartBuilder::on(root);
    builder
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(56);
    if let Some(caption) = &options.caption {
        builder.caption(caption, ("sans-serif", 16));
    }
    let mut chart = builder
        .build_cartesian_2d(x_lo..x_hi, 0.0..y_hi)
        .map_err(render_error)?;

    let decimals = if curve.unit.inverted_axis() { 0 } else { 2 };
    let x_ticks = |x: &f64| format!("{:.*}", decimals, x * flip);
    chart
        .configure_mesh()
        .x_desc(curve.axis_label())
        .y_desc("Intensity [a.u.]")
        .x_label_formatter(&x_ticks)
        .draw()
        .map_err(render_error)?;

    chart
        .draw_series(LineSeries::new(
            curve.points().map(|[x, y]| (x * flip, y)),
            &BLACK,
        ))
        .map_err(render_error)?;

    Ok(())
}

fn render_error(err: impl std::fmt::Display) -> Error {
    Error::Render(err.to_string())
}
