use eframe::egui::{Color32, Ui};
use egui_plot::{GridMark, Line, Plot, PlotPoints, VLine};
use spectral_vis::color::generate_palette;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Spectrum plot (central panel)
// ---------------------------------------------------------------------------

/// Render the broadened spectrum in the central panel.
pub fn spectrum_plot(ui: &mut Ui, state: &AppState) {
    let curve = match &state.curve {
        Some(c) => c,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                let text = if state.lines.is_none() {
                    "Open an excitation table to view its spectrum  (File → Open…)"
                } else {
                    "Nothing to plot – check the selected rows and parameters"
                };
                ui.heading(text);
            });
            return;
        }
    };

    // Wavelength runs right-to-left: plot -x and label ticks with |x|.
    let flip: f64 = if curve.unit.inverted_axis() { -1.0 } else { 1.0 };
    let palette = generate_palette(state.row_curves.len());
    let main_color = ui.visuals().strong_text_color();

    Plot::new("spectrum_plot")
        .legend(egui_plot::Legend::default())
        .x_axis_label(curve.axis_label())
        .y_axis_label("Intensity [a.u.]")
        .x_axis_formatter(move |mark: GridMark, _range| {
            let decimals = (-mark.step_size.log10()).ceil().max(0.0) as usize;
            format!("{:.*}", decimals, mark.value * flip)
        })
        .label_formatter(move |name, value| {
            let prefix = if name.is_empty() {
                String::new()
            } else {
                format!("{name}\n")
            };
            format!("{prefix}x = {:.3}\ny = {:.4}", value.x * flip, value.y)
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            let rows = state.row_curves.iter().zip(&palette).zip(&state.selection);
            for ((row, c), &source_row) in rows {
                let points: PlotPoints = row.points().map(|[x, y]| [x * flip, y]).collect();
                plot_ui.line(
                    Line::new(points)
                        .name(format!("row {}", source_row + 1))
                        .color(Color32::from_rgb(c.red, c.green, c.blue))
                        .width(1.0),
                );
            }

            let points: PlotPoints = curve.points().map(|[x, y]| [x * flip, y]).collect();
            let name = if state.average_rows {
                "Ensemble average"
            } else {
                "Broadened spectrum"
            };
            plot_ui.line(
                Line::new(points)
                    .name(name)
                    .color(main_color)
                    .width(2.0),
            );

            if let Some((px, _)) = curve.peak() {
                plot_ui.vline(
                    VLine::new(px * flip)
                        .name(format!("max at {px:.2} {}", curve.unit))
                        .color(Color32::GRAY),
                );
            }
        });
}
