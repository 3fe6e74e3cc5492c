use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use spectral_vis::color::row_color;
use spectral_vis::data::model::EnergyUnit;
use spectral_vis::spectrum::GridBounds;

use crate::state::AppState;

const UNITS: [EnergyUnit; 2] = [EnergyUnit::ElectronVolt, EnergyUnit::Nanometer];

// ---------------------------------------------------------------------------
// Left side panel – broadening controls and row selection
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Broadening");
    ui.separator();

    let mut changed = false;

    egui::Grid::new("broadening_params")
        .num_columns(2)
        .spacing([8.0, 4.0])
        .show(ui, |ui: &mut Ui| {
            ui.label("Unit");
            let mut unit = state.config.unit;
            egui::ComboBox::from_id_salt("axis_unit")
                .selected_text(unit.axis_label())
                .show_ui(ui, |ui: &mut Ui| {
                    for u in UNITS {
                        ui.selectable_value(&mut unit, u, u.axis_label());
                    }
                });
            ui.end_row();
            if unit != state.config.unit {
                state.set_unit(unit);
            }

            let speed = match state.config.unit {
                EnergyUnit::ElectronVolt => 0.005,
                EnergyUnit::Nanometer => 0.25,
            };
            ui.label("σ");
            changed |= ui
                .add(
                    egui::DragValue::new(&mut state.config.sigma)
                        .speed(speed)
                        .range(1e-4..=f64::MAX)
                        .suffix(format!(" {}", state.config.unit)),
                )
                .changed();
            ui.end_row();

            ui.label("Points");
            changed |= ui
                .add(
                    egui::DragValue::new(&mut state.config.grid_resolution)
                        .speed(10)
                        .range(2..=100_000),
                )
                .changed();
            ui.end_row();

            ui.label("Margin (σ)");
            changed |= ui
                .add(
                    egui::DragValue::new(&mut state.config.margin_factor)
                        .speed(0.1)
                        .range(0.5..=50.0),
                )
                .changed();
            ui.end_row();
        });

    changed |= ui
        .checkbox(&mut state.config.normalize, "Normalize to peak")
        .changed();

    // ---- Explicit grid range ----
    let mut explicit = state.config.bounds.is_some();
    if ui.checkbox(&mut explicit, "Fixed range").changed() {
        state.config.bounds = if explicit {
            state
                .curve
                .as_ref()
                .and_then(|c| Some(GridBounds::new(*c.x.first()?, *c.x.last()?)))
        } else {
            None
        };
        changed = true;
    }
    if let Some(bounds) = &mut state.config.bounds {
        ui.horizontal(|ui: &mut Ui| {
            changed |= ui.add(egui::DragValue::new(&mut bounds.min).speed(0.05)).changed();
            ui.label("to");
            changed |= ui.add(egui::DragValue::new(&mut bounds.max).speed(0.05)).changed();
        });
    }

    ui.separator();

    let Some(loaded_unit) = state.lines.as_ref().map(|l| l.source_unit()) else {
        if changed {
            state.recompute();
        }
        ui.label("No table loaded.");
        return;
    };

    // ---- Source unit override ----
    let mut source = loaded_unit;
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Table energies in");
        for u in UNITS {
            ui.radio_value(&mut source, u, u.as_str());
        }
    });
    let source_changed = source != loaded_unit;

    changed |= ui
        .checkbox(&mut state.average_rows, "Average rows (ensemble)")
        .changed();
    changed |= ui
        .checkbox(&mut state.show_rows, "Show individual rows")
        .changed();

    if source_changed {
        state.set_source_unit(source);
    } else if changed {
        state.recompute();
    }

    ui.separator();
    row_list(ui, state);
}

/// Per-row checkboxes with All / None, like a column filter.
fn row_list(ui: &mut Ui, state: &mut AppState) {
    let Some(lines) = &state.lines else {
        return;
    };
    let n_rows = lines.row_count();
    let summaries: Vec<String> = lines
        .rows()
        .enumerate()
        .map(|(i, row)| {
            let strongest = row
                .iter()
                .max_by(|a, b| a.oscillator_strength.total_cmp(&b.oscillator_strength));
            match strongest {
                Some(l) => format!(
                    "row {}  ({} lines, f = {:.3} at {:.2} {})",
                    i + 1,
                    row.len(),
                    l.oscillator_strength,
                    l.transition_energy,
                    lines.source_unit()
                ),
                None => format!("row {}  (empty)", i + 1),
            }
        })
        .collect();

    let header_text = format!("Rows  ({}/{})", state.selection.len(), n_rows);
    ui.strong(header_text);
    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            state.select_all();
        }
        if ui.small_button("None").clicked() {
            state.select_none();
        }
    });

    let mut toggled = None;
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (i, label) in summaries.iter().enumerate() {
                let mut text = RichText::new(label);
                if state.show_rows {
                    // overlay colours are assigned over the selected rows only
                    if let Some(pos) = state.selection.iter().position(|&r| r == i) {
                        let c = row_color(pos, state.selection.len());
                        text = text.color(Color32::from_rgb(c.red, c.green, c.blue));
                    }
                }
                let mut checked = state.selection.contains(&i);
                if ui.checkbox(&mut checked, text).changed() {
                    toggled = Some(i);
                }
            }
        });

    if let Some(row) = toggled {
        state.toggle_row(row);
    }
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
            let can_export = state.curve.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export…"))
                .clicked()
            {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(lines) = &state.lines {
            let name = state
                .source_path
                .as_ref()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            ui.label(format!(
                "{name}  {} lines in {} rows, {} selected",
                lines.len(),
                lines.row_count(),
                state.selection.len()
            ));
        }

        if let Some((x, y)) = state.curve.as_ref().and_then(|c| c.peak()) {
            ui.separator();
            ui.label(format!("max {y:.3} at {x:.2} {}", state.config.unit));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open excitation table")
        .add_filter("Supported files", &["csv", "txt", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv", "txt"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match spectral_vis::data::loader::load_file(&path) {
            Ok(lines) => state.set_lines(lines, Some(path)),
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

pub fn export_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export spectrum")
        .set_file_name("spectrum.svg")
        .add_filter("SVG chart", &["svg"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .save_file();

    if let Some(path) = file {
        if let Err(e) = state.export(&path) {
            log::error!("Failed to export: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
