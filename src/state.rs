use std::path::{Path, PathBuf};

use spectral_vis::data::model::{EnergyUnit, LineSet};
use spectral_vis::data::selection::{apply_selection, select_all, RowSelection};
use spectral_vis::render::{self, ChartOptions};
use spectral_vis::spectrum::config::default_sigma;
use spectral_vis::spectrum::{BroadeningConfig, SpectrumBroadener, SpectrumCurve};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded excitation lines (None until user loads a file).
    pub lines: Option<LineSet>,

    /// File the lines came from.
    pub source_path: Option<PathBuf>,

    /// Rows taking part in the spectrum.
    pub selection: RowSelection,

    /// Broadening parameters edited in the side panel.
    pub config: BroadeningConfig,

    /// Average the selected rows instead of summing every line.
    pub average_rows: bool,

    /// Overlay one curve per selected row.
    pub show_rows: bool,

    /// Spectrum of the current selection and config.
    pub curve: Option<SpectrumCurve>,

    /// Per-row curves, filled only when `show_rows` is on.
    pub row_curves: Vec<SpectrumCurve>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

}

impl Default for AppState {
    fn default() -> Self {
        Self {
            lines: None,
            source_path: None,
            selection: RowSelection::new(),
            config: BroadeningConfig::default(),
            average_rows: true,
            show_rows: false,
            curve: None,
            row_curves: Vec::new(),
            status_message: None,
        }
    }
}

impl AppState {
    pub fn with_config(config: BroadeningConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Ingest a newly loaded table, select every row and compute.
    pub fn set_lines(&mut self, lines: LineSet, path: Option<PathBuf>) {
        self.selection = select_all(&lines);
        self.lines = Some(lines);
        self.source_path = path;
        self.status_message = None;
        self.recompute();
    }

    /// Override the unit the loaded energies are read in.
    pub fn set_source_unit(&mut self, unit: EnergyUnit) {
        if let Some(lines) = self.lines.take() {
            self.lines = Some(lines.with_source_unit(unit));
            self.recompute();
        }
    }

    /// Switch the axis unit. Sigma and explicit bounds only make sense in
    /// the old unit, so they are reset.
    pub fn set_unit(&mut self, unit: EnergyUnit) {
        if self.config.unit == unit {
            return;
        }
        self.config.unit = unit;
        self.config.sigma = default_sigma(unit);
        self.config.bounds = None;
        self.recompute();
    }

    /// Rebuild the curves from the lines, selection and config.
    pub fn recompute(&mut self) {
        self.row_curves.clear();
        let Some(lines) = &self.lines else {
            self.curve = None;
            return;
        };
        let selected = apply_selection(lines, &self.selection);

        let result = SpectrumBroadener::new(self.config.clone()).and_then(|broadener| {
            let curve = if self.average_rows {
                broadener.broaden_ensemble(&selected)?
            } else {
                broadener.broaden(&selected)?
            };
            let rows = if self.show_rows {
                broadener.broaden_rows(&selected)?
            } else {
                Vec::new()
            };
            Ok((curve, rows))
        });

        match result {
            Ok((curve, rows)) => {
                self.curve = Some(curve);
                self.row_curves = rows;
                self.status_message = None;
            }
            Err(e) => {
                log::warn!("Cannot compute spectrum: {e}");
                self.curve = None;
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Toggle a single row in the selection.
    pub fn toggle_row(&mut self, row: usize) {
        if !self.selection.remove(&row) {
            self.selection.insert(row);
        }
        self.recompute();
    }

    /// Select all rows.
    pub fn select_all(&mut self) {
        if let Some(lines) = &self.lines {
            self.selection = select_all(lines);
            self.recompute();
        }
    }

    /// Deselect all rows.
    pub fn select_none(&mut self) {
        self.selection.clear();
        self.recompute();
    }

    /// Write the current curve to `path` (svg, csv or json).
    pub fn export(&self, path: &Path) -> anyhow::Result<()> {
        let curve = self
            .curve
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("no spectrum to export"))?;
        let options = ChartOptions {
            caption: Some(render::peak_caption(curve, self.config.sigma)),
            ..Default::default()
        };
        render::save_curve(curve, path, &options)?;
        Ok(())
    }
}
