use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

// ---------------------------------------------------------------------------
// EnergyUnit – how a transition energy (or a spectrum axis) is expressed
// ---------------------------------------------------------------------------

/// Either photon energy in eV or the equivalent wavelength in nm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnergyUnit {
    #[serde(rename = "eV")]
    ElectronVolt,
    #[serde(rename = "nm")]
    Nanometer,
}

impl EnergyUnit {
    /// Energy columns whose first value is below this are taken to be eV.
    pub const DETECTION_THRESHOLD: f64 = 10.0;

    /// Guess the unit of a table from its first energy value.
    pub fn detect(first_value: f64) -> Self {
        if first_value < Self::DETECTION_THRESHOLD {
            EnergyUnit::ElectronVolt
        } else {
            EnergyUnit::Nanometer
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EnergyUnit::ElectronVolt => "eV",
            EnergyUnit::Nanometer => "nm",
        }
    }

    /// Axis label used by every renderer.
    pub fn axis_label(self) -> &'static str {
        match self {
            EnergyUnit::ElectronVolt => "Energy [eV]",
            EnergyUnit::Nanometer => "Wavelength [nm]",
        }
    }

    /// Column header for exported curves.
    pub fn column_name(self) -> &'static str {
        match self {
            EnergyUnit::ElectronVolt => "energy_ev",
            EnergyUnit::Nanometer => "wavelength_nm",
        }
    }

    /// Absorption spectra in wavelength are conventionally drawn right-to-left.
    pub fn inverted_axis(self) -> bool {
        matches!(self, EnergyUnit::Nanometer)
    }
}

impl FromStr for EnergyUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eV" => Ok(EnergyUnit::ElectronVolt),
            "nm" => Ok(EnergyUnit::Nanometer),
            other => Err(Error::UnsupportedUnit(other.to_string())),
        }
    }
}

impl fmt::Display for EnergyUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ExcitationLine – one (strength, energy) pair
// ---------------------------------------------------------------------------

/// A single electronic transition. The energy is in the owning
/// [`LineSet`]'s source unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExcitationLine {
    pub oscillator_strength: f64,
    pub transition_energy: f64,
}

impl ExcitationLine {
    pub fn new(oscillator_strength: f64, transition_energy: f64) -> Self {
        Self {
            oscillator_strength,
            transition_energy,
        }
    }
}

// ---------------------------------------------------------------------------
// LineSet – the complete loaded table
// ---------------------------------------------------------------------------

/// All excitation lines of a table, flattened row by row.
///
/// Each source row is one snapshot of the system (a conformer, an MD frame);
/// the row boundaries are kept so ensemble averages can be formed.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSet {
    lines: Vec<ExcitationLine>,
    /// `rows[i]` is the range of `lines` that came from row `i`.
    rows: Vec<Range<usize>>,
    source_unit: EnergyUnit,
}

impl LineSet {
    /// Treat every line as its own row.
    pub fn from_lines(lines: Vec<ExcitationLine>, source_unit: EnergyUnit) -> Self {
        let rows = (0..lines.len()).map(|i| i..i + 1).collect();
        Self {
            lines,
            rows,
            source_unit,
        }
    }

    /// Build from per-row line lists, keeping the row boundaries.
    pub fn from_rows(rows: Vec<Vec<ExcitationLine>>, source_unit: EnergyUnit) -> Self {
        let mut lines = Vec::with_capacity(rows.iter().map(Vec::len).sum());
        let mut bounds = Vec::with_capacity(rows.len());
        for row in rows {
            let start = lines.len();
            lines.extend(row);
            bounds.push(start..lines.len());
        }
        Self {
            lines,
            rows: bounds,
            source_unit,
        }
    }

    /// Override the unit the energies are expressed in.
    pub fn with_source_unit(mut self, unit: EnergyUnit) -> Self {
        self.source_unit = unit;
        self
    }

    pub fn source_unit(&self) -> EnergyUnit {
        self.source_unit
    }

    pub fn lines(&self) -> &[ExcitationLine] {
        &self.lines
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ExcitationLine> {
        self.lines.iter()
    }

    /// Lines grouped by source row, in file order.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[ExcitationLine]> + '_ {
        self.rows.iter().map(|r| &self.lines[r.clone()])
    }

    /// Lines of a single row.
    pub fn row(&self, index: usize) -> Option<&[ExcitationLine]> {
        self.rows.get(index).map(|r| &self.lines[r.clone()])
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether there are no lines at all.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl<'a> IntoIterator for &'a LineSet {
    type Item = &'a ExcitationLine;
    type IntoIter = std::slice::Iter<'a, ExcitationLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_parses_only_known_strings() {
        assert_eq!("eV".parse::<EnergyUnit>().unwrap(), EnergyUnit::ElectronVolt);
        assert_eq!("nm".parse::<EnergyUnit>().unwrap(), EnergyUnit::Nanometer);
        assert!(matches!(
            "kelvin".parse::<EnergyUnit>(),
            Err(Error::UnsupportedUnit(u)) if u == "kelvin"
        ));
        assert!("ev".parse::<EnergyUnit>().is_err());
    }

    #[test]
    fn unit_detection_splits_at_ten() {
        assert_eq!(EnergyUnit::detect(3.2), EnergyUnit::ElectronVolt);
        assert_eq!(EnergyUnit::detect(535.2), EnergyUnit::Nanometer);
        assert_eq!(EnergyUnit::detect(10.0), EnergyUnit::Nanometer);
    }

    #[test]
    fn unit_serializes_as_symbol() {
        let json = serde_json::to_string(&EnergyUnit::Nanometer).unwrap();
        assert_eq!(json, "\"nm\"");
        let back: EnergyUnit = serde_json::from_str("\"eV\"").unwrap();
        assert_eq!(back, EnergyUnit::ElectronVolt);
    }

    #[test]
    fn rows_keep_boundaries_while_iteration_is_flat() {
        let set = LineSet::from_rows(
            vec![
                vec![ExcitationLine::new(1.0, 500.0), ExcitationLine::new(0.1, 340.0)],
                vec![ExcitationLine::new(0.9, 510.0)],
            ],
            EnergyUnit::Nanometer,
        );
        assert_eq!(set.len(), 3);
        assert_eq!(set.row_count(), 2);
        assert_eq!(set.row(0).unwrap().len(), 2);
        assert_eq!(set.row(1).unwrap()[0].transition_energy, 510.0);
        assert!(set.row(2).is_none());

        let energies: Vec<f64> = set.iter().map(|l| l.transition_energy).collect();
        assert_eq!(energies, vec![500.0, 340.0, 510.0]);
    }

    #[test]
    fn from_lines_gives_one_row_per_line() {
        let set = LineSet::from_lines(
            vec![ExcitationLine::new(1.0, 5.0), ExcitationLine::new(0.5, 6.0)],
            EnergyUnit::ElectronVolt,
        );
        assert_eq!(set.row_count(), 2);
        assert!(!set.is_empty());
        let set = set.with_source_unit(EnergyUnit::Nanometer);
        assert_eq!(set.source_unit(), EnergyUnit::Nanometer);
    }
}
