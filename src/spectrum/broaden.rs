use serde::{Deserialize, Serialize};

use super::config::{BroadeningConfig, GridBounds};
use super::units;
use crate::data::model::{EnergyUnit, ExcitationLine, LineSet};
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// SpectrumCurve – the broadened result
// ---------------------------------------------------------------------------

/// A continuous spectrum sampled on a uniform grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectrumCurve {
    /// Unit of `x`.
    pub unit: EnergyUnit,
    /// Grid points, ascending.
    pub x: Vec<f64>,
    /// Summed intensity at each grid point – same length as `x`.
    pub y: Vec<f64>,
}

impl SpectrumCurve {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn axis_label(&self) -> &'static str {
        self.unit.axis_label()
    }

    /// `(x, y)` pairs in grid order.
    pub fn points(&self) -> impl Iterator<Item = [f64; 2]> + '_ {
        self.x.iter().zip(&self.y).map(|(&x, &y)| [x, y])
    }

    pub fn max_intensity(&self) -> f64 {
        self.y.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Grid point of maximum intensity (first one on ties).
    pub fn peak(&self) -> Option<(f64, f64)> {
        self.points()
            .fold(None, |best: Option<[f64; 2]>, p| match best {
                Some(b) if b[1] >= p[1] => Some(b),
                _ => Some(p),
            })
            .map(|[x, y]| (x, y))
    }

    /// Divide `y` by its maximum. The grid is untouched.
    ///
    /// A curve whose maximum is not positive is returned unchanged.
    pub fn normalized(mut self) -> Self {
        let max = self.max_intensity();
        if max > 0.0 && max.is_finite() {
            for v in &mut self.y {
                *v /= max;
            }
        } else {
            log::warn!("Not normalizing a spectrum with maximum intensity {max}");
        }
        self
    }
}

// ---------------------------------------------------------------------------
// SpectrumBroadener
// ---------------------------------------------------------------------------

/// Turns discrete excitation lines into a Gaussian-broadened spectrum.
///
/// Every call is independent: the broadener holds only its configuration and
/// computes a fresh curve each time.
#[derive(Debug, Clone)]
pub struct SpectrumBroadener {
    config: BroadeningConfig,
}

impl SpectrumBroadener {
    /// Validates the configuration up front.
    pub fn new(config: BroadeningConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &BroadeningConfig {
        &self.config
    }

    /// Sum of Gaussians over all lines of the set.
    pub fn broaden(&self, lines: &LineSet) -> Result<SpectrumCurve> {
        let peaks = self.prepare(lines)?;
        let x = self.grid(&peaks);
        let y = x.iter().map(|&xi| gaussian_sum(&peaks, self.config.sigma, xi)).collect();
        Ok(self.finish(SpectrumCurve {
            unit: self.config.unit,
            x,
            y,
        }))
    }

    /// Mean of the per-row spectra, all sampled on one grid spanning every line.
    /// Rows without lines are not counted.
    pub fn broaden_ensemble(&self, lines: &LineSet) -> Result<SpectrumCurve> {
        let peaks = self.prepare(lines)?;
        let x = self.grid(&peaks);
        let sigma = self.config.sigma;

        let mut y = vec![0.0; x.len()];
        let mut offset = 0;
        let mut n_rows = 0usize;
        for row in lines.rows().filter(|row| !row.is_empty()) {
            let row_peaks = &peaks[offset..offset + row.len()];
            offset += row.len();
            n_rows += 1;
            for (yi, &xi) in y.iter_mut().zip(&x) {
                *yi += gaussian_sum(row_peaks, sigma, xi);
            }
        }
        for yi in &mut y {
            *yi /= n_rows as f64;
        }

        log::debug!("Averaged {n_rows} rows on {} grid points", x.len());
        Ok(self.finish(SpectrumCurve {
            unit: self.config.unit,
            x,
            y,
        }))
    }

    /// One curve per row, sharing the ensemble grid.
    pub fn broaden_rows(&self, lines: &LineSet) -> Result<Vec<SpectrumCurve>> {
        let peaks = self.prepare(lines)?;
        let x = self.grid(&peaks);
        let sigma = self.config.sigma;

        let mut offset = 0;
        let curves: Vec<SpectrumCurve> = lines
            .rows()
            .map(|row| {
                let row_peaks = &peaks[offset..offset + row.len()];
                offset += row.len();
                let y = x.iter().map(|&xi| gaussian_sum(row_peaks, sigma, xi)).collect();
                self.finish(SpectrumCurve {
                    unit: self.config.unit,
                    x: x.clone(),
                    y,
                })
            })
            .collect();
        Ok(curves)
    }

    /// Validate the lines and express them as `(strength, position)` in the target unit.
    fn prepare(&self, lines: &LineSet) -> Result<Vec<(f64, f64)>> {
        if lines.is_empty() {
            return Err(Error::EmptyInput);
        }
        lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                validate_line(i, line)?;
                let position =
                    units::convert(line.transition_energy, lines.source_unit(), self.config.unit);
                Ok((line.oscillator_strength, position))
            })
            .collect()
    }

    fn grid(&self, peaks: &[(f64, f64)]) -> Vec<f64> {
        let GridBounds { min, max } = self.config.bounds.unwrap_or_else(|| {
            inferred_bounds(
                peaks.iter().map(|&(_, p)| p),
                self.config.sigma,
                self.config.margin_factor,
            )
        });
        log::debug!(
            "Sampling {} points on [{min}, {max}] {}",
            self.config.grid_resolution,
            self.config.unit
        );
        linspace(min, max, self.config.grid_resolution)
    }

    fn finish(&self, curve: SpectrumCurve) -> SpectrumCurve {
        if self.config.normalize {
            curve.normalized()
        } else {
            curve
        }
    }
}

fn validate_line(index: usize, line: &ExcitationLine) -> Result<()> {
    let ExcitationLine {
        oscillator_strength: f,
        transition_energy: e,
    } = *line;
    if !(f.is_finite() && f >= 0.0) {
        return Err(Error::invalid(format!(
            "line {}: oscillator strength must be non-negative, got {f}",
            index + 1
        )));
    }
    if !(e.is_finite() && e > 0.0) {
        return Err(Error::invalid(format!(
            "line {}: transition energy must be positive, got {e}",
            index + 1
        )));
    }
    Ok(())
}

/// `[min(p) - k·sigma, max(p) + k·sigma]`.
pub fn inferred_bounds(
    positions: impl Iterator<Item = f64>,
    sigma: f64,
    margin_factor: f64,
) -> GridBounds {
    let (lo, hi) = positions.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
        (lo.min(p), hi.max(p))
    });
    let margin = margin_factor * sigma;
    GridBounds::new(lo - margin, hi + margin)
}

/// `n` evenly spaced points from `min` to `max`, both included.
pub fn linspace(min: f64, max: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![min],
        _ => {
            let span = max - min;
            let last = (n - 1) as f64;
            (0..n)
                .map(|i| {
                    if i == n - 1 {
                        max
                    } else {
                        min + span * i as f64 / last
                    }
                })
                .collect()
        }
    }
}

/// `Σ strength · exp(-(x - position)² / (2·sigma²))`.
#[inline]
pub fn gaussian_sum(peaks: &[(f64, f64)], sigma: f64, x: f64) -> f64 {
    let two_sigma_sq = 2.0 * sigma * sigma;
    peaks
        .iter()
        .map(|&(strength, position)| {
            let d = x - position;
            strength * (-(d * d) / two_sigma_sq).exp()
        })
        .sum()
}

/// Broaden `lines` with default settings for `unit`, apart from `sigma` and
/// `grid_resolution`.
///
/// All arguments are validated before any computation starts.
pub fn calculate_spectrum(
    lines: &LineSet,
    unit: &str,
    sigma: f64,
    grid_resolution: usize,
) -> Result<SpectrumCurve> {
    let unit: EnergyUnit = unit.parse()?;
    let config = BroadeningConfig {
        sigma,
        grid_resolution,
        ..BroadeningConfig::for_unit(unit)
    };
    SpectrumBroadener::new(config)?.broaden(lines)
}

/// Ensemble average of the rows of `lines` under `config`.
pub fn calculate_ensemble_spectrum(
    lines: &LineSet,
    config: &BroadeningConfig,
) -> Result<SpectrumCurve> {
    SpectrumBroadener::new(config.clone())?.broaden_ensemble(lines)
}

/// Per-row spectra of `lines` under `config`.
pub fn calculate_row_spectra(
    lines: &LineSet,
    config: &BroadeningConfig,
) -> Result<Vec<SpectrumCurve>> {
    SpectrumBroadener::new(config.clone())?.broaden_rows(lines)
}
