use serde::{Deserialize, Serialize};

use crate::data::model::EnergyUnit;
use crate::error::{Error, Result};

/// Default half-width of the inferred grid around the outermost lines, in sigmas.
pub const DEFAULT_MARGIN_FACTOR: f64 = 5.0;

pub const DEFAULT_RESOLUTION: usize = 1000;

pub const DEFAULT_SIGMA_EV: f64 = 0.2;

pub const DEFAULT_SIGMA_NM: f64 = 10.0;

/// Explicit sampling range, in the target unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridBounds {
    pub min: f64,
    pub max: f64,
}

impl GridBounds {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

/// Everything that shapes a computed spectrum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BroadeningConfig {
    /// Unit of the spectrum's x axis.
    pub unit: EnergyUnit,
    /// Standard deviation of each Gaussian, in `unit`.
    pub sigma: f64,
    /// Number of grid points, both ends included.
    pub grid_resolution: usize,
    /// Explicit grid range; inferred from the lines when absent.
    pub bounds: Option<GridBounds>,
    /// Margin `k` of the inferred range `[min - k·sigma, max + k·sigma]`.
    pub margin_factor: f64,
    /// Scale the curve so its maximum is 1.
    pub normalize: bool,
}

impl Default for BroadeningConfig {
    fn default() -> Self {
        Self::for_unit(EnergyUnit::ElectronVolt)
    }
}

impl BroadeningConfig {
    /// Defaults with a sigma that suits the given axis unit.
    pub fn for_unit(unit: EnergyUnit) -> Self {
        Self {
            unit,
            sigma: default_sigma(unit),
            grid_resolution: DEFAULT_RESOLUTION,
            bounds: None,
            margin_factor: DEFAULT_MARGIN_FACTOR,
            normalize: false,
        }
    }

    /// Check every numeric parameter.
    pub fn validate(&self) -> Result<()> {
        if !(self.sigma.is_finite() && self.sigma > 0.0) {
            return Err(Error::invalid(format!(
                "sigma must be positive, got {}",
                self.sigma
            )));
        }
        if self.grid_resolution == 0 {
            return Err(Error::invalid("grid_resolution must be at least 1"));
        }
        if !(self.margin_factor.is_finite() && self.margin_factor >= 0.0) {
            return Err(Error::invalid(format!(
                "margin_factor must be non-negative, got {}",
                self.margin_factor
            )));
        }
        if self.bounds.is_none() && self.margin_factor == 0.0 {
            return Err(Error::invalid(
                "margin_factor must be positive when grid bounds are inferred",
            ));
        }
        if let Some(GridBounds { min, max }) = self.bounds {
            if !(min.is_finite() && max.is_finite()) {
                return Err(Error::invalid(format!(
                    "grid bounds must be finite, got [{min}, {max}]"
                )));
            }
            if min >= max {
                return Err(Error::invalid(format!(
                    "grid_min ({min}) must be below grid_max ({max})"
                )));
            }
        }
        Ok(())
    }
}

pub fn default_sigma(unit: EnergyUnit) -> f64 {
    match unit {
        EnergyUnit::ElectronVolt => DEFAULT_SIGMA_EV,
        EnergyUnit::Nanometer => DEFAULT_SIGMA_NM,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        BroadeningConfig::default().validate().unwrap();
        let nm = BroadeningConfig::for_unit(EnergyUnit::Nanometer);
        assert_eq!(nm.sigma, DEFAULT_SIGMA_NM);
        nm.validate().unwrap();
    }

    #[test]
    fn rejects_bad_sigma() {
        for sigma in [0.0, -0.1, f64::NAN, f64::INFINITY] {
            let cfg = BroadeningConfig {
                sigma,
                ..Default::default()
            };
            assert!(matches!(cfg.validate(), Err(Error::InvalidParameter(_))));
        }
    }

    #[test]
    fn rejects_zero_resolution() {
        let cfg = BroadeningConfig {
            grid_resolution: 0,
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn rejects_inverted_bounds() {
        let cfg = BroadeningConfig {
            bounds: Some(GridBounds::new(6.0, 4.0)),
            ..Default::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("grid_min"));
    }

    #[test]
    fn zero_margin_needs_explicit_bounds() {
        let cfg = BroadeningConfig {
            margin_factor: 0.0,
            ..Default::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("margin_factor"));

        let cfg = BroadeningConfig {
            margin_factor: 0.0,
            bounds: Some(GridBounds::new(1.0, 5.0)),
            ..Default::default()
        };
        cfg.validate().unwrap();
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: BroadeningConfig =
            serde_json::from_str(r#"{ "unit": "nm", "sigma": 12.5, "normalize": true }"#).unwrap();
        assert_eq!(cfg.unit, EnergyUnit::Nanometer);
        assert_eq!(cfg.sigma, 12.5);
        assert!(cfg.normalize);
        assert_eq!(cfg.grid_resolution, DEFAULT_RESOLUTION);
        assert_eq!(cfg.margin_factor, DEFAULT_MARGIN_FACTOR);
        assert!(cfg.bounds.is_none());
    }

    #[test]
    fn unknown_unit_in_json_is_rejected() {
        let res: std::result::Result<BroadeningConfig, _> =
            serde_json::from_str(r#"{ "unit": "kelvin" }"#);
        assert!(res.is_err());
    }
}
