//! Gaussian line broadening.
//!
//! ```text
//!  LineSet ──► units (source unit → axis unit) ──► grid ──► Σ Gaussians ──► SpectrumCurve
//! ```

pub mod broaden;
pub mod config;
pub mod units;

pub use broaden::{
    calculate_ensemble_spectrum, calculate_row_spectra, calculate_spectrum, SpectrumBroadener,
    SpectrumCurve,
};
pub use config::{BroadeningConfig, GridBounds, DEFAULT_MARGIN_FACTOR};
