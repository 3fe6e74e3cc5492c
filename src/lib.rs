//! Simulated absorption spectra from discrete excitation lines.
//!
//! Three independent steps:
//!
//! ```text
//!  path ──► data::loader::load_file ──► LineSet
//!  LineSet ──► spectrum::calculate_spectrum ──► SpectrumCurve
//!  SpectrumCurve ──► render::save_curve ──► .svg / .csv / .json
//! ```

pub mod color;
pub mod data;
pub mod error;
pub mod render;
pub mod spectrum;

pub use data::model::{EnergyUnit, ExcitationLine, LineSet};
pub use error::{Error, Result};
pub use spectrum::{BroadeningConfig, SpectrumBroadener, SpectrumCurve};
