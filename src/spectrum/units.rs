use crate::data::model::EnergyUnit;

/// `h·c / e` in eV·nm: `E[eV] = HC_EV_NM / λ[nm]`.
pub const HC_EV_NM: f64 = 1239.84193;

/// Photon energy in eV for a wavelength in nm.
#[inline]
pub fn nm_to_ev(wavelength_nm: f64) -> f64 {
    HC_EV_NM / wavelength_nm
}

/// Wavelength in nm for a photon energy in eV.
#[inline]
pub fn ev_to_nm(energy_ev: f64) -> f64 {
    HC_EV_NM / energy_ev
}

/// Express `value` (given in `from`) in `to`.
#[inline]
pub fn convert(value: f64, from: EnergyUnit, to: EnergyUnit) -> f64 {
    match (from, to) {
        (EnergyUnit::ElectronVolt, EnergyUnit::Nanometer) => ev_to_nm(value),
        (EnergyUnit::Nanometer, EnergyUnit::ElectronVolt) => nm_to_ev(value),
        _ => value,
    }
}
