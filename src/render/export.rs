use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::spectrum::SpectrumCurve;

// ---------------------------------------------------------------------------
// Curve export: CSV / JSON
// ---------------------------------------------------------------------------

/// Two columns, `energy_ev,intensity` or `wavelength_nm,intensity`.
pub fn write_csv<W: Write>(curve: &SpectrumCurve, out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record([curve.unit.column_name(), "intensity"])?;
    for (x, y) in curve.x.iter().zip(&curve.y) {
        writer.serialize((x, y))?;
    }
    writer.flush()?;
    Ok(())
}

/// `{ "unit": "eV", "x": [...], "y": [...] }`
pub fn write_json<W: Write>(curve: &SpectrumCurve, out: W) -> Result<()> {
    serde_json::to_writer_pretty(out, curve)?;
    Ok(())
}

pub fn save_csv(curve: &SpectrumCurve, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_csv(curve, std::io::BufWriter::new(file))
}

pub fn save_json(curve: &SpectrumCurve, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)?;
    let mut out = std::io::BufWriter::new(file);
    write_json(curve, &mut out)?;
    out.flush()?;
    Ok(())
}
