use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use spectral_vis::data::loader::load_file;
use spectral_vis::data::model::{EnergyUnit, LineSet};
use spectral_vis::render::{self, ChartOptions};
use spectral_vis::spectrum::config::default_sigma;
use spectral_vis::spectrum::{BroadeningConfig, GridBounds, SpectrumBroadener};

#[derive(Debug, Parser)]
#[command(
    name = "spectral-vis",
    version,
    about = "Gaussian-broadened absorption spectra from excitation energies and oscillator strengths"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open the interactive viewer (the default)
    View(ViewArgs),
    /// Compute a spectrum and write it as .svg, .csv or .json
    Render(RenderArgs),
}

#[derive(Debug, Args)]
pub struct ViewArgs {
    /// Excitation table to open on start
    pub input: Option<PathBuf>,
    #[command(flatten)]
    pub broadening: BroadeningArgs,
}

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Excitation table (.csv, .json or .parquet)
    pub input: PathBuf,
    /// Output file; the extension picks the format
    #[arg(short, long)]
    pub output: PathBuf,
    /// Average the rows of the table instead of summing every line
    #[arg(long)]
    pub ensemble: bool,
    /// Chart size in pixels, WIDTHxHEIGHT
    #[arg(long, default_value = "900x360", value_parser = parse_size)]
    pub size: (u32, u32),
    #[command(flatten)]
    pub broadening: BroadeningArgs,
}

#[derive(Debug, Default, Args)]
pub struct BroadeningArgs {
    /// JSON file with a serialized broadening configuration
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Spectrum axis unit: eV or nm
    #[arg(long)]
    pub unit: Option<String>,
    /// Gaussian standard deviation, in the axis unit
    #[arg(long)]
    pub sigma: Option<f64>,
    /// Number of grid points
    #[arg(long)]
    pub resolution: Option<usize>,
    /// Lower end of the grid (requires --max)
    #[arg(long, requires = "max", allow_hyphen_values = true)]
    pub min: Option<f64>,
    /// Upper end of the grid (requires --min)
    #[arg(long, requires = "min", allow_hyphen_values = true)]
    pub max: Option<f64>,
    /// Grid margin around the outermost lines, in sigmas
    #[arg(long)]
    pub margin: Option<f64>,
    /// Scale the spectrum so its maximum is 1
    #[arg(long)]
    pub normalize: bool,
    /// Unit of the table's energies, overriding detection: eV or nm
    #[arg(long)]
    pub source_unit: Option<String>,
}

impl BroadeningArgs {
    /// Start from `--config` (or unit defaults) and apply explicit flags.
    pub fn resolve(&self) -> Result<BroadeningConfig> {
        let unit = self
            .unit
            .as_deref()
            .map(str::parse::<EnergyUnit>)
            .transpose()?;

        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                let mut config: BroadeningConfig = serde_json::from_str(&text)
                    .with_context(|| format!("parsing config {}", path.display()))?;
                // sigma and bounds from the file are in the file's unit
                if let Some(unit) = unit.filter(|&u| u != config.unit) {
                    config.unit = unit;
                    config.sigma = default_sigma(unit);
                    config.bounds = None;
                }
                config
            }
            None => BroadeningConfig::for_unit(unit.unwrap_or(EnergyUnit::ElectronVolt)),
        };

        if let Some(sigma) = self.sigma {
            config.sigma = sigma;
        }
        if let Some(resolution) = self.resolution {
            config.grid_resolution = resolution;
        }
        if let (Some(min), Some(max)) = (self.min, self.max) {
            config.bounds = Some(GridBounds::new(min, max));
        }
        if let Some(margin) = self.margin {
            config.margin_factor = margin;
        }
        if self.normalize {
            config.normalize = true;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn source_unit(&self) -> Result<Option<EnergyUnit>> {
        Ok(self
            .source_unit
            .as_deref()
            .map(str::parse::<EnergyUnit>)
            .transpose()?)
    }

    /// Load a table, applying the `--source-unit` override.
    pub fn load(&self, path: &Path) -> Result<LineSet> {
        let lines = load_file(path).with_context(|| format!("loading {}", path.display()))?;
        Ok(match self.source_unit()? {
            Some(unit) => lines.with_source_unit(unit),
            None => lines,
        })
    }
}

fn parse_size(s: &str) -> std::result::Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let w = w.trim().parse().map_err(|_| format!("bad width '{w}'"))?;
    let h = h.trim().parse().map_err(|_| format!("bad height '{h}'"))?;
    Ok((w, h))
}

/// Headless load → broaden → write.
pub fn run_render(args: &RenderArgs) -> Result<()> {
    let config = args.broadening.resolve()?;
    let lines = args.broadening.load(&args.input)?;

    let broadener = SpectrumBroadener::new(config)?;
    let curve = if args.ensemble {
        broadener.broaden_ensemble(&lines)?
    } else {
        broadener.broaden(&lines)?
    };

    if let Some((x, y)) = curve.peak() {
        log::info!("Maximum {y:.4} at {x:.3} {}", curve.unit);
    }

    let options = ChartOptions {
        size: args.size,
        caption: Some(render::peak_caption(&curve, broadener.config().sigma)),
    };
    render::save_curve(&curve, &args.output, &options)
        .with_context(|| format!("writing {}", args.output.display()))?;
    Ok(())
}
