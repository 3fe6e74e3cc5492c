mod app;
mod cli;
mod state;
mod ui;

use anyhow::Result;
use app::SpectralVisApp;
use clap::Parser;
use cli::{Cli, Command, ViewArgs};
use eframe::egui;
use state::AppState;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Some(Command::Render(args)) => cli::run_render(&args),
        Some(Command::View(args)) => run_viewer(args),
        None => run_viewer(ViewArgs {
            input: None,
            broadening: Default::default(),
        }),
    }
}

fn run_viewer(args: ViewArgs) -> Result<()> {
    let mut state = AppState::with_config(args.broadening.resolve()?);
    if let Some(path) = &args.input {
        let lines = args.broadening.load(path)?;
        state.set_lines(lines, Some(path.clone()));
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Spectral Vis – Broadened Absorption Spectra",
        options,
        Box::new(|_cc| Ok(Box::new(SpectralVisApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("viewer failed: {e}"))
}
