use std::path::PathBuf;

use clap::Parser;
use org_canvas::app::{LoadSource, OrgCanvasApp};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Organization dataset (JSON). Uses the built-in sample when omitted.
    #[arg(long)]
    dataset: Option<PathBuf>,
    /// Simulation config (JSON). Missing fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let source = LoadSource {
        dataset: args.dataset,
        config: args.config,
    };
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "org-canvas",
        options,
        Box::new(move |cc| Ok(Box::new(OrgCanvasApp::new(cc, source)))),
    )
}
