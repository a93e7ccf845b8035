//! Interactive console client for the photo catalog.
//!
//! Presents a numbered menu for the three catalog actions (find photo,
//! update photo, find album) and exits on request. Uses the same store
//! and business layer as the web front end.

mod menu;

use clap::Parser;
use mediacat_core::{Catalog, Settings, Store};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "mediacat-cli",
    version,
    about = "Browse and edit the photo catalog from a terminal"
)]
struct Args {
    /// Path to the settings file
    #[arg(long, default_value = "settings.json")]
    config: PathBuf,
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), String> {
    let settings = Settings::load(&args.config)?;
    log::debug!("using settings from {}", args.config.display());

    // The store connects lazily on the first action; a connection problem
    // surfaces as an error line in the menu, not a startup failure.
    let store = Store::new(&settings);
    let catalog = Catalog::new(store.clone());

    let stdin = io::stdin();
    let stdout = io::stdout();
    menu::run_menu(&catalog, &mut stdin.lock(), &mut stdout.lock())
        .map_err(|e| format!("console I/O failed: {e}"))?;

    store
        .close()
        .map_err(|e| format!("failed to close the catalog store: {e}"))?;
    Ok(())
}
