//! Web front end for the photo catalog.
//!
//! Serves the album list, album detail, photo detail and edit-photo
//! pages, plus the static asset directories. All catalog access goes
//! through the shared business layer in `mediacat-core`.

mod handlers;

use clap::Parser;
use handlers::AppState;
use mediacat_core::{Catalog, Settings, Store};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "mediacat-web", version, about = "Serves the album catalog over HTTP")]
struct Args {
    /// Path to the settings file
    #[arg(long, default_value = "settings.json")]
    config: PathBuf,

    /// Override the listen port from the settings file
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(e) = serve(args).await {
        eprintln!("Server error: {e}");
        std::process::exit(1);
    }
}

async fn serve(args: Args) -> Result<(), String> {
    let mut settings = Settings::load(&args.config)?;
    if let Some(port) = args.port {
        settings.port = port;
    }

    let store = Store::new(&settings);
    store
        .connect()
        .map_err(|e| format!("failed to connect to the catalog store: {e}"))?;
    let catalog = Catalog::new(store.clone());

    let templates = handlers::load_templates(&settings.views_dir)?;
    let state = Arc::new(AppState { catalog, templates });
    let app = handlers::router(state, &settings);

    let addr = SocketAddr::from(([127, 0, 0, 1], settings.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("failed to bind {addr}: {e}"))?;
    println!("Server running at http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| format!("server error: {e}"))?;

    store
        .close()
        .map_err(|e| format!("failed to close the catalog store: {e}"))?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("failed to listen for shutdown signal: {e}");
    }
}
