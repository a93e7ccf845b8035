use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Application configuration, loaded once at startup and passed by
/// reference into the components that need it. Every field has a default
/// so a missing or partial `settings.json` still yields a working setup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// SQLite database file backing the catalog.
    pub db_path: String,
    /// Directory holding the flat-file seed documents
    /// (`photos.json` / `albums.json`).
    pub data_dir: String,
    /// Directory of static assets served at the site root.
    pub public_dir: String,
    /// Directory of photo files served under `/photos`.
    pub photos_dir: String,
    /// Directory of page templates.
    pub views_dir: String,
    /// HTTP listen port.
    pub port: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            data_dir: default_data_dir(),
            public_dir: default_public_dir(),
            photos_dir: default_photos_dir(),
            views_dir: default_views_dir(),
            port: default_port(),
        }
    }
}

fn default_db_path() -> String {
    "catalog.db".to_string()
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_public_dir() -> String {
    "public".to_string()
}

fn default_photos_dir() -> String {
    "photos".to_string()
}

fn default_views_dir() -> String {
    "views".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Settings {
    /// Read settings from a JSON file. A missing file is not an error:
    /// defaults apply. A present but malformed file is.
    pub fn load(path: &Path) -> Result<Settings, String> {
        if !path.exists() {
            log::debug!("no settings file at {}, using defaults", path.display());
            return Ok(Settings::default());
        }
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read settings file {}: {}", path.display(), e))?;
        serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse settings file {}: {}", path.display(), e))
    }
}
