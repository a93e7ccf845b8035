use log::{debug, info};
use rusqlite::{params, Connection};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::StoreError;
use crate::settings::Settings;

pub mod albums;
pub mod photos;

pub use albums::Album;
pub use photos::{Photo, PhotoDetails};

/// Handle to the catalog store: two collections (`photos`, `albums`) kept
/// in a single SQLite database. The photo document's `albums` membership
/// set and `tags` sequence live as JSON columns on the photo row.
///
/// The connection is owned here and established lazily: the first
/// operation (or an explicit [`Store::connect`]) opens the database,
/// creates the schema and seeds it from the flat-file documents. One
/// logical connection per process, serialized by the mutex.
#[derive(Clone)]
pub struct Store {
    db_path: PathBuf,
    data_dir: PathBuf,
    db: Arc<Mutex<Option<Connection>>>,
}

impl Store {
    /// Build a store from the application settings. No I/O happens here;
    /// the database is touched on first use.
    pub fn new(settings: &Settings) -> Self {
        Self {
            db_path: PathBuf::from(&settings.db_path),
            data_dir: PathBuf::from(&settings.data_dir),
            db: Arc::new(Mutex::new(None)),
        }
    }

    /// Establish the connection if none is live. Later calls are no-ops.
    /// On failure nothing of the attempt is kept and the error propagates
    /// to the caller.
    pub fn connect(&self) -> Result<(), StoreError> {
        self.with_conn(|_| Ok(()))
    }

    /// Release the connection. A no-op when not connected.
    pub fn close(&self) -> Result<(), StoreError> {
        let mut guard = self.lock()?;
        if let Some(conn) = guard.take() {
            if let Err((conn, e)) = conn.close() {
                *guard = Some(conn);
                return Err(StoreError::Unavailable(format!(
                    "failed to close catalog database: {e}"
                )));
            }
            debug!("catalog store closed");
        }
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<Connection>>, StoreError> {
        self.db
            .lock()
            .map_err(|_| StoreError::Unavailable("store handle poisoned".to_string()))
    }

    /// Run `f` against the live connection, opening one first if needed.
    pub(crate) fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut guard = self.lock()?;
        if let Some(conn) = guard.as_ref() {
            return f(conn);
        }
        let conn = self.open()?;
        let result = f(&conn);
        *guard = Some(conn);
        result
    }

    fn open(&self) -> Result<Connection, StoreError> {
        if let Some(parent) = self.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    StoreError::Unavailable(format!(
                        "failed to create store directory {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }

        let mut conn = Connection::open(&self.db_path).map_err(|e| {
            StoreError::Unavailable(format!(
                "failed to open catalog database {}: {e}",
                self.db_path.display()
            ))
        })?;

        let _ = conn.execute_batch(
            r#"
PRAGMA journal_mode = WAL;
PRAGMA synchronous = NORMAL;
PRAGMA busy_timeout = 5000;
"#,
        );

        create_collections(&conn)?;
        self.seed_if_empty(&mut conn)?;

        info!("catalog store ready at {}", self.db_path.display());
        Ok(conn)
    }

    /// Import the flat-file documents shipped in the data directory.
    /// Runs only against an empty collection, so reconnecting never
    /// duplicates records. A missing file is a clean empty start; a
    /// malformed one aborts the connect.
    fn seed_if_empty(&self, conn: &mut Connection) -> Result<(), StoreError> {
        let photo_count = count_rows(conn, "photos")?;
        let album_count = count_rows(conn, "albums")?;

        let photos: Vec<Photo> = if photo_count == 0 {
            load_seed(&self.data_dir.join("photos.json"))?
        } else {
            Vec::new()
        };
        let albums: Vec<Album> = if album_count == 0 {
            load_seed(&self.data_dir.join("albums.json"))?
        } else {
            Vec::new()
        };
        if photos.is_empty() && albums.is_empty() {
            return Ok(());
        }

        let tx = conn.transaction().map_err(|e| {
            StoreError::Unavailable(format!("failed to start seed transaction: {e}"))
        })?;
        for photo in &photos {
            let albums_json = serde_json::to_string(&photo.albums).map_err(|e| {
                StoreError::Unreadable(format!("photo {}: bad albums list: {e}", photo.id))
            })?;
            let tags_json = serde_json::to_string(&photo.tags).map_err(|e| {
                StoreError::Unreadable(format!("photo {}: bad tags list: {e}", photo.id))
            })?;
            tx.execute(
                "INSERT INTO photos (id, filename, title, description, date, resolution, albums, tags)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    photo.id,
                    photo.filename,
                    photo.title,
                    photo.description,
                    photo.date,
                    photo.resolution,
                    albums_json,
                    tags_json
                ],
            )
            .map_err(|e| {
                StoreError::Unreadable(format!("photo document {} not importable: {e}", photo.id))
            })?;
        }
        for album in &albums {
            tx.execute(
                "INSERT INTO albums (id, name) VALUES (?1, ?2)",
                params![album.id, album.name],
            )
            .map_err(|e| {
                StoreError::Unreadable(format!("album document {} not importable: {e}", album.id))
            })?;
        }
        tx.commit()
            .map_err(|e| StoreError::Unavailable(format!("failed to commit seed: {e}")))?;

        info!(
            "seeded catalog from {}: {} photos, {} albums",
            self.data_dir.display(),
            photos.len(),
            albums.len()
        );
        Ok(())
    }
}

fn create_collections(conn: &Connection) -> Result<(), StoreError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS photos (
            id INTEGER PRIMARY KEY,
            filename TEXT NOT NULL,
            title TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL DEFAULT '',
            date TEXT NOT NULL DEFAULT '',
            resolution TEXT NOT NULL DEFAULT '',
            albums TEXT NOT NULL DEFAULT '[]',
            tags TEXT NOT NULL DEFAULT '[]'
        )",
        [],
    )
    .map_err(|e| StoreError::Unavailable(format!("failed to create photos table: {e}")))?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS albums (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL
        )",
        [],
    )
    .map_err(|e| StoreError::Unavailable(format!("failed to create albums table: {e}")))?;

    conn.execute(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_albums_name_ci ON albums(LOWER(name))",
        [],
    )
    .map_err(|e| StoreError::Unavailable(format!("failed to create album name index: {e}")))?;

    Ok(())
}

fn count_rows(conn: &Connection, table: &str) -> Result<i64, StoreError> {
    let sql = format!("SELECT COUNT(*) FROM {}", table);
    conn.query_row(&sql, [], |row| row.get(0))
        .map_err(|e| StoreError::Unavailable(format!("failed to inspect {table}: {e}")))
}

fn load_seed<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>, StoreError> {
    if !path.exists() {
        debug!("no seed file at {}", path.display());
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(path)
        .map_err(|e| StoreError::Unreadable(format!("failed to read {}: {e}", path.display())))?;
    serde_json::from_str(&content)
        .map_err(|e| StoreError::Unreadable(format!("failed to parse {}: {e}", path.display())))
}
