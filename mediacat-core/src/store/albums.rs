use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::store::photos::{photos_in_album, Photo};
use crate::store::Store;

/// A catalog album. `photos` is never persisted: the single-album lookups
/// attach it at read time, the list-all lookup leaves it `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photos: Option<Vec<Photo>>,
}

fn read_album_row(row: &Row<'_>) -> rusqlite::Result<Album> {
    Ok(Album {
        id: row.get(0)?,
        name: row.get(1)?,
        photos: None,
    })
}

fn attach_photos(conn: &Connection, mut album: Album) -> Result<Album, StoreError> {
    album.photos = Some(photos_in_album(conn, album.id)?);
    Ok(album)
}

impl Store {
    /// Case-insensitive exact match on the whole album name. A match
    /// comes back with its derived `photos` list attached, in ascending
    /// photo id order.
    pub fn find_album_by_name(&self, name: &str) -> Result<Option<Album>, StoreError> {
        self.with_conn(|conn| {
            let album = conn
                .query_row(
                    "SELECT id, name FROM albums WHERE LOWER(name) = LOWER(?1) LIMIT 1",
                    params![name],
                    read_album_row,
                )
                .optional()?;
            match album {
                Some(album) => Ok(Some(attach_photos(conn, album)?)),
                None => Ok(None),
            }
        })
    }

    /// Same attachment behavior as [`Store::find_album_by_name`], keyed
    /// by id.
    pub fn find_album_by_id(&self, id: i64) -> Result<Option<Album>, StoreError> {
        self.with_conn(|conn| {
            let album = conn
                .query_row(
                    "SELECT id, name FROM albums WHERE id = ?1",
                    params![id],
                    read_album_row,
                )
                .optional()?;
            match album {
                Some(album) => Ok(Some(attach_photos(conn, album)?)),
                None => Ok(None),
            }
        })
    }

    /// All albums in ascending id order. The derived `photos` list is
    /// left out; fetch a single album when it is needed.
    pub fn find_all_albums(&self) -> Result<Vec<Album>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT id, name FROM albums ORDER BY id ASC")?;
            let rows = stmt.query_map([], read_album_row)?;

            let mut albums = Vec::new();
            for row in rows {
                albums.push(row?);
            }
            Ok(albums)
        })
    }
}
