use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::store::Store;

/// A catalog photo. Stored as one document; `albums` carries the
/// membership relation (album ids), `tags` keeps its original order.
///
/// Ids are assigned outside this system; nothing here creates or deletes
/// photos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub id: i64,
    pub filename: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Raw date text as stored. Display formatting happens in the front
    /// ends, never here.
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub resolution: String,
    #[serde(default)]
    pub albums: Vec<i64>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Partial update for a photo's scalar fields. `None` leaves the stored
/// value untouched. `id`, `albums` and `tags` are not updatable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotoDetails {
    pub filename: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub resolution: Option<String>,
}

/// One photo row as stored, the JSON document columns still unparsed.
struct PhotoRow {
    id: i64,
    filename: String,
    title: String,
    description: String,
    date: String,
    resolution: String,
    albums: String,
    tags: String,
}

fn read_photo_row(row: &Row<'_>) -> rusqlite::Result<PhotoRow> {
    Ok(PhotoRow {
        id: row.get(0)?,
        filename: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        date: row.get(4)?,
        resolution: row.get(5)?,
        albums: row.get(6)?,
        tags: row.get(7)?,
    })
}

impl PhotoRow {
    fn into_photo(self) -> Result<Photo, StoreError> {
        let albums = serde_json::from_str(&self.albums).map_err(|e| {
            StoreError::Unreadable(format!("photo {} has a corrupt albums list: {e}", self.id))
        })?;
        let tags = serde_json::from_str(&self.tags).map_err(|e| {
            StoreError::Unreadable(format!("photo {} has a corrupt tags list: {e}", self.id))
        })?;
        Ok(Photo {
            id: self.id,
            filename: self.filename,
            title: self.title,
            description: self.description,
            date: self.date,
            resolution: self.resolution,
            albums,
            tags,
        })
    }
}

pub(crate) fn photo_by_id(conn: &Connection, id: i64) -> Result<Option<Photo>, StoreError> {
    let row = conn
        .query_row(
            "SELECT id, filename, title, description, date, resolution, albums, tags
             FROM photos WHERE id = ?1",
            params![id],
            read_photo_row,
        )
        .optional()?;
    match row {
        Some(row) => Ok(Some(row.into_photo()?)),
        None => Ok(None),
    }
}

/// Every photo whose `albums` set contains `album_id`, in ascending photo
/// id order. Membership lives in the photo document, so this scans the
/// collection and filters on the parsed list.
pub(crate) fn photos_in_album(conn: &Connection, album_id: i64) -> Result<Vec<Photo>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT id, filename, title, description, date, resolution, albums, tags
         FROM photos ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([], read_photo_row)?;

    let mut photos = Vec::new();
    for row in rows {
        let photo = row?.into_photo()?;
        if photo.albums.contains(&album_id) {
            photos.push(photo);
        }
    }
    Ok(photos)
}

impl Store {
    /// Exact-id lookup. Absent id is `Ok(None)`, not an error.
    pub fn find_photo_by_id(&self, id: i64) -> Result<Option<Photo>, StoreError> {
        self.with_conn(|conn| photo_by_id(conn, id))
    }

    /// Overwrite the supplied scalar fields of a matching photo and hand
    /// back the post-update record. `None` fields keep their stored
    /// values. When no photo matches, nothing is written and the result
    /// is `Ok(None)`; an update never inserts.
    pub fn update_photo_details(
        &self,
        id: i64,
        details: &PhotoDetails,
    ) -> Result<Option<Photo>, StoreError> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE photos SET
                    filename = COALESCE(?2, filename),
                    title = COALESCE(?3, title),
                    description = COALESCE(?4, description),
                    date = COALESCE(?5, date),
                    resolution = COALESCE(?6, resolution)
                 WHERE id = ?1",
                params![
                    id,
                    details.filename,
                    details.title,
                    details.description,
                    details.date,
                    details.resolution
                ],
            )?;
            if changed == 0 {
                return Ok(None);
            }
            photo_by_id(conn, id)
        })
    }

    /// See [`photos_in_album`]. An album id no photo references yields an
    /// empty list, never an error.
    pub fn find_photos_by_album(&self, album_id: i64) -> Result<Vec<Photo>, StoreError> {
        self.with_conn(|conn| photos_in_album(conn, album_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testutil::seeded_store;

    #[test]
    fn test_find_photo_by_id_absent_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded_store(dir.path());
        assert!(store.find_photo_by_id(42).unwrap().is_none());
    }

    #[test]
    fn test_find_photo_by_id_returns_full_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded_store(dir.path());

        let photo = store.find_photo_by_id(1).unwrap().unwrap();
        assert_eq!(photo.filename, "sunset.jpg");
        assert_eq!(photo.title, "Sunset");
        assert_eq!(photo.description, "Sunset over the bay");
        assert_eq!(photo.date, "2020-07-15");
        assert_eq!(photo.resolution, "1920x1080");
        assert_eq!(photo.albums, vec![1, 2]);
        assert_eq!(photo.tags, vec!["sunset", "sky"]);
    }

    #[test]
    fn test_update_merges_only_supplied_fields() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded_store(dir.path());

        let details = PhotoDetails {
            title: Some("Golden Hour".to_string()),
            ..PhotoDetails::default()
        };
        let updated = store.update_photo_details(1, &details).unwrap().unwrap();
        assert_eq!(updated.title, "Golden Hour");
        assert_eq!(updated.filename, "sunset.jpg");
        assert_eq!(updated.description, "Sunset over the bay");
        assert_eq!(updated.date, "2020-07-15");

        // The stored record matches what the update returned.
        let fetched = store.find_photo_by_id(1).unwrap().unwrap();
        assert_eq!(fetched, updated);
    }

    #[test]
    fn test_update_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded_store(dir.path());

        let details = PhotoDetails {
            title: Some("Noon".to_string()),
            description: Some("Dunes at high noon".to_string()),
            ..PhotoDetails::default()
        };
        let first = store.update_photo_details(3, &details).unwrap().unwrap();
        let second = store.update_photo_details(3, &details).unwrap().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_update_absent_id_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded_store(dir.path());

        let details = PhotoDetails {
            title: Some("Ghost".to_string()),
            ..PhotoDetails::default()
        };
        assert!(store.update_photo_details(42, &details).unwrap().is_none());

        // No upsert happened.
        let count: i64 = store
            .with_conn(|conn| {
                conn.query_row("SELECT COUNT(*) FROM photos", [], |row| row.get(0))
                    .map_err(StoreError::from)
            })
            .unwrap();
        assert_eq!(count, 3);
    }

    #[test]
    fn test_corrupt_albums_column_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded_store(dir.path());

        store
            .with_conn(|conn| {
                conn.execute("UPDATE photos SET albums = 'oops' WHERE id = 1", [])
                    .map_err(StoreError::from)
            })
            .unwrap();

        assert!(matches!(
            store.find_photo_by_id(1),
            Err(StoreError::Unreadable(_))
        ));
        // Other records stay readable.
        assert!(store.find_photo_by_id(2).unwrap().is_some());
    }

    #[test]
    fn test_photos_in_album_filters_and_orders_by_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded_store(dir.path());

        let summer: Vec<i64> = store
            .find_photos_by_album(1)
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(summer, vec![1, 3]);

        let travel: Vec<i64> = store
            .find_photos_by_album(2)
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(travel, vec![1, 2]);

        assert!(store.find_photos_by_album(3).unwrap().is_empty());
    }
}
