use crate::error::StoreError;
use crate::store::{Album, Photo, PhotoDetails, Store};

/// Business layer between the front ends and the store. Deliberately
/// thin: every front-end call passes through here so rules have one
/// place to live, and the only rule today is the existence check before
/// an update.
#[derive(Clone)]
pub struct Catalog {
    store: Store,
}

impl Catalog {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn find_photo_by_id(&self, id: i64) -> Result<Option<Photo>, StoreError> {
        self.store.find_photo_by_id(id)
    }

    /// Confirm the photo exists, then apply the update. Two store calls;
    /// a writer that removes the photo between them makes the update
    /// report `None` rather than fail.
    pub fn update_photo_details(
        &self,
        id: i64,
        details: &PhotoDetails,
    ) -> Result<Option<Photo>, StoreError> {
        if self.store.find_photo_by_id(id)?.is_none() {
            return Ok(None);
        }
        self.store.update_photo_details(id, details)
    }

    pub fn find_album_by_name(&self, name: &str) -> Result<Option<Album>, StoreError> {
        self.store.find_album_by_name(name)
    }

    pub fn find_album_by_id(&self, id: i64) -> Result<Option<Album>, StoreError> {
        self.store.find_album_by_id(id)
    }

    pub fn find_all_albums(&self) -> Result<Vec<Album>, StoreError> {
        self.store.find_all_albums()
    }
}
