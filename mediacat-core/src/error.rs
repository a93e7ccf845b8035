use thiserror::Error;

/// Failures surfaced by the catalog store.
///
/// `Unavailable` and `Unreadable` are deliberately separate conditions:
/// the first means the backing database could not be opened or held, the
/// second means backing data exists but cannot be parsed. Callers above
/// the store decide how much of the distinction to expose.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be opened or the handle is gone.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Backing data exists but is not parseable (malformed seed file,
    /// corrupt document column).
    #[error("data unreadable: {0}")]
    Unreadable(String),

    /// A query against the live store failed.
    #[error("store query failed: {0}")]
    Sql(#[from] rusqlite::Error),
}
