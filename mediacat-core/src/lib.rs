//! Catalog core library shared by the web and console front ends.

pub mod catalog;
pub mod error;
pub mod settings;
pub mod store;

pub use catalog::Catalog;
pub use error::StoreError;
pub use settings::Settings;
pub use store::{Album, Photo, PhotoDetails, Store};
