use axum::extract::{Path, State};
use axum::response::Response;
use log::error;
use std::sync::Arc;
use tera::Context as TeraContext;

use super::{not_found, render, server_error, AppState};

pub(crate) async fn index(State(state): State<Arc<AppState>>) -> Response {
    let albums = match state.catalog.find_all_albums() {
        Ok(albums) => albums,
        Err(e) => {
            error!("failed to load the album list: {e}");
            return server_error("An error occurred while loading the album catalog.");
        }
    };

    let mut ctx = TeraContext::new();
    ctx.insert("title", "Digital Media Catalog");
    ctx.insert("albums", &albums);
    render(
        &state,
        "index.html",
        &ctx,
        "An error occurred while loading the album catalog.",
    )
}

pub(crate) async fn album_details(
    State(state): State<Arc<AppState>>,
    Path(album_id): Path<String>,
) -> Response {
    let Ok(album_id) = album_id.parse::<i64>() else {
        return not_found("Error: Invalid Album ID.");
    };

    let album = match state.catalog.find_album_by_id(album_id) {
        Ok(Some(album)) => album,
        Ok(None) => return not_found("Album not found."),
        Err(e) => {
            error!("failed to load album {album_id}: {e}");
            return server_error("An error occurred while loading the album details.");
        }
    };

    let photo_count = album.photos.as_ref().map_or(0, Vec::len);
    let mut ctx = TeraContext::new();
    ctx.insert("album", &album);
    ctx.insert("photo_count", &photo_count);
    ctx.insert(
        "photo_label",
        if photo_count == 1 { "photo" } else { "photos" },
    );
    render(
        &state,
        "album-details.html",
        &ctx,
        "An error occurred while loading the album details.",
    )
}
