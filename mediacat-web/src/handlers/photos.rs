use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use log::error;
use mediacat_core::PhotoDetails;
use serde::Deserialize;
use std::sync::Arc;
use tera::Context as TeraContext;

use super::{not_found, render, server_error, AppState};

pub(crate) async fn photo_details(
    State(state): State<Arc<AppState>>,
    Path(photo_id): Path<String>,
) -> Response {
    let Ok(photo_id) = photo_id.parse::<i64>() else {
        return not_found("Error: Invalid Photo ID.");
    };

    let photo = match state.catalog.find_photo_by_id(photo_id) {
        Ok(Some(photo)) => photo,
        Ok(None) => return not_found("Photo not found."),
        Err(e) => {
            error!("failed to load photo {photo_id}: {e}");
            return server_error("An error occurred while loading the photo details.");
        }
    };

    let mut ctx = TeraContext::new();
    ctx.insert("photo", &photo);
    render(
        &state,
        "photo-details.html",
        &ctx,
        "An error occurred while loading the photo details.",
    )
}

#[derive(Deserialize)]
pub(crate) struct EditPhotoQuery {
    #[serde(default)]
    pid: String,
}

pub(crate) async fn edit_photo_form(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EditPhotoQuery>,
) -> Response {
    let Ok(photo_id) = query.pid.parse::<i64>() else {
        return not_found("Error: Invalid Photo ID.");
    };
    render_edit_page(&state, Some(photo_id), None)
}

#[derive(Deserialize)]
pub(crate) struct EditPhotoForm {
    #[serde(rename = "photoId", default)]
    photo_id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
}

pub(crate) async fn edit_photo_submit(
    State(state): State<Arc<AppState>>,
    Form(form): Form<EditPhotoForm>,
) -> Response {
    // An unparsable id falls through to the edit-page lookup, which
    // reports the photo as not found.
    let photo_id = form.photo_id.parse::<i64>().ok();

    if form.title.is_empty() || form.description.is_empty() {
        return render_edit_page(
            &state,
            photo_id,
            Some("Update failed: Title and Description are required."),
        );
    }

    let Some(photo_id) = photo_id else {
        return render_edit_page(
            &state,
            None,
            Some("Update failed. The photo ID could not be found or updated."),
        );
    };

    let details = PhotoDetails {
        title: Some(form.title),
        description: Some(form.description),
        ..PhotoDetails::default()
    };
    match state.catalog.update_photo_details(photo_id, &details) {
        Ok(Some(_)) => Redirect::to(&format!("/photo-details/{photo_id}")).into_response(),
        Ok(None) => render_edit_page(
            &state,
            Some(photo_id),
            Some("Update failed. The photo ID could not be found or updated."),
        ),
        Err(e) => {
            error!("failed to update photo {photo_id}: {e}");
            render_edit_page(
                &state,
                Some(photo_id),
                Some("A system error occurred during the update."),
            )
        }
    }
}

/// Render the edit form for both the first display and the failed-submit
/// re-render. The current record is always re-fetched so the form shows
/// stored values, not submitted ones.
fn render_edit_page(
    state: &AppState,
    photo_id: Option<i64>,
    error_message: Option<&str>,
) -> Response {
    let photo = match photo_id.map_or(Ok(None), |id| state.catalog.find_photo_by_id(id)) {
        Ok(Some(photo)) => photo,
        Ok(None) => return not_found("Photo not found."),
        Err(e) => {
            error!("failed to load photo for editing: {e}");
            return server_error("A server error occurred.");
        }
    };

    let mut ctx = TeraContext::new();
    ctx.insert("photo", &photo);
    ctx.insert("error_message", &error_message);
    render(state, "edit-photo.html", &ctx, "A server error occurred.")
}
