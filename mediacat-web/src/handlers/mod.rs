//! Request handlers and shared page-rendering plumbing.

mod albums;
mod photos;

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use chrono::NaiveDate;
use log::error;
use mediacat_core::{Catalog, Settings};
use std::collections::HashMap;
use std::sync::Arc;
use tera::{Context as TeraContext, Tera, Value};
use tower_http::services::ServeDir;

pub struct AppState {
    pub catalog: Catalog,
    pub templates: Tera,
}

pub fn router(state: Arc<AppState>, settings: &Settings) -> Router {
    Router::new()
        .route("/", get(albums::index))
        .route("/album/{album_id}", get(albums::album_details))
        .route("/photo-details/{photo_id}", get(photos::photo_details))
        .route(
            "/edit-photo",
            get(photos::edit_photo_form).post(photos::edit_photo_submit),
        )
        .nest_service("/photos", ServeDir::new(&settings.photos_dir))
        .fallback_service(ServeDir::new(&settings.public_dir))
        .with_state(state)
}

pub fn load_templates(views_dir: &str) -> Result<Tera, String> {
    let glob = format!("{views_dir}/**/*.html");
    let mut tera = Tera::new(&glob)
        .map_err(|e| format!("failed to load templates from {views_dir}: {e}"))?;
    tera.register_filter("display_date", display_date);
    Ok(tera)
}

/// Format an ISO date like `2020-07-15` as `July 15, 2020`. Anything
/// that does not parse passes through untouched.
fn display_date(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    let raw = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("display_date expects a string"))?;
    let formatted = match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => date.format("%B %-d, %Y").to_string(),
        Err(_) => raw.to_string(),
    };
    Ok(Value::String(formatted))
}

fn render(
    state: &AppState,
    template: &str,
    ctx: &TeraContext,
    failure_message: &'static str,
) -> Response {
    match state.templates.render(template, ctx) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!("failed to render {template}: {e}");
            server_error(failure_message)
        }
    }
}

fn not_found(message: &'static str) -> Response {
    (StatusCode::NOT_FOUND, message).into_response()
}

fn server_error(message: &'static str) -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
}
