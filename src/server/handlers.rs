use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json, Response},
};
use rust_embed::RustEmbed;
use serde::Deserialize;
use tracing::{error, warn};

use crate::constants::{APP_TITLE, MAX_MONTH, MIN_MONTH};
use crate::error::ServeError;
use crate::map::{build_base_map, MapArtifact};
use crate::pipeline::{generate_overlay, Selection};
use crate::session::HoverState;

use super::state::AppState;

#[derive(RustEmbed)]
#[folder = "frontend/"]
struct Asset;

impl IntoResponse for ServeError {
    fn into_response(self) -> Response {
        let status = match self {
            ServeError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ServeError::NoMatchingTiles { .. } => StatusCode::NOT_FOUND,
        };
        let body = serde_json::json!({
            "status": "error",
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, Json(body)).into_response()
    }
}

// Extractor rejections carry axum's plain-text body; answer with the JSON error shape instead
fn invalid_query(rejection: QueryRejection) -> ServeError {
    ServeError::InvalidInput(rejection.body_text())
}

fn invalid_body(rejection: JsonRejection) -> ServeError {
    ServeError::InvalidInput(rejection.body_text())
}

#[derive(Debug, Deserialize)]
pub struct BaseMapQuery {
    pub country: String,
    pub session: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SessionQuery {
    pub session: String,
}

#[derive(Debug, Deserialize)]
pub struct HoverEvent {
    pub session: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Deserialize)]
pub struct OverlayQuery {
    pub country: String,
    pub year: i32,
    pub month: u32,
}

// API endpoint with the values the selectors offer
pub async fn get_options(State(state): State<AppState>) -> Json<serde_json::Value> {
    let settings = &state.settings;
    Json(serde_json::json!({
        "title": APP_TITLE,
        "countries": state.tile_index.countries().collect::<Vec<_>>(),
        "years": { "min": settings.min_year, "max": settings.max_year },
        "months": { "min": MIN_MONTH, "max": MAX_MONTH },
        "region_country": settings.region_country,
    }))
}

// Country-centered base map with the session's hover position
pub async fn get_base_map(
    State(state): State<AppState>,
    query: Result<Query<BaseMapQuery>, QueryRejection>,
) -> Result<Json<MapArtifact>, ServeError> {
    let Query(query) = query.map_err(invalid_query)?;
    let hover = query
        .session
        .as_deref()
        .map(|session| state.sessions.hover(session))
        .unwrap_or_default();

    Ok(Json(build_base_map(
        &query.country,
        &state.centers,
        &state.map_defaults,
        &hover,
    )))
}

pub async fn get_hover(
    State(state): State<AppState>,
    query: Result<Query<SessionQuery>, QueryRejection>,
) -> Result<Json<HoverState>, ServeError> {
    let Query(query) = query.map_err(invalid_query)?;
    Ok(Json(state.sessions.hover(&query.session)))
}

// Hover events from the base map; the newest position replaces the previous one
pub async fn record_hover(
    State(state): State<AppState>,
    event: Result<Json<HoverEvent>, JsonRejection>,
) -> Result<Json<HoverState>, ServeError> {
    let Json(event) = event.map_err(invalid_body)?;
    if event.session.trim().is_empty() {
        return Err(ServeError::InvalidInput("Missing session id".to_string()));
    }
    if !(-90.0..=90.0).contains(&event.lat) || !(-180.0..=180.0).contains(&event.lon) {
        return Err(ServeError::InvalidInput(format!(
            "Coordinates ({}, {}) are out of range",
            event.lat, event.lon
        )));
    }

    Ok(Json(state.sessions.record_hover(&event.session, event.lat, event.lon)))
}

// "Generate map": resolve the country's tiles and compose the overlay
pub async fn get_overlay(
    State(state): State<AppState>,
    query: Result<Query<OverlayQuery>, QueryRejection>,
) -> Result<Json<MapArtifact>, Response> {
    let Query(query) = query.map_err(|rejection| {
        let e = invalid_query(rejection);
        warn!(kind = e.kind(), error = %e, "Rejected overlay query");
        e.into_response()
    })?;
    let selection = Selection {
        country: query.country,
        year: query.year,
        month: query.month,
    };

    let result = tokio::task::spawn_blocking(move || {
        generate_overlay(&selection, &state.settings, &state.tile_index, &state.composer)
    })
    .await
    .map_err(|e| {
        error!(error = %e, "Overlay task failed");
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    })?;

    match result {
        Ok(artifact) => Ok(Json(artifact)),
        Err(e) => {
            warn!(kind = e.kind(), error = %e, "Map generation failed");
            Err(e.into_response())
        }
    }
}

// Map shown before generation and after a failure
pub async fn get_idle_overlay(State(state): State<AppState>) -> Json<MapArtifact> {
    Json(state.composer.compose(&[], ""))
}

pub async fn index_html() -> Result<Html<String>, StatusCode> {
    let content = Asset::get("index.html").ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;
    let html = String::from_utf8_lossy(&content.data).replace("<!-- APP_TITLE -->", APP_TITLE);
    Ok(Html(html))
}

pub async fn style_css() -> Result<Response, StatusCode> {
    embedded_asset("style.css", "text/css")
}

pub async fn script_js() -> Result<Response, StatusCode> {
    embedded_asset("script.js", "application/javascript")
}

fn embedded_asset(name: &str, content_type: &'static str) -> Result<Response, StatusCode> {
    let content = Asset::get(name).ok_or(StatusCode::NOT_FOUND)?;
    Ok((
        [(header::CONTENT_TYPE, content_type)],
        content.data.into_owned(),
    )
        .into_response())
}
