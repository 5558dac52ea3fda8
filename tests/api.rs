//! HTTP integration tests driving the router in-process.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use instageo_serve::centers::CountryCenters;
use instageo_serve::geo::LatLon;
use instageo_serve::server::{create_app, AppState};
use instageo_serve::settings::Settings;
use instageo_serve::tile_index::TileIndex;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;
use tower::ServiceExt;

fn app() -> (TempDir, Router) {
    let dir = tempfile::tempdir().unwrap();
    let period = dir.path().join("2016").join("3");
    fs::create_dir_all(&period).unwrap();
    fs::write(period.join("A_B_C_D_T34NGL_E.tif"), b"raster bytes").unwrap();
    fs::write(period.join("A_B_C_D_T39RUP_E.tif"), b"raster bytes").unwrap();

    let settings = Settings {
        tiles_dir: dir.path().to_path_buf(),
        ..Settings::default()
    };
    let index = TileIndex::from_json(r#"{"IR": ["39RUP"], "SS": ["34NGL"], "EG": ["35NGL"]}"#)
        .unwrap();
    let centers = CountryCenters::from_entries([("SS", LatLon::new(7.86, 29.69))]);

    (dir, create_app(AppState::new(settings, index, centers)))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let (status, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}

async fn post_hover(app: &Router, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/hover")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let (status, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_options() {
    let (_dir, app) = app();
    let (status, body) = get_json(&app, "/api/options").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["countries"], serde_json::json!(["EG", "IR", "SS"]));
    assert_eq!(body["years"]["min"], 2016);
    assert_eq!(body["years"]["max"], 2017);
    assert_eq!(body["months"]["max"], 12);
}

#[tokio::test]
async fn test_overlay_for_country() {
    let (_dir, app) = app();
    let (status, body) = get_json(&app, "/api/overlay?country=SS&year=2016&month=3").await;
    assert_eq!(status, StatusCode::OK);

    let tiles = body["tiles"].as_array().unwrap();
    assert_eq!(tiles.len(), 1);
    assert_eq!(tiles[0]["tile_id"], "34NGL");
    assert_eq!(tiles[0]["url"], "/tiles/2016/3/A_B_C_D_T34NGL_E.tif");
    assert_eq!(body["center"]["lat"], 7.86);
    assert_eq!(body["zoom"], 5);
}

#[tokio::test]
async fn test_overlay_without_matching_tiles() {
    let (_dir, app) = app();
    let (status, body) = get_json(&app, "/api/overlay?country=EG&year=2016&month=3").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");
    assert_eq!(body["kind"], "no_matching_tiles");
    assert!(body["message"].as_str().unwrap().contains("No GeoTIFF files found"));
}

#[tokio::test]
async fn test_overlay_invalid_input() {
    let (_dir, app) = app();
    for uri in [
        "/api/overlay?country=SS&year=2017&month=3",
        "/api/overlay?country=SS&year=2016&month=13",
        "/api/overlay?country=FR&year=2016&month=3",
    ] {
        let (status, body) = get_json(&app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["kind"], "invalid_input", "{uri}");
    }
}

#[tokio::test]
async fn test_malformed_queries_answer_with_json_errors() {
    let (_dir, app) = app();
    for uri in [
        "/api/overlay?country=SS&year=2016&month=-1",
        "/api/overlay?country=SS&year=abc&month=3",
        "/api/overlay?year=2016&month=3",
        "/api/base-map",
        "/api/hover",
    ] {
        let (status, body) = get_json(&app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["status"], "error", "{uri}");
        assert_eq!(body["kind"], "invalid_input", "{uri}");
        assert!(!body["message"].as_str().unwrap().is_empty(), "{uri}");
    }
}

#[tokio::test]
async fn test_malformed_hover_body_answers_with_json_error() {
    let (_dir, app) = app();
    let request = Request::builder()
        .method("POST")
        .uri("/api/hover")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"session": "s1", "lat": "north"}"#))
        .unwrap();
    let (status, body) = send(&app, request).await;
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "invalid_input");
}

#[tokio::test]
async fn test_idle_overlay() {
    let (_dir, app) = app();
    let (status, body) = get_json(&app, "/api/overlay/idle").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["tiles"].as_array().unwrap().is_empty());
    assert_eq!(body["zoom"], 2);
}

#[tokio::test]
async fn test_base_map_region_and_fallback() {
    let (_dir, app) = app();

    let (_, iran) = get_json(&app, "/api/base-map?country=IR").await;
    assert_eq!(iran["regions"].as_array().unwrap().len(), 1);
    assert_eq!(iran["regions"][0]["vertices"].as_array().unwrap().len(), 4);
    assert_eq!(iran["center"]["lat"], 32.4279);
    assert_eq!(iran["center"]["lon"], 53.688);
    assert_eq!(iran["zoom"], 2);

    let (_, sudan) = get_json(&app, "/api/base-map?country=SS").await;
    assert!(sudan["regions"].as_array().unwrap().is_empty());
    assert_eq!(sudan["zoom"], 5);
}

#[tokio::test]
async fn test_hover_round_trip() {
    let (_dir, app) = app();

    let (_, before) = get_json(&app, "/api/hover?session=s1").await;
    assert!(before["last"].is_null());

    let (status, _) = post_hover(&app, serde_json::json!({"session": "s1", "lat": 10.0, "lon": 20.0})).await;
    assert_eq!(status, StatusCode::OK);
    let (_, state) = post_hover(&app, serde_json::json!({"session": "s1", "lat": 11.0, "lon": 21.0})).await;
    assert_eq!(state["last"]["lat"], 11.0);

    let (_, map) = get_json(&app, "/api/base-map?country=IR&session=s1").await;
    assert_eq!(map["hover"]["lat"], 11.0);
    assert_eq!(map["hover"]["lon"], 21.0);

    let (_, other) = get_json(&app, "/api/hover?session=s2").await;
    assert!(other["last"].is_null());
}

#[tokio::test]
async fn test_hover_rejects_bad_coordinates() {
    let (_dir, app) = app();
    let (status, body) =
        post_hover(&app, serde_json::json!({"session": "s1", "lat": 95.0, "lon": 20.0})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "invalid_input");
}

#[tokio::test]
async fn test_serves_tiles_and_page() {
    let (_dir, app) = app();

    let request = Request::builder()
        .uri("/tiles/2016/3/A_B_C_D_T34NGL_E.tif")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"raster bytes");

    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(body)
        .unwrap()
        .contains("Desert Locus Potential Breeding Locations"));
}
