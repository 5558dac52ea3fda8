use anyhow::Result;
use axum::{
    routing::get,
    Router,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, services::ServeDir, trace::TraceLayer,
};
use tracing::info;

use crate::constants::{BIND_ADDRESS, TILES_URL_PREFIX};

pub mod handlers;
pub mod state;

pub use self::state::AppState;
use handlers::{
    get_base_map, get_hover, get_idle_overlay, get_options, get_overlay, index_html,
    record_hover, script_js, style_css,
};

// Create the main application router
pub fn create_app(state: AppState) -> Router {
    // Raw GeoTIFFs for the browser-side raster renderer
    let tiles = ServeDir::new(&state.settings.tiles_dir);

    Router::new()
        .route("/", get(index_html))
        .route("/style.css", get(style_css))
        .route("/script.js", get(script_js))
        .route("/api/options", get(get_options))
        .route("/api/base-map", get(get_base_map))
        .route("/api/hover", get(get_hover).post(record_hover))
        .route("/api/overlay", get(get_overlay))
        .route("/api/overlay/idle", get(get_idle_overlay))
        .nest_service(TILES_URL_PREFIX, tiles)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(state: AppState) -> Result<()> {
    let port = state.settings.port;
    let app = create_app(state);
    let addr = SocketAddr::from((BIND_ADDRESS, port));
    let listener = TcpListener::bind(addr).await?;

    info!("HTTP server listening at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        // Without a signal handler keep serving until the process is killed
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
