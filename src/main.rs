use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use instageo_serve::centers::CountryCenters;
use instageo_serve::constants::DEFAULT_SETTINGS_FILE;
use instageo_serve::server::{start_server, AppState};
use instageo_serve::settings::Settings;
use instageo_serve::tile_index::TileIndex;

/// Serve an interactive map of GeoTIFF prediction tiles per country and month.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Settings file (`key = value` lines).
    #[arg(long, default_value = DEFAULT_SETTINGS_FILE)]
    config: PathBuf,

    /// HTTP port, overrides the settings file.
    #[arg(long)]
    port: Option<u16>,

    /// Root of the `<year>/<month>/*.tif` prediction tree.
    #[arg(long)]
    tiles_dir: Option<PathBuf>,

    /// Country code to MGRS tile JSON index.
    #[arg(long)]
    tile_index: Option<PathBuf>,

    /// Country center CSV (`ISO`, `latitude`, `longitude`).
    #[arg(long)]
    country_centers: Option<PathBuf>,
}

impl Args {
    fn apply(self, settings: &mut Settings) {
        if let Some(port) = self.port {
            settings.port = port;
        }
        if let Some(dir) = self.tiles_dir {
            settings.tiles_dir = dir;
        }
        if let Some(path) = self.tile_index {
            settings.tile_index_path = path;
        }
        if let Some(path) = self.country_centers {
            settings.country_centers_path = path;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("instageo_serve=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();
    let mut settings = Settings::load_from(&args.config)
        .with_context(|| format!("Failed to load settings from {}", args.config.display()))?;
    args.apply(&mut settings);

    // The country list comes from these files; without them there is nothing to serve
    let tile_index = TileIndex::load(&settings.tile_index_path)
        .context("Failed to load the country tile index")?;
    info!(
        countries = tile_index.country_count(),
        tiles = tile_index.tile_count(),
        "Loaded tile index from {}",
        settings.tile_index_path.display()
    );

    let centers = CountryCenters::load(&settings.country_centers_path)
        .context("Failed to load country centers")?;
    info!(
        countries = centers.len(),
        "Loaded country centers from {}",
        settings.country_centers_path.display()
    );

    if !settings.tiles_dir.is_dir() {
        warn!(
            "Tile directory {} does not exist; map generation will fail until it does",
            settings.tiles_dir.display()
        );
    }

    start_server(AppState::new(settings, tile_index, centers)).await
}
