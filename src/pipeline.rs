//! One "generate map" interaction: validate the selection, resolve the
//! country's tiles for the period and compose the overlay map.

use crate::constants::{MAX_MONTH, MIN_MONTH};
use crate::error::ServeError;
use crate::map::{MapArtifact, MapComposer};
use crate::resolver;
use crate::settings::Settings;
use crate::tile_index::TileIndex;
use tracing::info;

/// A user's country and period selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Country code, a key of the tile index.
    pub country: String,
    /// Four-digit year, within the configured range.
    pub year: i32,
    /// Month number, 1 to 12, not zero-padded on disk.
    pub month: u32,
}

/// Resolve and compose the overlay map for a selection.
///
/// Blocks on directory enumeration and file headers.
pub fn generate_overlay(
    selection: &Selection,
    settings: &Settings,
    tile_index: &TileIndex,
    composer: &MapComposer,
) -> Result<MapArtifact, ServeError> {
    if !settings.year_in_range(selection.year) {
        return Err(ServeError::InvalidInput(format!(
            "Year {} is outside {}-{}",
            selection.year, settings.min_year, settings.max_year
        )));
    }
    if !(MIN_MONTH..=MAX_MONTH).contains(&selection.month) {
        return Err(ServeError::InvalidInput(format!(
            "Month {} is outside {}-{}",
            selection.month, MIN_MONTH, MAX_MONTH
        )));
    }
    let country_tiles = tile_index.tiles_for(&selection.country).ok_or_else(|| {
        ServeError::InvalidInput(format!("Unknown country code '{}'", selection.country))
    })?;

    let tile_paths = resolver::resolve(
        &settings.tiles_dir,
        selection.year,
        selection.month,
        country_tiles,
    )?;

    info!(
        country = %selection.country,
        year = selection.year,
        month = selection.month,
        tiles = tile_paths.len(),
        "Generating overlay map"
    );

    Ok(composer.compose(&tile_paths, &selection.country))
}
