use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::warn;

use crate::constants::*;
use crate::geo::LatLon;

/// Runtime configuration. Every fixed value the map pipeline depends on
/// lives here rather than inline in the logic.
#[derive(Debug, Clone)]
pub struct Settings {
    /// HTTP port on 127.0.0.1.
    pub port: u16,
    /// Root of the `<year>/<month>/*.tif` prediction tree.
    pub tiles_dir: PathBuf,
    /// JSON country code to MGRS tile list.
    pub tile_index_path: PathBuf,
    /// CSV with `ISO`, `latitude`, `longitude` columns.
    pub country_centers_path: PathBuf,
    /// First selectable year.
    pub min_year: i32,
    /// Last selectable year.
    pub max_year: i32,
    /// Map center when the country has no entry in the center table.
    pub default_center_lat: f64,
    pub default_center_lon: f64,
    /// Zoom used with the fallback center.
    pub default_zoom: u8,
    /// Zoom used when centering on a known country.
    pub country_zoom: u8,
    /// Country for which the breeding region polygon is drawn.
    pub region_country: String,
    /// Hover sessions kept in memory; the least recently active is evicted.
    pub max_sessions: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            tiles_dir: PathBuf::from(DEFAULT_TILES_DIR),
            tile_index_path: PathBuf::from(DEFAULT_TILE_INDEX_PATH),
            country_centers_path: PathBuf::from(DEFAULT_COUNTRY_CENTERS_PATH),
            min_year: DEFAULT_MIN_YEAR,
            max_year: DEFAULT_MAX_YEAR,
            default_center_lat: DEFAULT_CENTER_LAT,
            default_center_lon: DEFAULT_CENTER_LON,
            default_zoom: DEFAULT_ZOOM,
            country_zoom: COUNTRY_ZOOM,
            region_country: DEFAULT_REGION_COUNTRY.to_string(),
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }
}

impl Settings {
    /// Load `key = value` settings. A missing file yields the defaults.
    pub fn load_from<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();
        let mut settings = Settings::default();
        if !config_path.exists() {
            return Ok(settings);
        }

        let file = File::open(config_path)
            .with_context(|| format!("Failed to open config file {}", config_path.display()))?;
        let reader = BufReader::new(file);
        let mut config_map = HashMap::new();

        for line in reader.lines() {
            let line = line.context("Failed to read line from config")?;
            let line = line.trim();
            if line.starts_with('#') || line.is_empty() {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                config_map.insert(
                    key.trim().to_string(),
                    value.trim().trim_matches('"').to_string(),
                );
            }
        }

        for (key, value) in &config_map {
            match key.as_str() {
                "port" => parse_into(key, value, &mut settings.port),
                "tiles_dir" => settings.tiles_dir = PathBuf::from(value),
                "tile_index_path" => settings.tile_index_path = PathBuf::from(value),
                "country_centers_path" => settings.country_centers_path = PathBuf::from(value),
                "min_year" => parse_into(key, value, &mut settings.min_year),
                "max_year" => parse_into(key, value, &mut settings.max_year),
                "default_center_lat" => parse_into(key, value, &mut settings.default_center_lat),
                "default_center_lon" => parse_into(key, value, &mut settings.default_center_lon),
                "default_zoom" => parse_into(key, value, &mut settings.default_zoom),
                "country_zoom" => parse_into(key, value, &mut settings.country_zoom),
                "region_country" => settings.region_country = value.clone(),
                "max_sessions" => parse_into(key, value, &mut settings.max_sessions),
                _ => warn!(key = %key, "Ignoring unknown setting"),
            }
        }

        if settings.min_year > settings.max_year {
            anyhow::bail!(
                "min_year ({}) is after max_year ({})",
                settings.min_year,
                settings.max_year
            );
        }
        if settings.max_sessions == 0 {
            anyhow::bail!("max_sessions must be at least 1");
        }

        Ok(settings)
    }

    pub fn default_center(&self) -> LatLon {
        LatLon::new(self.default_center_lat, self.default_center_lon)
    }

    /// Whether a year lies in the selectable range.
    pub fn year_in_range(&self, year: i32) -> bool {
        (self.min_year..=self.max_year).contains(&year)
    }
}

/// Overwrite `target` with the parsed value, keeping the default on failure.
fn parse_into<T: FromStr>(key: &str, value: &str, target: &mut T) {
    match value.parse::<T>() {
        Ok(parsed) => *target = parsed,
        Err(_) => warn!(key = %key, value = %value, "Unparseable setting, keeping default"),
    }
}
