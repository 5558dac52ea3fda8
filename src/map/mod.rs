//! Map artifacts handed to the browser, and the builders producing them.
//!
//! A [`MapArtifact`] is a plain description of a Leaflet view: where to
//! center, which base style, which polygons and which GeoTIFF layers to
//! draw. The browser renders it; nothing here touches pixels.

mod base;
mod compose;
mod geotiff;

pub use base::build_base_map;
pub use compose::MapComposer;
pub use geotiff::{GeoReference, GeoTiffError};

use crate::constants::*;
use crate::geo::{GeoBounds, LatLon};
use crate::session::HoverPoint;
use crate::settings::Settings;
use serde::Serialize;

/// A renderable map description.
#[derive(Debug, Clone, Serialize)]
pub struct MapArtifact {
    /// Heading shown above the map, if any.
    pub title: Option<String>,
    /// Base layer style.
    pub style: String,
    pub center: LatLon,
    pub zoom: u8,
    /// Bounds the view should fit once layers are drawn.
    pub fit_bounds: Option<GeoBounds>,
    pub regions: Vec<RegionOverlay>,
    pub tiles: Vec<TileLayer>,
    /// Last hover position of the requesting session.
    pub hover: Option<HoverPoint>,
}

impl MapArtifact {
    fn new(center: LatLon, zoom: u8) -> Self {
        Self {
            title: None,
            style: BASE_MAP_STYLE.to_string(),
            center,
            zoom,
            fit_bounds: None,
            regions: Vec::new(),
            tiles: Vec::new(),
            hover: None,
        }
    }
}

/// A named polygon drawn with a semi-transparent fill.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionOverlay {
    pub name: String,
    /// Ring vertices, not repeated at the end.
    pub vertices: Vec<LatLon>,
    pub fill_color: String,
    pub stroke_color: String,
}

impl RegionOverlay {
    /// The fixed desert locus breeding region.
    pub fn breeding_region() -> Self {
        Self {
            name: BREEDING_REGION_NAME.to_string(),
            vertices: BREEDING_REGION_VERTICES
                .iter()
                .map(|&(lat, lon)| LatLon::new(lat, lon))
                .collect(),
            fill_color: BREEDING_REGION_FILL.to_string(),
            stroke_color: BREEDING_REGION_STROKE.to_string(),
        }
    }
}

/// One GeoTIFF overlay.
#[derive(Debug, Clone, Serialize)]
pub struct TileLayer {
    /// File name of the raster.
    pub name: String,
    /// Tile identifier embedded in the file name.
    pub tile_id: Option<String>,
    /// Where the browser fetches the raster from.
    pub url: Option<String>,
    /// Georeferencing read from the file, when readable.
    pub georef: Option<GeoReference>,
}

/// Fixed framing values shared by the map builders.
#[derive(Debug, Clone, PartialEq)]
pub struct MapDefaults {
    /// Center used when a country has no known center.
    pub center: LatLon,
    /// Zoom used with `center`.
    pub default_zoom: u8,
    /// Zoom used when centering on a country.
    pub country_zoom: u8,
    /// Country that gets the breeding region overlay.
    pub region_country: String,
}

impl Default for MapDefaults {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

impl From<&Settings> for MapDefaults {
    fn from(settings: &Settings) -> Self {
        Self {
            center: settings.default_center(),
            default_zoom: settings.default_zoom,
            country_zoom: settings.country_zoom,
            region_country: settings.region_country.clone(),
        }
    }
}
