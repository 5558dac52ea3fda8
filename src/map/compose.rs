use super::{GeoReference, MapArtifact, MapDefaults, TileLayer};
use crate::centers::CountryCenters;
use crate::constants::TILES_URL_PREFIX;
use crate::tile_name::TileNameConvention;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Turns a list of resolved tile files into an overlay map.
#[derive(Debug, Clone)]
pub struct MapComposer {
    tiles_dir: PathBuf,
    centers: Arc<CountryCenters>,
    defaults: MapDefaults,
    convention: TileNameConvention,
}

impl MapComposer {
    pub fn new(tiles_dir: PathBuf, centers: Arc<CountryCenters>, defaults: MapDefaults) -> Self {
        Self {
            tiles_dir,
            centers,
            defaults,
            convention: TileNameConvention::default(),
        }
    }

    /// Compose an overlay map from tile files.
    ///
    /// An empty list gives the idle map: default framing, no layers.
    /// Layers keep the order of `tile_paths`. A file whose georeferencing
    /// cannot be read still gets a layer, without `georef`.
    pub fn compose(&self, tile_paths: &[PathBuf], region_label: &str) -> MapArtifact {
        let mut artifact = MapArtifact::new(self.defaults.center, self.defaults.default_zoom);
        if tile_paths.is_empty() {
            return artifact;
        }

        if !region_label.is_empty() {
            artifact.title = Some(region_label.to_string());
        }
        if let Some(center) = self.centers.center_for(region_label) {
            artifact.center = center;
            artifact.zoom = self.defaults.country_zoom;
        }

        artifact.tiles = tile_paths
            .par_iter()
            .map(|path| self.tile_layer(path))
            .collect();

        // Fit only when every layer is in plain lon/lat; projected bounds are
        // left to the browser-side renderer
        let georefs: Vec<&GeoReference> =
            artifact.tiles.iter().filter_map(|t| t.georef.as_ref()).collect();
        if !georefs.is_empty() && georefs.iter().all(|g| g.is_geographic()) {
            let bounds = georefs
                .iter()
                .skip(1)
                .fold(georefs[0].bounds, |acc, g| acc.union(&g.bounds));
            artifact.center = bounds.center();
            artifact.fit_bounds = Some(bounds);
        }

        debug!(
            region = region_label,
            layers = artifact.tiles.len(),
            georeferenced = georefs.len(),
            "Composed overlay map"
        );
        artifact
    }

    fn tile_layer(&self, path: &Path) -> TileLayer {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let georef = match GeoReference::from_file(path) {
            Ok(georef) => Some(georef),
            Err(e) => {
                warn!(file = %path.display(), error = %e, "Could not read georeferencing");
                None
            }
        };

        TileLayer {
            tile_id: self.convention.tile_id(&name).ok().map(str::to_string),
            url: self.tile_url(path),
            name,
            georef,
        }
    }

    /// URL of a file below the tiles directory.
    fn tile_url(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.tiles_dir).ok()?;
        let mut url = TILES_URL_PREFIX.to_string();
        for component in relative.components() {
            url.push('/');
            url.push_str(component.as_os_str().to_str()?);
        }
        Some(url)
    }
}
