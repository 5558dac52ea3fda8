use std::sync::Arc;

use crate::centers::CountryCenters;
use crate::map::{MapComposer, MapDefaults};
use crate::session::SessionStore;
use crate::settings::Settings;
use crate::tile_index::TileIndex;

// Application state shared by all handlers. Only `sessions` is mutable.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub tile_index: Arc<TileIndex>,
    pub centers: Arc<CountryCenters>,
    pub map_defaults: Arc<MapDefaults>,
    pub composer: Arc<MapComposer>,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(settings: Settings, tile_index: TileIndex, centers: CountryCenters) -> Self {
        let centers = Arc::new(centers);
        let map_defaults = MapDefaults::from(&settings);
        let composer = MapComposer::new(
            settings.tiles_dir.clone(),
            Arc::clone(&centers),
            map_defaults.clone(),
        );
        let sessions = SessionStore::new(settings.max_sessions);

        Self {
            settings: Arc::new(settings),
            tile_index: Arc::new(tile_index),
            centers,
            map_defaults: Arc::new(map_defaults),
            composer: Arc::new(composer),
            sessions,
        }
    }
}
