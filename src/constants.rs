// Port configuration
pub const DEFAULT_PORT: u16 = 3001;
pub const BIND_ADDRESS: [u8; 4] = [127, 0, 0, 1];

// Data locations, relative to the working directory
pub const DEFAULT_SETTINGS_FILE: &str = "instageo.ini";
pub const DEFAULT_TILES_DIR: &str = "predictions";
pub const DEFAULT_TILE_INDEX_PATH: &str = "utils/country_code_to_mgrs_tiles.json";
pub const DEFAULT_COUNTRY_CENTERS_PATH: &str = "countries.csv";

// Selectable period
pub const DEFAULT_MIN_YEAR: i32 = 2016;
pub const DEFAULT_MAX_YEAR: i32 = 2017;
pub const MIN_MONTH: u32 = 1;
pub const MAX_MONTH: u32 = 12;

// Hover sessions kept before the least recently active one is dropped
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

// Map framing. The fallback center sits over Iran.
pub const DEFAULT_CENTER_LAT: f64 = 32.4279;
pub const DEFAULT_CENTER_LON: f64 = 53.6880;
pub const DEFAULT_ZOOM: u8 = 2;
pub const COUNTRY_ZOOM: u8 = 5;
pub const BASE_MAP_STYLE: &str = "open-street-map";

// Region of interest drawn for a single country
pub const DEFAULT_REGION_COUNTRY: &str = "IR";
pub const BREEDING_REGION_NAME: &str = "Breeding Region";
pub const BREEDING_REGION_VERTICES: [(f64, f64); 4] =
    [(32.5, 53.5), (33.0, 53.5), (33.0, 54.0), (32.5, 54.0)];
pub const BREEDING_REGION_FILL: &str = "rgba(255, 0, 0, 0.3)";
pub const BREEDING_REGION_STROKE: &str = "red";

// URL prefix the raw GeoTIFFs are served under
pub const TILES_URL_PREFIX: &str = "/tiles";

pub const APP_TITLE: &str = "Desert Locus Potential Breeding Locations";
