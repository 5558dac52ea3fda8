//! # instageo_serve
//!
//! Interactive map of GeoTIFF prediction tiles per country and month.
//!
//! Predictions live on disk as `<tiles_dir>/<year>/<month>/*.tif`, one file
//! per MGRS tile, the tile code embedded in the file name. A JSON index maps
//! each country code to the tiles covering it. Selecting a country and a
//! period resolves the matching files and composes a map overlaying them.
//!
//! ```no_run
//! use instageo_serve::{resolver, tile_index::TileIndex};
//!
//! let index = TileIndex::load("utils/country_code_to_mgrs_tiles.json")?;
//! if let Some(tiles) = index.tiles_for("IR") {
//!     let paths = resolver::resolve("predictions", 2016, 3, tiles)?;
//!     println!("{} tiles", paths.len());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod centers;
pub mod constants;
pub mod error;
pub mod geo;
pub mod map;
pub mod pipeline;
pub mod resolver;
pub mod server;
pub mod session;
pub mod settings;
pub mod tile_index;
pub mod tile_name;

pub use error::{DataError, ServeError};
