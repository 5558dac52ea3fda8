//! Error types for tile resolution and data loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while serving a single user interaction.
///
/// Both kinds are recoverable: the HTTP layer turns them into a message for
/// the user and the page falls back to the idle map.
#[derive(Debug, Error)]
pub enum ServeError {
    /// A directory, filename, or request parameter did not meet its contract.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The period directory exists but none of its files belong to the country.
    #[error("No GeoTIFF files found for year {year}, month {month} and the selected country")]
    NoMatchingTiles {
        /// Requested year.
        year: i32,
        /// Requested month.
        month: u32,
    },
}

impl ServeError {
    /// Stable machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ServeError::InvalidInput(_) => "invalid_input",
            ServeError::NoMatchingTiles { .. } => "no_matching_tiles",
        }
    }
}

impl From<crate::tile_name::FilenameError> for ServeError {
    fn from(err: crate::tile_name::FilenameError) -> Self {
        ServeError::InvalidInput(err.to_string())
    }
}

/// Errors loading the startup data files. These abort startup.
#[derive(Debug, Error)]
pub enum DataError {
    /// I/O error reading a data file.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The tile index is not a JSON object of string arrays.
    #[error("Malformed tile index {path}: {source}")]
    Json {
        /// File that failed to parse.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },

    /// The country-center table could not be parsed.
    #[error("Malformed country-center table {path}: {source}")]
    Csv {
        /// File that failed to parse.
        path: PathBuf,
        /// Underlying error.
        source: csv::Error,
    },
}
