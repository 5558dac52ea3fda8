//! Country code to MGRS tile index.

use crate::error::DataError;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Tile identifiers per country, loaded once at startup.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct TileIndex {
    countries: BTreeMap<String, BTreeSet<String>>,
}

impl TileIndex {
    /// Load the index from a JSON object of `"CC": ["tile", ...]` entries.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DataError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content).map_err(|source| DataError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Country codes in sorted order.
    pub fn countries(&self) -> impl Iterator<Item = &str> {
        self.countries.keys().map(String::as_str)
    }

    pub fn tiles_for(&self, country: &str) -> Option<&BTreeSet<String>> {
        self.countries.get(country)
    }

    pub fn country_count(&self) -> usize {
        self.countries.len()
    }

    pub fn tile_count(&self) -> usize {
        self.countries.values().map(BTreeSet::len).sum()
    }
}
