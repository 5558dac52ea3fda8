//! Country center lookup loaded from `countries.csv`.

use crate::error::DataError;
use crate::geo::LatLon;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// One row of the country table. Other columns are ignored.
#[derive(Debug, Deserialize)]
struct CountryRow {
    #[serde(rename = "ISO")]
    iso: String,
    latitude: f64,
    longitude: f64,
}

/// Country code to map center.
#[derive(Debug, Clone, Default)]
pub struct CountryCenters {
    centers: HashMap<String, LatLon>,
}

impl CountryCenters {
    /// Load centers from a CSV file with `ISO`, `latitude` and `longitude` columns.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DataError> {
        let path = path.as_ref();
        let csv_error = |source| DataError::Csv {
            path: path.to_path_buf(),
            source,
        };

        if !path.is_file() {
            return Err(DataError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
            });
        }

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(csv_error)?;

        let mut centers = HashMap::new();
        for result in reader.deserialize() {
            let row: CountryRow = result.map_err(csv_error)?;
            // First row wins, like a table lookup taking the first match
            centers
                .entry(row.iso)
                .or_insert(LatLon::new(row.latitude, row.longitude));
        }

        Ok(Self { centers })
    }

    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, LatLon)>,
        S: Into<String>,
    {
        Self {
            centers: entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn center_for(&self, country: &str) -> Option<LatLon> {
        self.centers.get(country).copied()
    }

    pub fn len(&self) -> usize {
        self.centers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.centers.is_empty()
    }
}
