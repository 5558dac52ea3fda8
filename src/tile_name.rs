//! Tile identifier extraction from prediction filenames.
//!
//! Prediction rasters are named like `HLS_L30_2016_03_T38RLQ_pred.tif`: the
//! filename is split on `_`, the token at a fixed position holds the MGRS
//! tile with a leading `T`. The whole filename (extension included) is
//! tokenized, so a tile token must not be the last segment.

use thiserror::Error;

/// Filename does not follow the naming convention.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Filename '{filename}' has {found} '{delimiter}'-delimited tokens, expected at least {expected}")]
pub struct FilenameError {
    /// Offending filename.
    pub filename: String,
    /// Token delimiter of the convention.
    pub delimiter: char,
    /// Number of tokens found.
    pub found: usize,
    /// Minimum number of tokens the convention needs.
    pub expected: usize,
}

/// A positional naming convention for tile files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileNameConvention {
    /// Token delimiter.
    pub delimiter: char,
    /// Zero-based position of the tile token.
    pub token_index: usize,
    /// Single character stripped from the front of the tile token, if present.
    pub strip_prefix: char,
}

impl TileNameConvention {
    /// `<...>_<...>_<...>_<...>_T<tile>_<...>.tif`
    pub const MGRS_V1: Self = Self {
        delimiter: '_',
        token_index: 4,
        strip_prefix: 'T',
    };

    /// Extract the tile identifier from a bare filename.
    pub fn tile_id<'a>(&self, filename: &'a str) -> Result<&'a str, FilenameError> {
        let mut tokens = filename.split(self.delimiter);
        match tokens.nth(self.token_index) {
            Some(token) => Ok(self.strip(token)),
            None => Err(FilenameError {
                filename: filename.to_string(),
                delimiter: self.delimiter,
                found: filename.split(self.delimiter).count(),
                expected: self.token_index + 1,
            }),
        }
    }

    /// Strip one leading prefix character. Idempotent on tokens without it.
    pub fn strip<'a>(&self, token: &'a str) -> &'a str {
        token.strip_prefix(self.strip_prefix).unwrap_or(token)
    }
}

impl Default for TileNameConvention {
    fn default() -> Self {
        Self::MGRS_V1
    }
}
