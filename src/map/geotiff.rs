//! GeoTIFF georeferencing read from file tags.
//!
//! Reads ModelPixelScale (33550) with ModelTiepoint (33922), or
//! ModelTransformation (34264), and the EPSG code from the
//! GeoKeyDirectory (34735). Pixel data is never decoded.

use crate::geo::GeoBounds;
use serde::Serialize;
use std::path::Path;
use thiserror::Error;
use tiff::decoder::Decoder;
use tiff::tags::Tag;

const MODEL_PIXEL_SCALE: u16 = 33550;
const MODEL_TIEPOINT: u16 = 33922;
const MODEL_TRANSFORMATION: u16 = 34264;
const GEO_KEY_DIRECTORY: u16 = 34735;

const GEOGRAPHIC_TYPE_KEY: u16 = 2048;
const PROJECTED_CS_TYPE_KEY: u16 = 3072;

/// EPSG code of WGS 84 geographic coordinates.
pub const EPSG_WGS84: u16 = 4326;

/// Errors reading GeoTIFF metadata.
#[derive(Debug, Error)]
pub enum GeoTiffError {
    /// I/O error opening the file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Not a readable TIFF.
    #[error("TIFF decode error: {0}")]
    TiffDecode(#[from] tiff::TiffError),

    /// The TIFF carries no usable model transform.
    #[error("Missing georeferencing tags")]
    MissingGeoreference,
}

/// Placement of a raster in its coordinate reference system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoReference {
    pub width: u32,
    pub height: u32,
    /// X of the top-left corner.
    pub origin_x: f64,
    /// Y of the top-left corner.
    pub origin_y: f64,
    pub pixel_width: f64,
    /// Negative for north-up rasters.
    pub pixel_height: f64,
    pub epsg: Option<u16>,
    pub bounds: GeoBounds,
}

impl GeoReference {
    /// Read the georeferencing of a GeoTIFF file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, GeoTiffError> {
        let file = std::fs::File::open(path.as_ref())?;
        let mut decoder = Decoder::new(file)?;
        let (width, height) = decoder.dimensions()?;

        let (origin_x, origin_y, pixel_width, pixel_height) = read_transform(&mut decoder)?;
        let epsg = decoder
            .get_tag_u16_vec(Tag::from_u16_exhaustive(GEO_KEY_DIRECTORY))
            .ok()
            .and_then(|keys| epsg_from_geokeys(&keys));

        Ok(Self::new(
            width,
            height,
            origin_x,
            origin_y,
            pixel_width,
            pixel_height,
            epsg,
        ))
    }

    pub fn new(
        width: u32,
        height: u32,
        origin_x: f64,
        origin_y: f64,
        pixel_width: f64,
        pixel_height: f64,
        epsg: Option<u16>,
    ) -> Self {
        let far_x = origin_x + width as f64 * pixel_width;
        let far_y = origin_y + height as f64 * pixel_height;
        let bounds = GeoBounds {
            min_x: origin_x.min(far_x),
            min_y: origin_y.min(far_y),
            max_x: origin_x.max(far_x),
            max_y: origin_y.max(far_y),
        };
        Self {
            width,
            height,
            origin_x,
            origin_y,
            pixel_width,
            pixel_height,
            epsg,
            bounds,
        }
    }

    /// Whether the bounds are plain longitude/latitude.
    pub fn is_geographic(&self) -> bool {
        self.epsg == Some(EPSG_WGS84)
    }
}

/// Top-left origin and pixel size.
fn read_transform<R: std::io::Read + std::io::Seek>(
    decoder: &mut Decoder<R>,
) -> Result<(f64, f64, f64, f64), GeoTiffError> {
    let scale = decoder.get_tag_f64_vec(Tag::from_u16_exhaustive(MODEL_PIXEL_SCALE));
    let tiepoint = decoder.get_tag_f64_vec(Tag::from_u16_exhaustive(MODEL_TIEPOINT));

    if let (Ok(scale), Ok(tiepoint)) = (scale, tiepoint) {
        if scale.len() >= 2 && tiepoint.len() >= 6 {
            // Tiepoint: [i, j, k, x, y, z], raster (i, j) sits at model (x, y)
            let pixel_width = scale[0];
            let pixel_height = -scale[1];
            let origin_x = tiepoint[3] - tiepoint[0] * pixel_width;
            let origin_y = tiepoint[4] - tiepoint[1] * pixel_height;
            return Ok((origin_x, origin_y, pixel_width, pixel_height));
        }
    }

    // Row-major 4x4 matrix, rotation terms ignored
    if let Ok(matrix) = decoder.get_tag_f64_vec(Tag::from_u16_exhaustive(MODEL_TRANSFORMATION)) {
        if matrix.len() >= 8 {
            return Ok((matrix[3], matrix[7], matrix[0], matrix[5]));
        }
    }

    Err(GeoTiffError::MissingGeoreference)
}

/// EPSG code from a GeoKeyDirectory, preferring the projected system.
///
/// Layout: a 4-short header whose last entry is the key count, then
/// `(key, location, count, value)` quadruples. Only inline values
/// (location 0) carry codes.
fn epsg_from_geokeys(keys: &[u16]) -> Option<u16> {
    let count = *keys.get(3)? as usize;
    let mut geographic = None;
    let mut projected = None;

    for entry in keys.get(4..)?.chunks_exact(4).take(count) {
        let (key, location, value) = (entry[0], entry[1], entry[3]);
        if location != 0 {
            continue;
        }
        match key {
            GEOGRAPHIC_TYPE_KEY => geographic = Some(value),
            PROJECTED_CS_TYPE_KEY => projected = Some(value),
            _ => {}
        }
    }

    // 32767 means user-defined
    projected.or(geographic).filter(|&code| code != 32767)
}
