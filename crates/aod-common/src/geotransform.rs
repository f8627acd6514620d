//! Affine geotransform for north-up (or rotated) rasters.

use serde::{Deserialize, Serialize};

/// Raster dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RasterSize {
    pub width: usize,
    pub height: usize,
}

impl RasterSize {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Total number of cells.
    pub fn cells(&self) -> usize {
        self.width * self.height
    }
}

/// Six-coefficient mapping from (column, row) to (longitude, latitude).
///
/// Coefficient order follows GDAL:
/// `[origin_x, pixel_width, row_rotation, origin_y, col_rotation, pixel_height]`.
/// `pixel_height` is negative for north-up rasters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 6]", into = "[f64; 6]")]
pub struct GeoTransform {
    pub origin_x: f64,
    pub pixel_width: f64,
    pub row_rotation: f64,
    pub origin_y: f64,
    pub col_rotation: f64,
    pub pixel_height: f64,
}

impl GeoTransform {
    /// Build a north-up transform from an origin and pixel size.
    pub fn north_up(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self {
            origin_x,
            pixel_width,
            row_rotation: 0.0,
            origin_y,
            col_rotation: 0.0,
            pixel_height,
        }
    }

    /// Geographic position of a cell's upper-left corner as `(lat, lng)`.
    pub fn pixel_to_geo(&self, col: usize, row: usize) -> (f64, f64) {
        let (c, r) = (col as f64, row as f64);
        let lng = self.origin_x + c * self.pixel_width + r * self.row_rotation;
        let lat = self.origin_y + c * self.col_rotation + r * self.pixel_height;
        (lat, lng)
    }

    pub fn is_north_up(&self) -> bool {
        self.row_rotation == 0.0 && self.col_rotation == 0.0 && self.pixel_height < 0.0
    }

    pub fn coefficients(&self) -> [f64; 6] {
        [
            self.origin_x,
            self.pixel_width,
            self.row_rotation,
            self.origin_y,
            self.col_rotation,
            self.pixel_height,
        ]
    }
}

impl From<[f64; 6]> for GeoTransform {
    fn from(c: [f64; 6]) -> Self {
        Self {
            origin_x: c[0],
            pixel_width: c[1],
            row_rotation: c[2],
            origin_y: c[3],
            col_rotation: c[4],
            pixel_height: c[5],
        }
    }
}

impl From<GeoTransform> for [f64; 6] {
    fn from(gt: GeoTransform) -> Self {
        gt.coefficients()
    }
}
