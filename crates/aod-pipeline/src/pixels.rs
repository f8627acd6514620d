//! Geo-referenced pixel sampling from an ASCII grid.

use aod_common::{AcquisitionDate, GeoTransform, RasterSize};
use gdal_tools::{parse_geotransform, parse_origin_pixel_size, AsciiGrid, ParseError};
use serde::Serialize;
use std::path::Path;
use tracing::warn;

use crate::config::SamplingConfig;
use crate::error::PipelineError;
use crate::regions::RegionRegistry;

/// One sampled cell: upper-left corner position and optical depth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPixel {
    pub lat: f64,
    pub lng: f64,
    pub aod: f64,
}

/// Where the geotransform used for a file came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "region", rename_all = "camelCase")]
pub enum TransformSource {
    /// Explicit `GeoTransform =` block in the report.
    Reported,
    /// Built from the report's `Origin` and `Pixel Size` lines.
    OriginPixelSize,
    /// Report had neither; the region's configured default was used.
    RegionFallback(String),
}

impl TransformSource {
    pub fn is_degraded(&self) -> bool {
        matches!(self, TransformSource::RegionFallback(_))
    }
}

/// Pick a transform from the plain metadata report, degrading tier by tier.
pub fn resolve_transform(
    report: &str,
    path: &Path,
    regions: &RegionRegistry,
) -> Result<(GeoTransform, TransformSource), PipelineError> {
    if let Ok(gt) = parse_geotransform(report) {
        return Ok((gt, TransformSource::Reported));
    }
    if let Ok(gt) = parse_origin_pixel_size(report) {
        return Ok((gt, TransformSource::OriginPixelSize));
    }

    let region = regions
        .fallback_for(path)
        .ok_or(ParseError::MissingField("GeoTransform"))?;

    warn!(
        path = %path.display(),
        region = %region.id,
        "No geotransform in raster metadata, using region fallback"
    );
    Ok((
        region.fallback_transform,
        TransformSource::RegionFallback(region.id.clone()),
    ))
}

/// Read every `stride`-th row and column, keeping domain-valid cells.
///
/// A cell is dropped when it equals `nodata` (or the grid's declared nodata),
/// falls outside the raw range, or converts to an AOD outside the valid bounds.
pub fn sample_grid(
    grid: &AsciiGrid,
    transform: &GeoTransform,
    stride: usize,
    sampling: &SamplingConfig,
    nodata: f64,
) -> Vec<GeoPixel> {
    grid.sampled(stride)
        .filter(|&(_, _, raw)| raw != nodata && !grid.is_nodata(raw))
        .filter_map(|(row, col, raw)| {
            let aod = sampling.raw_to_aod(raw)?;
            if !sampling.is_valid_aod(aod) {
                return None;
            }
            let (lat, lng) = transform.pixel_to_geo(col, row);
            Some(GeoPixel { lat, lng, aod })
        })
        .collect()
}

/// Pixel extraction outcome for one raster.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PixelFileResult {
    pub success: bool,
    pub pixels: Vec<GeoPixel>,
    /// Number of retained pixels.
    pub total_pixels: usize,
    pub geotransform: Option<GeoTransform>,
    pub raster_size: Option<RasterSize>,
    pub transform_source: Option<TransformSource>,
    pub filename: String,
    #[serde(flatten)]
    pub acquisition: Option<AcquisitionDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PixelFileResult {
    pub fn failed(filename: impl Into<String>, error: &PipelineError) -> Self {
        Self {
            success: false,
            pixels: Vec::new(),
            total_pixels: 0,
            geotransform: None,
            raster_size: None,
            transform_source: None,
            filename: filename.into(),
            acquisition: None,
            error: Some(error.file_message()),
        }
    }

    pub fn with_acquisition(mut self, acquisition: Option<AcquisitionDate>) -> Self {
        self.acquisition = acquisition;
        self
    }
}
