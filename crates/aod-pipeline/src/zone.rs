//! Zone-bounded AOD averages.

use aod_common::ZoneBounds;
use serde::Serialize;

use crate::config::SamplingConfig;
use crate::error::PipelineError;
use crate::pixels::GeoPixel;

/// Average optical depth inside a rectangle for one raster.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneAodResult {
    pub success: bool,
    pub aod: Option<f64>,
    /// Valid pixels inside the zone.
    pub pixel_count: usize,
    pub total_pixels: usize,
    /// `100 * pixel_count / total_pixels`, rounded.
    pub zone_coverage: u32,
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ZoneAodResult {
    pub fn failed(filename: impl Into<String>, total_pixels: usize, error: &PipelineError) -> Self {
        Self {
            success: false,
            aod: None,
            pixel_count: 0,
            total_pixels,
            zone_coverage: 0,
            filename: filename.into(),
            error: Some(error.file_message()),
        }
    }
}

/// Mean AOD over pixels inside `bounds` (all edges inclusive) whose AOD is
/// domain-valid.
pub fn average_zone(
    filename: &str,
    pixels: &[GeoPixel],
    total_pixels: usize,
    bounds: &ZoneBounds,
    sampling: &SamplingConfig,
) -> ZoneAodResult {
    let in_zone: Vec<&GeoPixel> = pixels
        .iter()
        .filter(|p| bounds.contains(p.lat, p.lng))
        .collect();

    if in_zone.is_empty() {
        return ZoneAodResult::failed(filename, total_pixels, &PipelineError::NoPixelsInZone);
    }

    let valid: Vec<f64> = in_zone
        .iter()
        .map(|p| p.aod)
        .filter(|&aod| sampling.is_valid_aod(aod))
        .collect();

    if valid.is_empty() {
        return ZoneAodResult::failed(filename, total_pixels, &PipelineError::NoValidPixelsInZone);
    }

    let mean = valid.iter().sum::<f64>() / valid.len() as f64;
    let coverage = if total_pixels > 0 {
        (100.0 * valid.len() as f64 / total_pixels as f64).round() as u32
    } else {
        0
    };

    ZoneAodResult {
        success: true,
        aod: Some(mean),
        pixel_count: valid.len(),
        total_pixels,
        zone_coverage: coverage,
        filename: filename.to_string(),
        error: None,
    }
}
