//! Top-N highest-AOD points of one observation.

use aod_common::{AcquisitionDate, Severity};
use serde::Serialize;

use crate::config::SamplingConfig;
use crate::pixels::GeoPixel;

/// Radius in meters reported for every hotspot.
pub const HOTSPOT_RADIUS_M: u32 = 1000;

/// A ranked high-AOD point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hotspot {
    pub id: String,
    pub lat: f64,
    pub lng: f64,
    pub aod: f64,
    /// Coarse estimate: `round(aod * 100 + 50)`.
    pub aqi: u32,
    pub severity: Severity,
    pub radius: u32,
    /// 1-based, descending AOD.
    pub rank: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl Hotspot {
    fn from_pixel(pixel: &GeoPixel, rank: usize) -> Self {
        Self {
            id: format!("hotspot_{}", rank),
            lat: pixel.lat,
            lng: pixel.lng,
            aod: pixel.aod,
            aqi: (pixel.aod * 100.0 + 50.0).round() as u32,
            severity: Severity::from_aod(pixel.aod),
            radius: HOTSPOT_RADIUS_M,
            rank,
            date: None,
            filename: None,
        }
    }

    /// Attach the observation a hotspot came from.
    pub fn stamp(&mut self, acquisition: Option<&AcquisitionDate>, filename: &str) {
        self.date = acquisition.map(AcquisitionDate::iso_date);
        self.filename = Some(filename.to_string());
    }
}

/// Hotspot query outcome for one raster.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HotspotResult {
    pub success: bool,
    pub hotspots: Vec<Hotspot>,
    pub total_pixels: usize,
    pub valid_pixels: usize,
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HotspotResult {
    pub fn failed(filename: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            hotspots: Vec::new(),
            total_pixels: 0,
            valid_pixels: 0,
            filename: filename.into(),
            error: Some(error.into()),
        }
    }
}

/// The `max` highest domain-valid pixels, ranked from 1.
///
/// Ties keep their sampling order.
pub fn rank_hotspots(pixels: &[GeoPixel], max: usize, sampling: &SamplingConfig) -> Vec<Hotspot> {
    let mut valid: Vec<&GeoPixel> = pixels
        .iter()
        .filter(|p| sampling.is_valid_aod(p.aod))
        .collect();
    valid.sort_by(|a, b| b.aod.total_cmp(&a.aod));

    valid
        .into_iter()
        .take(max)
        .enumerate()
        .map(|(i, p)| Hotspot::from_pixel(p, i + 1))
        .collect()
}

/// Build a [`HotspotResult`] from a file's pixels.
pub fn hotspot_result(
    filename: &str,
    pixels: &[GeoPixel],
    total_pixels: usize,
    max: usize,
    sampling: &SamplingConfig,
) -> HotspotResult {
    let valid_pixels = pixels.iter().filter(|p| sampling.is_valid_aod(p.aod)).count();
    if valid_pixels == 0 {
        return HotspotResult {
            total_pixels,
            ..HotspotResult::failed(filename, "No valid AOD pixels found")
        };
    }

    HotspotResult {
        success: true,
        hotspots: rank_hotspots(pixels, max, sampling),
        total_pixels,
        valid_pixels,
        filename: filename.to_string(),
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn px(aod: f64) -> GeoPixel {
        GeoPixel {
            lat: 40.7,
            lng: -74.0,
            aod,
        }
    }

    #[test]
    fn test_ranked_descending() {
        let pixels = vec![px(0.3), px(1.7), px(0.9), px(1.2)];
        let hotspots = rank_hotspots(&pixels, 10, &SamplingConfig::default());

        let aods: Vec<f64> = hotspots.iter().map(|h| h.aod).collect();
        assert_eq!(aods, vec![1.7, 1.2, 0.9, 0.3]);
        let ranks: Vec<usize> = hotspots.iter().map(|h| h.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4]);
        assert_eq!(hotspots[0].id, "hotspot_1");
    }

    #[test]
    fn test_truncates_to_max() {
        let pixels: Vec<GeoPixel> = (1..=20).map(|i| px(i as f64 * 0.05)).collect();
        let hotspots = rank_hotspots(&pixels, 5, &SamplingConfig::default());
        assert_eq!(hotspots.len(), 5);
        assert!((hotspots[0].aod - 1.0).abs() < 1e-12);
        assert!((hotspots[4].aod - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_fewer_valid_than_requested() {
        let pixels = vec![px(0.5), px(0.0), px(2.5), px(0.7), px(1.1)];
        let hotspots = rank_hotspots(&pixels, 5, &SamplingConfig::default());
        assert_eq!(hotspots.len(), 3);
        assert_eq!(hotspots.last().unwrap().rank, 3);
    }

    #[test]
    fn test_derived_fields() {
        let pixels = [px(1.6), px(1.234), px(0.456)];
        let hotspots = rank_hotspots(&pixels, 3, &SamplingConfig::default());

        assert_eq!(hotspots[0].severity, Severity::Critical);
        assert_eq!(hotspots[0].aqi, 210);
        assert_eq!(hotspots[1].severity, Severity::High);
        assert_eq!(hotspots[1].aqi, 173);
        assert_eq!(hotspots[2].severity, Severity::Moderate);
        assert_eq!(hotspots[2].aqi, 96);
        assert!(hotspots.iter().all(|h| h.radius == 1000));
    }

    #[test]
    fn test_result_without_valid_pixels() {
        let result = hotspot_result("a.tif", &[px(2.5)], 1, 10, &SamplingConfig::default());
        assert!(!result.success);
        assert!(result.hotspots.is_empty());
        assert_eq!(result.total_pixels, 1);
        assert_eq!(result.error.as_deref(), Some("No valid AOD pixels found"));
    }

    #[test]
    fn test_stamp() {
        let mut hotspot = rank_hotspots(&[px(0.4)], 1, &SamplingConfig::default()).remove(0);
        hotspot.stamp(AcquisitionDate::from_year_day(2025, 60).as_ref(), "MCD19A2.A2025060.tif");

        let json = serde_json::to_value(&hotspot).unwrap();
        assert_eq!(json["date"], "2025-03-01");
        assert_eq!(json["filename"], "MCD19A2.A2025060.tif");
        assert_eq!(json["severity"], "moderate");
    }
}
