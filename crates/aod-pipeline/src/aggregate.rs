//! File-level AOD from per-band statistics.

use aod_common::AcquisitionDate;
use gdal_tools::BandStatistics;
use serde::Serialize;

use crate::error::PipelineError;

const NO_VALID_BANDS: &str = "No valid AOD data found in any band";

/// Aggregate optical depth for one raster.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileAodResult {
    pub has_valid_data: bool,
    /// Weighted mean of scaled band means; `Some` iff `has_valid_data`.
    pub aod: Option<f64>,
    pub bands: Vec<BandStatistics>,
    pub valid_bands: usize,
    pub total_bands: usize,
    pub filename: String,
    #[serde(flatten)]
    pub acquisition: Option<AcquisitionDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileAodResult {
    /// A file that could not be read or reported on at all.
    pub fn failed(filename: impl Into<String>, error: &PipelineError) -> Self {
        Self {
            has_valid_data: false,
            aod: None,
            bands: Vec::new(),
            valid_bands: 0,
            total_bands: 0,
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

/// Combine bands into one AOD value.
///
/// Only bands with statistics and a non-zero valid percentage count. Each
/// contributes its scaled mean weighted by `valid_percent / 100`, normalized
/// by the total weight.
pub fn aggregate_bands(filename: impl Into<String>, bands: Vec<BandStatistics>) -> FileAodResult {
    let mut total = 0.0;
    let mut weight = 0.0;
    let mut valid_bands = 0;

    for band in bands.iter().filter(|b| b.is_usable()) {
        if let Some(scaled) = band.scaled_mean() {
            let w = band.valid_percent / 100.0;
            total += scaled * w;
            weight += w;
            valid_bands += 1;
        }
    }

    let aod = (weight > 0.0).then(|| total / weight);

    FileAodResult {
        has_valid_data: aod.is_some(),
        aod,
        total_bands: bands.len(),
        bands,
        valid_bands,
        filename: filename.into(),
        acquisition: None,
        error: aod.is_none().then(|| NO_VALID_BANDS.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::assert_approx_eq;

    fn band(index: u32, mean: f64, valid_percent: f64, scale: f64, offset: f64) -> BandStatistics {
        BandStatistics {
            has_valid_data: true,
            minimum: Some(mean),
            maximum: Some(mean),
            mean: Some(mean),
            stddev: Some(0.0),
            valid_percent,
            nodata: Some(-28672.0),
            scale,
            offset,
            ..BandStatistics::new(index)
        }
    }

    #[test]
    fn test_single_band_uses_scaled_mean() {
        let result = aggregate_bands("a.tif", vec![band(1, 10.0, 100.0, 0.001, 0.0)]);
        assert!(result.has_valid_data);
        assert_approx_eq!(result.aod.unwrap(), 0.01, 1e-12);
        assert_eq!(result.valid_bands, 1);
        assert_eq!(result.total_bands, 1);
        assert!(result.error.is_none());
    }

    #[test]
    fn test_weighting_by_coverage() {
        // 0.2 at 75% and 0.6 at 25%: (0.15 + 0.15) / 1.0
        let result = aggregate_bands(
            "a.tif",
            vec![
                band(1, 200.0, 75.0, 0.001, 0.0),
                band(2, 600.0, 25.0, 0.001, 0.0),
            ],
        );
        assert_approx_eq!(result.aod.unwrap(), 0.3, 1e-12);
    }

    #[test]
    fn test_offset_applied() {
        let result = aggregate_bands("a.tif", vec![band(1, 100.0, 50.0, 0.01, 0.5)]);
        assert_approx_eq!(result.aod.unwrap(), 1.5, 1e-12);
    }

    #[test]
    fn test_unusable_bands_counted_not_averaged() {
        let mut empty = BandStatistics::new(2);
        empty.valid_percent = 0.0;
        let mut zero_coverage = band(3, 5000.0, 0.0, 0.001, 0.0);
        zero_coverage.valid_percent = 0.0;

        let result = aggregate_bands(
            "a.tif",
            vec![band(1, 300.0, 40.0, 0.001, 0.0), empty, zero_coverage],
        );
        assert_approx_eq!(result.aod.unwrap(), 0.3, 1e-12);
        assert_eq!(result.valid_bands, 1);
        assert_eq!(result.total_bands, 3);
    }

    #[test]
    fn test_no_valid_bands() {
        let result = aggregate_bands("a.tif", vec![BandStatistics::new(1), BandStatistics::new(2)]);
        assert!(!result.has_valid_data);
        assert!(result.aod.is_none());
        assert_eq!(result.total_bands, 2);
        assert_eq!(result.error.as_deref(), Some(NO_VALID_BANDS));
    }

    #[test]
    fn test_json_shape() {
        let acquisition = AcquisitionDate::from_year_day(2025, 60);
        let result = aggregate_bands("MCD19A2.A2025060.tif", vec![band(1, 10.0, 100.0, 0.001, 0.0)])
            .with_acquisition(acquisition);
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["hasValidData"], true);
        assert_eq!(json["validBands"], 1);
        assert_eq!(json["totalBands"], 1);
        assert_eq!(json["date"], "2025-03-01");
        assert_eq!(json["julianDay"], 60);
        assert_eq!(json["year"], 2025);
        assert!(json.get("error").is_none());
        assert_eq!(json["bands"][0]["noDataValue"], -28672.0);
    }
}
