//! Pipeline tuning: sampling density, value conversion and batch fan-out.

use aod_common::RasterSize;
use gdal_tools::TranslateOptions;
use serde::{Deserialize, Serialize};

use crate::regions::RegionRegistry;

/// Grid sampling and raw-to-AOD conversion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Roughly this many samples are read along each axis.
    pub target_per_axis: usize,
    /// Inclusive range of raw values that carry a measurement.
    pub raw_range: (f64, f64),
    /// Raw integer to optical depth.
    pub aod_scale: f64,
    /// Exclusive domain-validity bounds for optical depth.
    pub valid_aod: (f64, f64),
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            target_per_axis: 200,
            raw_range: (0.0, 6000.0),
            aod_scale: 0.001,
            valid_aod: (0.0, 2.0),
        }
    }
}

impl SamplingConfig {
    /// Row and column step: `max(1, floor(sqrt(width * height) / target_per_axis))`.
    pub fn stride(&self, size: RasterSize) -> usize {
        let target = self.target_per_axis.max(1) as f64;
        let stride = ((size.cells() as f64).sqrt() / target).floor() as usize;
        stride.max(1)
    }

    /// Optical depth for a raw cell value, or `None` outside the raw range.
    pub fn raw_to_aod(&self, raw: f64) -> Option<f64> {
        let (lo, hi) = self.raw_range;
        if raw >= lo && raw <= hi {
            Some(raw * self.aod_scale)
        } else {
            None
        }
    }

    pub fn is_valid_aod(&self, aod: f64) -> bool {
        let (lo, hi) = self.valid_aod;
        aod > lo && aod < hi
    }
}

/// Directory processing limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Files extracted concurrently; batches run one after another.
    pub batch_size: usize,
    /// Failed results kept in a batch result's `errors`.
    pub error_sample: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 5,
            error_sample: 5,
        }
    }
}

/// Everything an [`AodPipeline`](crate::AodPipeline) needs besides its raster source.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub sampling: SamplingConfig,
    pub batch: BatchConfig,
    pub translate: TranslateOptions,
    pub regions: RegionRegistry,
}

impl PipelineConfig {
    pub fn with_regions(mut self, regions: RegionRegistry) -> Self {
        self.regions = regions;
        self
    }

    pub fn with_batch(mut self, batch: BatchConfig) -> Self {
        self.batch = batch;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stride_small_rasters_read_every_cell() {
        let sampling = SamplingConfig::default();
        assert_eq!(sampling.stride(RasterSize::new(10, 10)), 1);
        assert_eq!(sampling.stride(RasterSize::new(399, 399)), 1);
        assert_eq!(sampling.stride(RasterSize::new(0, 0)), 1);
    }

    #[test]
    fn test_stride_modis_tile() {
        let sampling = SamplingConfig::default();
        // 1200 x 1200 MCD19A2 tile
        assert_eq!(sampling.stride(RasterSize::new(1200, 1200)), 6);
        assert_eq!(sampling.stride(RasterSize::new(400, 400)), 2);
    }

    #[test]
    fn test_stride_custom_target() {
        let sampling = SamplingConfig {
            target_per_axis: 10,
            ..SamplingConfig::default()
        };
        assert_eq!(sampling.stride(RasterSize::new(100, 100)), 10);
    }

    #[test]
    fn test_raw_to_aod() {
        let sampling = SamplingConfig::default();
        assert_eq!(sampling.raw_to_aod(6000.0), Some(6.0));
        assert_eq!(sampling.raw_to_aod(0.0), Some(0.0));
        assert_eq!(sampling.raw_to_aod(-28672.0), None);
        assert_eq!(sampling.raw_to_aod(6001.0), None);
        assert_eq!(sampling.raw_to_aod(f64::NAN), None);
    }

    #[test]
    fn test_valid_aod_is_exclusive() {
        let sampling = SamplingConfig::default();
        assert!(!sampling.is_valid_aod(0.0));
        assert!(sampling.is_valid_aod(0.001));
        assert!(sampling.is_valid_aod(1.999));
        assert!(!sampling.is_valid_aod(2.0));
    }

    #[test]
    fn test_batch_defaults() {
        let batch = BatchConfig::default();
        assert_eq!(batch.batch_size, 5);
        assert_eq!(batch.error_sample, 5);
    }
}
