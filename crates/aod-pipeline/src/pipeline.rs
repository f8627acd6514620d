//! The AOD pipeline over a [`RasterSource`].

use aod_common::{RasterFile, RasterSize, ZoneBounds};
use futures::future::join_all;
use gdal_tools::{parse_band_statistics, parse_raster_size, AsciiGrid, RasterSource, ToolVersions};
use metrics::counter;
use std::future::Future;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

use crate::aggregate::{aggregate_bands, FileAodResult};
use crate::batch::{discover_rasters, BatchResult, FileOutcome};
use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::hotspots::{hotspot_result, HotspotResult};
use crate::pixels::{resolve_transform, sample_grid, PixelFileResult};
use crate::zone::{average_zone, ZoneAodResult};

/// Turns rasters into AOD aggregates, pixel sets, hotspots and zone averages.
///
/// Per-file methods never fail: problems are reported in the result's
/// `error` field. Directory methods fail only when the whole run cannot
/// proceed (tools unavailable, directory unreadable, no rasters).
pub struct AodPipeline<S> {
    source: S,
    config: PipelineConfig,
}

impl<S: RasterSource> AodPipeline<S> {
    pub fn new(source: S, config: PipelineConfig) -> Self {
        Self { source, config }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Check that the external tools respond.
    pub async fn probe(&self) -> Result<ToolVersions> {
        Ok(self.source.probe().await?)
    }

    /// Band statistics and weighted AOD for one file.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub async fn extract_file_aod(&self, path: &Path) -> FileAodResult {
        let file = RasterFile::new(path);
        match self.try_file_aod(&file).await {
            Ok(result) => result,
            Err(e) => {
                debug!(error = %e, "AOD extraction failed");
                FileAodResult::failed(&file.filename, &e)
            }
        }
    }

    async fn try_file_aod(&self, file: &RasterFile) -> Result<FileAodResult> {
        tokio::fs::metadata(file.path()).await?;
        let report = self.source.stats_report(file.path()).await?;
        let bands = parse_band_statistics(&report);
        Ok(aggregate_bands(&file.filename, bands))
    }

    /// Sampled, geo-referenced, domain-valid pixels for one file.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub async fn extract_pixels(&self, path: &Path) -> PixelFileResult {
        let file = RasterFile::new(path);
        match self.try_pixels(&file).await {
            Ok(result) => result,
            Err(e) => {
                debug!(error = %e, "Pixel extraction failed");
                PixelFileResult::failed(&file.filename, &e)
            }
        }
    }

    async fn try_pixels(&self, file: &RasterFile) -> Result<PixelFileResult> {
        tokio::fs::metadata(file.path()).await?;
        let report = self.source.info_report(file.path()).await?;
        let reported_size = parse_raster_size(&report).ok();
        let (transform, transform_source) =
            resolve_transform(&report, file.path(), &self.config.regions)?;

        let text = self
            .source
            .ascii_grid(file.path(), &self.config.translate)
            .await?;
        let grid = AsciiGrid::parse(&text)?;

        let size = reported_size.unwrap_or_else(|| {
            warn!(file = %file.filename, "No raster size in metadata, using grid dimensions");
            RasterSize::new(grid.ncols, grid.nrows)
        });
        let stride = self.config.sampling.stride(size);
        let pixels = sample_grid(
            &grid,
            &transform,
            stride,
            &self.config.sampling,
            self.config.translate.nodata as f64,
        );

        debug!(stride, retained = pixels.len(), "Sampled grid");

        if pixels.is_empty() {
            return Err(PipelineError::NoValidData(
                "No valid AOD pixels found".to_string(),
            ));
        }

        Ok(PixelFileResult {
            success: true,
            total_pixels: pixels.len(),
            pixels,
            geotransform: Some(transform),
            raster_size: Some(size),
            transform_source: Some(transform_source),
            filename: file.filename.clone(),
            acquisition: None,
            error: None,
        })
    }

    /// Top `max` pixels of one file.
    pub async fn extract_hotspots(&self, path: &Path, max: usize) -> HotspotResult {
        let pixels = self.extract_pixels(path).await;
        if !pixels.success {
            let error = pixels.error.unwrap_or_default();
            return HotspotResult::failed(pixels.filename, error);
        }

        hotspot_result(
            &pixels.filename,
            &pixels.pixels,
            pixels.total_pixels,
            max,
            &self.config.sampling,
        )
    }

    /// Mean AOD of one file inside `bounds`.
    pub async fn zone_average(&self, path: &Path, bounds: &ZoneBounds) -> ZoneAodResult {
        let pixels = self.extract_pixels(path).await;
        if !pixels.success {
            return ZoneAodResult {
                success: false,
                aod: None,
                pixel_count: 0,
                total_pixels: 0,
                zone_coverage: 0,
                filename: pixels.filename,
                error: pixels.error,
            };
        }

        average_zone(
            &pixels.filename,
            &pixels.pixels,
            pixels.total_pixels,
            bounds,
            &self.config.sampling,
        )
    }

    /// File-level AOD for every `.tif` in `dir`, in filename order.
    #[instrument(skip(self), fields(dir = %dir.display()))]
    pub async fn process_directory_aod(&self, dir: &Path) -> Result<BatchResult<FileAodResult>> {
        self.process_directory(dir, "aod", move |file| async move {
            self.extract_file_aod(file.path())
                .await
                .with_acquisition(file.acquisition)
        })
        .await
    }

    /// Pixel extraction for every `.tif` in `dir`, in filename order.
    #[instrument(skip(self), fields(dir = %dir.display()))]
    pub async fn process_directory_pixels(
        &self,
        dir: &Path,
    ) -> Result<BatchResult<PixelFileResult>> {
        self.process_directory(dir, "pixels", move |file| async move {
            self.extract_pixels(file.path())
                .await
                .with_acquisition(file.acquisition)
        })
        .await
    }

    async fn process_directory<T, F, Fut>(
        &self,
        dir: &Path,
        mode: &'static str,
        extract: F,
    ) -> Result<BatchResult<T>>
    where
        T: FileOutcome,
        F: Fn(RasterFile) -> Fut,
        Fut: Future<Output = T>,
    {
        let files = discover_rasters(dir).await?;
        self.source.probe().await?;

        let total = files.len();
        let batch_size = self.config.batch.batch_size.max(1);
        info!(total, batch_size, "Processing GeoTIFF files");

        let mut results = Vec::with_capacity(total);
        for (i, batch) in files.chunks(batch_size).enumerate() {
            // join_all yields results in input order, not completion order.
            let batch_results = join_all(batch.iter().cloned().map(&extract)).await;

            for result in &batch_results {
                if result.is_success() {
                    counter!("aod_files_processed_total", "mode" => mode).increment(1);
                } else {
                    counter!("aod_files_failed_total", "mode" => mode).increment(1);
                }
            }
            results.extend(batch_results);

            let done = (i * batch_size + batch.len()).min(total);
            info!("Processed {}/{} files", done, total);
        }

        let batch = BatchResult::assemble(results, self.config.batch.error_sample);
        info!(
            valid = batch.valid_files,
            errors = batch.error_files,
            "Finished processing directory"
        );
        if batch.all_failed() {
            warn!("No file in the directory produced valid data");
        }
        Ok(batch)
    }
}
