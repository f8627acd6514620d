//! AOD extraction pipeline for MODIS MCD19A2 GeoTIFFs.
//!
//! Builds on the GDAL command-line tools (via [`gdal_tools::RasterSource`])
//! to produce:
//!
//! - file-level AOD from band statistics ([`aggregate_bands`])
//! - sampled geo-referenced pixels ([`sample_grid`])
//! - ranked hotspots ([`rank_hotspots`]) and zone averages ([`average_zone`])
//! - chronologically ordered directory batches ([`AodPipeline`])
//!
//! # Example
//!
//! ```ignore
//! use aod_pipeline::{AodPipeline, PipelineConfig};
//! use gdal_tools::{GdalTools, ToolConfig};
//!
//! let tools = GdalTools::new(ToolConfig::from_env());
//! let pipeline = AodPipeline::new(tools, PipelineConfig::default());
//! let batch = pipeline.process_directory_aod("data/nyc/MCD19A2".as_ref()).await?;
//! println!("{} of {} files usable", batch.valid_files, batch.total_files);
//! ```

pub mod aggregate;
pub mod batch;
pub mod config;
pub mod error;
pub mod hotspots;
mod pipeline;
pub mod pixels;
pub mod regions;
pub mod zone;

pub use aggregate::{aggregate_bands, FileAodResult};
pub use batch::{discover_rasters, BatchResult, FileOutcome};
pub use config::{BatchConfig, PipelineConfig, SamplingConfig};
pub use error::{PipelineError, Result};
pub use hotspots::{hotspot_result, rank_hotspots, Hotspot, HotspotResult, HOTSPOT_RADIUS_M};
pub use pipeline::AodPipeline;
pub use pixels::{resolve_transform, sample_grid, GeoPixel, PixelFileResult, TransformSource};
pub use regions::{Region, RegionRegistry, Zone};
pub use zone::{average_zone, ZoneAodResult};
