//! GDAL command-line integration.
//!
//! Runs `gdalinfo` and `gdal_translate` as child processes and turns their
//! text output into typed values:
//!
//! - [`parse_band_statistics`] for `gdalinfo -stats` band sections
//! - [`parse_raster_size`], [`parse_geotransform`] and
//!   [`parse_origin_pixel_size`] for raster geometry
//! - [`AsciiGrid`] for `gdal_translate -of AAIGrid` output
//!
//! # Implementation Notes
//!
//! The tools' output has no stable schema beyond labeled lines, so the
//! parsers are line-oriented and tolerate missing optional fields.

pub mod ascii_grid;
pub mod bands;
pub mod config;
pub mod error;
pub mod invoker;
pub mod report;
pub mod scoped;

pub use ascii_grid::AsciiGrid;
pub use bands::{parse_band_statistics, BandStatistics, ReportLine, SummaryStats};
pub use config::{ToolConfig, TranslateOptions, DEFAULT_NODATA, DEFAULT_SCALE_RANGE};
pub use error::{ParseError, ToolError, ToolResult};
pub use invoker::{GdalTools, RasterSource, ToolVersions};
pub use report::{parse_geotransform, parse_origin_pixel_size, parse_raster_size};
pub use scoped::ScopedGrid;
