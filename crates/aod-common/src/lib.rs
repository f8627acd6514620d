//! Common types shared across the AOD ingestion crates.

pub mod bbox;
pub mod geotransform;
pub mod severity;
pub mod time;

pub use bbox::{BboxParseError, ZoneBounds};
pub use geotransform::{GeoTransform, RasterSize};
pub use severity::Severity;
pub use time::{AcquisitionDate, RasterFile};
