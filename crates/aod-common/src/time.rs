//! Acquisition dates embedded in satellite filenames.
//!
//! MODIS-style products carry the observation day as `A{YYYY}{DDD}`, for
//! example `MCD19A2.A2025060.h12v04.061.tif` is day 60 of 2025.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Year and day-of-year parsed from a filename, with the derived calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcquisitionDate {
    pub date: NaiveDate,
    pub julian_day: u32,
    pub year: i32,
}

impl AcquisitionDate {
    pub fn from_year_day(year: i32, julian_day: u32) -> Option<Self> {
        let date = NaiveDate::from_yo_opt(year, julian_day)?;
        Some(Self {
            date,
            julian_day,
            year,
        })
    }

    /// Find the first `A` followed by seven digits and decode it.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let bytes = filename.as_bytes();
        let start = (0..bytes.len()).find(|&i| {
            bytes[i] == b'A'
                && bytes
                    .get(i + 1..i + 8)
                    .is_some_and(|digits| digits.iter().all(u8::is_ascii_digit))
        })?;

        let year: i32 = filename[start + 1..start + 5].parse().ok()?;
        let julian_day: u32 = filename[start + 5..start + 8].parse().ok()?;
        Self::from_year_day(year, julian_day)
    }

    /// ISO calendar date, e.g. "2025-03-01".
    pub fn iso_date(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// One discovered raster observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterFile {
    pub path: PathBuf,
    pub filename: String,
    pub acquisition: Option<AcquisitionDate>,
}

impl RasterFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let filename = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        let acquisition = AcquisitionDate::from_filename(&filename);

        Self {
            path,
            filename,
            acquisition,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True for names ending in `.tif` (case-sensitive, as listed on disk).
    pub fn is_tif_name(name: &str) -> bool {
        name.ends_with(".tif")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modis_filename() {
        let acq =
            AcquisitionDate::from_filename("MCD19A2.A2025060.h12v04.061.2025062.tif").unwrap();
        assert_eq!(acq.year, 2025);
        assert_eq!(acq.julian_day, 60);
        assert_eq!(acq.iso_date(), "2025-03-01");
    }

    #[test]
    fn test_leap_year() {
        let acq = AcquisitionDate::from_filename("A2024060.tif").unwrap();
        assert_eq!(acq.iso_date(), "2024-02-29");
    }

    #[test]
    fn test_no_pattern() {
        assert!(AcquisitionDate::from_filename("MCD19A2.tif").is_none());
        assert!(AcquisitionDate::from_filename("A202506.tif").is_none());
        assert!(AcquisitionDate::from_filename("A2025000.tif").is_none());
        assert!(AcquisitionDate::from_filename("A2025366.tif").is_none());
    }

    #[test]
    fn test_raster_file() {
        let file = RasterFile::new("/data/nyc/MCD19A2.A2025001.h12v04.tif");
        assert_eq!(file.filename, "MCD19A2.A2025001.h12v04.tif");
        assert_eq!(file.acquisition.unwrap().iso_date(), "2025-01-01");
        assert!(RasterFile::is_tif_name(&file.filename));
        assert!(!RasterFile::is_tif_name("a.tiff"));
    }
}
