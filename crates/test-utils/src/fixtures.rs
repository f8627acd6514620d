//! Builders for canned `gdalinfo` reports and ASCII grids.
//!
//! The text mirrors what GDAL 3.x prints for MODIS MCD19A2 GeoTIFFs, so the
//! parsers see realistic input without the tools being installed.

use std::fmt::Write;

/// MODIS MCD19A2 fill value.
pub const MODIS_NODATA: i32 = -28672;

/// Common coverage regions.
pub mod regions {
    /// New York City: upper-left corner and 0.01 degree pixels.
    pub const NYC_ORIGIN: (f64, f64) = (-74.3, 41.0);

    /// Mumbai: upper-left corner and 0.01 degree pixels.
    pub const MUMBAI_ORIGIN: (f64, f64) = (72.75, 19.30);

    /// North-up 0.01 degree pixel size.
    pub const PIXEL_SIZE: (f64, f64) = (0.01, -0.01);
}

/// One band section of a statistics report.
#[derive(Debug, Clone, PartialEq)]
pub struct BandFixture {
    pub band: u32,
    /// (minimum, maximum, mean, stddev); `None` omits the statistics line.
    pub stats: Option<(f64, f64, f64, f64)>,
    pub valid_percent: Option<f64>,
    pub scale: f64,
    pub offset: f64,
    pub nodata: Option<i32>,
}

impl BandFixture {
    /// A band with statistics, MODIS scale (0.001) and the given coverage.
    pub fn valid(band: u32, mean: f64, valid_percent: f64) -> Self {
        Self {
            band,
            stats: Some((mean, mean, mean, 0.0)),
            valid_percent: Some(valid_percent),
            scale: 0.001,
            offset: 0.0,
            nodata: Some(MODIS_NODATA),
        }
    }

    /// A band the tool could not compute statistics for (all nodata).
    pub fn empty(band: u32) -> Self {
        Self {
            band,
            stats: None,
            valid_percent: None,
            scale: 0.001,
            offset: 0.0,
            nodata: Some(MODIS_NODATA),
        }
    }

    pub fn with_scale(mut self, scale: f64, offset: f64) -> Self {
        self.scale = scale;
        self.offset = offset;
        self
    }
}

fn header(out: &mut String, filename: &str, width: usize, height: usize) {
    let _ = writeln!(out, "Driver: GTiff/GeoTIFF");
    let _ = writeln!(out, "Files: {}", filename);
    let _ = writeln!(out, "Size is {}, {}", width, height);
    let _ = writeln!(out, "Coordinate System is:");
    let _ = writeln!(out, "GEOGCRS[\"WGS 84\",");
    let _ = writeln!(out, "    ID[\"EPSG\",4326]]");
    let _ = writeln!(out, "Data axis to CRS axis mapping: 2,1");
}

fn metadata_footer(out: &mut String) {
    let _ = writeln!(out, "Image Structure Metadata:");
    let _ = writeln!(out, "  INTERLEAVE=BAND");
    let _ = writeln!(out, "Corner Coordinates:");
    let _ = writeln!(out, "Upper Left  (  -74.3000000,  41.0000000)");
}

/// `gdalinfo -stats` output with one section per band.
pub fn stats_report(filename: &str, bands: &[BandFixture]) -> String {
    let mut out = String::new();
    header(&mut out, filename, 1200, 1200);
    metadata_footer(&mut out);

    for b in bands {
        let _ = writeln!(out, "Band {} Block=1200x1 Type=Int16, ColorInterp=Gray", b.band);
        let _ = writeln!(out, "  Description = Optical_Depth_047");
        if let Some((min, max, mean, std)) = b.stats {
            let _ = writeln!(
                out,
                "  Minimum={:.3}, Maximum={:.3}, Mean={:.3}, StdDev={:.3}",
                min, max, mean, std
            );
        }
        if let Some(nd) = b.nodata {
            let _ = writeln!(out, "  NoData Value={}", nd);
        }
        let _ = writeln!(out, "  Offset: {},   Scale:{}", b.offset, b.scale);
        let _ = writeln!(out, "  Metadata:");
        if let Some((min, max, mean, std)) = b.stats {
            let _ = writeln!(out, "    STATISTICS_MAXIMUM={}", max);
            let _ = writeln!(out, "    STATISTICS_MEAN={}", mean);
            let _ = writeln!(out, "    STATISTICS_MINIMUM={}", min);
            let _ = writeln!(out, "    STATISTICS_STDDEV={}", std);
        }
        if let Some(vp) = b.valid_percent {
            let _ = writeln!(out, "    STATISTICS_VALID_PERCENT={}", vp);
        }
    }

    out
}

/// Plain `gdalinfo` output for a north-up raster.
pub fn info_report(
    filename: &str,
    width: usize,
    height: usize,
    origin: (f64, f64),
    pixel_size: (f64, f64),
) -> String {
    let mut out = String::new();
    header(&mut out, filename, width, height);
    let _ = writeln!(out, "Origin = ({:.15},{:.15})", origin.0, origin.1);
    let _ = writeln!(out, "Pixel Size = ({:.15},{:.15})", pixel_size.0, pixel_size.1);
    metadata_footer(&mut out);
    let _ = writeln!(out, "Band 1 Block={}x1 Type=Int16, ColorInterp=Gray", width);
    let _ = writeln!(out, "  NoData Value={}", MODIS_NODATA);
    out
}

/// Plain `gdalinfo` output with an explicit `GeoTransform =` block.
pub fn info_report_rotated(filename: &str, width: usize, height: usize, gt: [f64; 6]) -> String {
    let mut out = String::new();
    header(&mut out, filename, width, height);
    let _ = writeln!(out, "GeoTransform =");
    let _ = writeln!(out, "  {}, {}, {}", gt[0], gt[1], gt[2]);
    let _ = writeln!(out, "  {}, {}, {}", gt[3], gt[4], gt[5]);
    metadata_footer(&mut out);
    let _ = writeln!(out, "Band 1 Block={}x1 Type=Int16, ColorInterp=Gray", width);
    out
}

/// Plain `gdalinfo` output with size but no usable geometry lines.
pub fn info_report_without_geometry(filename: &str, width: usize, height: usize) -> String {
    let mut out = String::new();
    header(&mut out, filename, width, height);
    metadata_footer(&mut out);
    let _ = writeln!(out, "Band 1 Block={}x1 Type=Int16, ColorInterp=Gray", width);
    out
}

/// AAIGrid text for the given raw rows (row 0 at the top).
pub fn ascii_grid_text(rows: &[Vec<i32>], nodata: i32) -> String {
    let ncols = rows.first().map_or(0, Vec::len);
    let mut out = String::new();
    let _ = writeln!(out, "ncols        {}", ncols);
    let _ = writeln!(out, "nrows        {}", rows.len());
    let _ = writeln!(out, "xllcorner    -74.300000000000");
    let _ = writeln!(out, "yllcorner    40.400000000000");
    let _ = writeln!(out, "cellsize     0.010000000000");
    let _ = writeln!(out, "NODATA_value {}", nodata);
    for row in rows {
        let line: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        let _ = writeln!(out, " {}", line.join(" "));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_report_shape() {
        let report = stats_report(
            "x.tif",
            &[BandFixture::valid(1, 10.0, 100.0), BandFixture::empty(2)],
        );
        assert_eq!(report.matches(" Block=").count(), 2);
        assert_eq!(report.matches("Minimum=").count(), 1);
        assert!(report.contains("STATISTICS_VALID_PERCENT=100"));
    }

    #[test]
    fn test_ascii_grid_text() {
        let text = ascii_grid_text(&[vec![1, 2], vec![3, 4]], MODIS_NODATA);
        assert!(text.contains("ncols        2"));
        assert!(text.contains("nrows        2"));
        assert!(text.ends_with(" 3 4\n"));
    }
}
