//! Band statistics from `gdalinfo -stats` output.
//!
//! The report is semi-structured text. Each band section opens with a
//! `Band N Block=WxH ...` header and contains labeled lines:
//!
//! ```text
//! Band 1 Block=1200x1 Type=Int16, ColorInterp=Gray
//!   Minimum=-100.000, Maximum=1466.000, Mean=182.624, StdDev=97.345
//!   NoData Value=-28672
//!   Offset: 0,   Scale:0.001
//!   Metadata:
//!     STATISTICS_VALID_PERCENT=87.21
//! ```
//!
//! Missing lines leave their fields at the defaults rather than failing the
//! parse. A band without a statistics line is still reported, with
//! `has_valid_data = false`.

use serde::{Deserialize, Serialize};

/// Summary of one spectral band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BandStatistics {
    /// 1-based band index
    pub band: u32,
    /// Set when the tool reported computed statistics for this band
    pub has_valid_data: bool,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub mean: Option<f64>,
    pub stddev: Option<f64>,
    /// Percentage of pixels that are not nodata (0-100)
    pub valid_percent: f64,
    #[serde(rename = "noDataValue")]
    pub nodata: Option<f64>,
    pub scale: f64,
    pub offset: f64,
}

impl BandStatistics {
    pub fn new(band: u32) -> Self {
        Self {
            band,
            has_valid_data: false,
            minimum: None,
            maximum: None,
            mean: None,
            stddev: None,
            valid_percent: 0.0,
            nodata: None,
            scale: 1.0,
            offset: 0.0,
        }
    }

    /// Mean converted to physical units: `mean * scale + offset`.
    pub fn scaled_mean(&self) -> Option<f64> {
        self.mean.map(|m| m * self.scale + self.offset)
    }

    /// Eligible for aggregation.
    pub fn is_usable(&self) -> bool {
        self.has_valid_data && self.valid_percent > 0.0
    }
}

/// The four summary statistics from one `Minimum=..., StdDev=...` line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryStats {
    pub minimum: f64,
    pub maximum: f64,
    pub mean: f64,
    pub stddev: f64,
}

/// Classification of a single report line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReportLine {
    /// `Band N Block=...` opens a section
    BandHeader(u32),
    /// A `Band ...` line without a block marker closes the current section
    SectionBreak,
    NoData(f64),
    OffsetScale {
        offset: Option<f64>,
        scale: Option<f64>,
    },
    Statistics(SummaryStats),
    ValidPercent(f64),
    Other,
}

impl ReportLine {
    /// Classify one line of the report. Leading and trailing whitespace is ignored.
    pub fn classify(line: &str) -> Self {
        let line = line.trim();

        if let Some(rest) = line.strip_prefix("Band ") {
            if line.contains("Block=") {
                let index = rest.split_whitespace().next().and_then(|n| n.parse().ok());
                return match index {
                    Some(n) => ReportLine::BandHeader(n),
                    None => ReportLine::SectionBreak,
                };
            }
            return ReportLine::SectionBreak;
        }

        if line.contains("NoData Value=") {
            if let Some(v) = number_after(line, "NoData Value=") {
                return ReportLine::NoData(v);
            }
        }

        if line.contains("Offset:") && line.contains("Scale:") {
            return ReportLine::OffsetScale {
                offset: number_after(line, "Offset:"),
                scale: number_after(line, "Scale:"),
            };
        }

        if let Some(stats) = parse_summary_stats(line) {
            return ReportLine::Statistics(stats);
        }

        if let Some(v) = number_after(line, "STATISTICS_VALID_PERCENT=") {
            return ReportLine::ValidPercent(v);
        }

        ReportLine::Other
    }
}

#[derive(Debug)]
enum ParserState {
    Outside,
    InBand(BandStatistics),
}

/// Parse every band section in report order.
pub fn parse_band_statistics(report: &str) -> Vec<BandStatistics> {
    let mut bands = Vec::new();
    let mut state = ParserState::Outside;

    for line in report.lines() {
        let classified = ReportLine::classify(line);

        state = match (state, classified) {
            (ParserState::InBand(band), ReportLine::BandHeader(n)) => {
                bands.push(band);
                ParserState::InBand(BandStatistics::new(n))
            }
            (ParserState::Outside, ReportLine::BandHeader(n)) => {
                ParserState::InBand(BandStatistics::new(n))
            }
            (ParserState::InBand(band), ReportLine::SectionBreak) => {
                bands.push(band);
                ParserState::Outside
            }
            (ParserState::InBand(mut band), line) => {
                apply_line(&mut band, line);
                ParserState::InBand(band)
            }
            (ParserState::Outside, _) => ParserState::Outside,
        };
    }

    if let ParserState::InBand(band) = state {
        bands.push(band);
    }

    bands
}

fn apply_line(band: &mut BandStatistics, line: ReportLine) {
    match line {
        ReportLine::NoData(v) => band.nodata = Some(v),
        ReportLine::OffsetScale { offset, scale } => {
            if let Some(o) = offset {
                band.offset = o;
            }
            if let Some(s) = scale {
                band.scale = s;
            }
        }
        ReportLine::Statistics(stats) => {
            band.has_valid_data = true;
            band.minimum = Some(stats.minimum);
            band.maximum = Some(stats.maximum);
            band.mean = Some(stats.mean);
            band.stddev = Some(stats.stddev);
        }
        ReportLine::ValidPercent(v) => band.valid_percent = v,
        ReportLine::BandHeader(_) | ReportLine::SectionBreak | ReportLine::Other => {}
    }
}

fn parse_summary_stats(line: &str) -> Option<SummaryStats> {
    if !line.starts_with("Minimum=") {
        return None;
    }
    Some(SummaryStats {
        minimum: number_after(line, "Minimum=")?,
        maximum: number_after(line, "Maximum=")?,
        mean: number_after(line, "Mean=")?,
        stddev: number_after(line, "StdDev=")?,
    })
}

/// Parse the number that immediately follows `label`, skipping blanks.
pub(crate) fn number_after(line: &str, label: &str) -> Option<f64> {
    let start = line.find(label)? + label.len();
    let rest = line[start..].trim_start();
    let end = rest
        .char_indices()
        .find(|&(i, c)| {
            !(c.is_ascii_digit()
                || c == '.'
                || ((c == '-' || c == '+') && (i == 0 || rest[..i].ends_with(&['e', 'E'][..])))
                || ((c == 'e' || c == 'E') && i > 0))
        })
        .map_or(rest.len(), |(i, _)| i);
    rest[..end].parse().ok()
}
