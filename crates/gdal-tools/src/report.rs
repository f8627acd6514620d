//! Raster geometry from the plain `gdalinfo` report.

use aod_common::{GeoTransform, RasterSize};

use crate::error::ParseError;

/// Parse `Size is 1200, 1200`.
pub fn parse_raster_size(report: &str) -> Result<RasterSize, ParseError> {
    let line = report
        .lines()
        .map(str::trim)
        .find(|l| l.starts_with("Size is"))
        .ok_or(ParseError::MissingField("Size is"))?;

    let dims = &line["Size is".len()..];
    let mut parts = dims.split(',').map(str::trim);

    let width = parse_dim(parts.next(), "raster width")?;
    let height = parse_dim(parts.next(), "raster height")?;

    Ok(RasterSize::new(width, height))
}

fn parse_dim(part: Option<&str>, field: &'static str) -> Result<usize, ParseError> {
    let part = part.ok_or(ParseError::MissingField(field))?;
    part.parse().map_err(|_| ParseError::InvalidNumber {
        field,
        value: part.to_string(),
    })
}

/// Parse an explicit six-coefficient block.
///
/// Accepts the multi-line form printed for rotated rasters:
///
/// ```text
/// GeoTransform =
///   -74.3, 0.01, 0
///   41, 0, -0.01
/// ```
///
/// and a single-line `GeoTransform = a, b, c, d, e, f` variant.
pub fn parse_geotransform(report: &str) -> Result<GeoTransform, ParseError> {
    let mut lines = report.lines().map(str::trim);

    let header = lines
        .find(|l| l.starts_with("GeoTransform"))
        .ok_or(ParseError::MissingField("GeoTransform"))?;

    let inline = header
        .split_once('=')
        .map(|(_, rest)| rest.trim())
        .unwrap_or_default();

    let text = if inline.is_empty() {
        lines
            .filter(|l| !l.is_empty())
            .take(2)
            .collect::<Vec<_>>()
            .join(",")
    } else {
        inline.to_string()
    };

    let coeffs = parse_numbers(&text, "GeoTransform")?;
    let coeffs: [f64; 6] = coeffs
        .try_into()
        .map_err(|_| ParseError::InvalidNumber {
            field: "GeoTransform",
            value: text.clone(),
        })?;

    Ok(GeoTransform::from(coeffs))
}

/// Build a north-up transform from `Origin = (x,y)` and `Pixel Size = (w,h)`.
pub fn parse_origin_pixel_size(report: &str) -> Result<GeoTransform, ParseError> {
    let (origin_x, origin_y) = parse_pair(report, "Origin")?;
    let (pixel_width, pixel_height) = parse_pair(report, "Pixel Size")?;

    Ok(GeoTransform::north_up(
        origin_x,
        origin_y,
        pixel_width,
        pixel_height,
    ))
}

fn parse_pair(report: &str, field: &'static str) -> Result<(f64, f64), ParseError> {
    let line = report
        .lines()
        .map(str::trim)
        .find(|l| {
            l.strip_prefix(field)
                .is_some_and(|rest| rest.trim_start().starts_with('='))
        })
        .ok_or(ParseError::MissingField(field))?;

    let value = line
        .split_once('=')
        .map(|(_, v)| v.trim().trim_start_matches('(').trim_end_matches(')'))
        .unwrap_or_default();

    match parse_numbers(value, field)?.as_slice() {
        [a, b] => Ok((*a, *b)),
        _ => Err(ParseError::InvalidNumber {
            field,
            value: value.to_string(),
        }),
    }
}

fn parse_numbers(text: &str, field: &'static str) -> Result<Vec<f64>, ParseError> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f64>().map_err(|_| ParseError::InvalidNumber {
                field,
                value: s.to_string(),
            })
        })
        .collect()
}
