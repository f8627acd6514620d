//! Arc/Info ASCII grid (AAIGrid) reader.
//!
//! `gdal_translate -of AAIGrid` writes a short `key value` header followed by
//! one whitespace-separated line per raster row:
//!
//! ```text
//! ncols        4
//! nrows        2
//! xllcorner    -74.3
//! yllcorner    40.98
//! cellsize     0.01
//! NODATA_value -28672
//!  120 130 -28672 90
//!  80 70 60 50
//! ```

use crate::error::ParseError;

/// A parsed ASCII grid, row-major with row 0 at the top.
#[derive(Debug, Clone, PartialEq)]
pub struct AsciiGrid {
    pub ncols: usize,
    pub nrows: usize,
    pub nodata: Option<f64>,
    rows: Vec<Vec<f64>>,
}

impl AsciiGrid {
    /// Parse grid text. Header lines are read until the first line whose
    /// leading token is numeric; everything from there on is data.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let mut ncols = None;
        let mut nrows = None;
        let mut nodata = None;
        let mut rows = Vec::new();
        let mut in_data = false;

        for line in text.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            if !in_data {
                let mut tokens = trimmed.split_whitespace();
                let key = tokens.next().unwrap_or_default();
                if key.parse::<f64>().is_err() {
                    let value = tokens.next().unwrap_or_default();
                    match key.to_ascii_lowercase().as_str() {
                        "ncols" => ncols = Some(parse_header(value, "ncols")?),
                        "nrows" => nrows = Some(parse_header(value, "nrows")?),
                        "nodata_value" => nodata = value.parse::<f64>().ok(),
                        _ => {}
                    }
                    continue;
                }
                in_data = true;
            }

            // Unparseable cells become NaN and are rejected downstream.
            let row: Vec<f64> = trimmed
                .split_whitespace()
                .map(|v| v.parse().unwrap_or(f64::NAN))
                .collect();
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(ParseError::EmptyGrid);
        }

        let nrows = nrows.unwrap_or(rows.len()).min(rows.len());
        let ncols = ncols.unwrap_or_else(|| rows[0].len());
        rows.truncate(nrows);

        Ok(Self {
            ncols,
            nrows,
            nodata,
            rows,
        })
    }

    /// Cell value, or `None` outside the grid or past a short row.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if col >= self.ncols {
            return None;
        }
        self.rows.get(row)?.get(col).copied()
    }

    /// Iterate `(row, col, value)` over every `stride`-th row and column.
    pub fn sampled(&self, stride: usize) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        let stride = stride.max(1);
        (0..self.nrows).step_by(stride).flat_map(move |row| {
            (0..self.ncols)
                .step_by(stride)
                .filter_map(move |col| self.get(row, col).map(|v| (row, col, v)))
        })
    }

    pub fn is_nodata(&self, value: f64) -> bool {
        self.nodata.is_some_and(|nd| nd == value)
    }
}

fn parse_header(value: &str, field: &'static str) -> Result<usize, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRID: &str = "\
ncols        4
nrows        2
xllcorner    -74.3
yllcorner    40.98
cellsize     0.01
NODATA_value -28672
 120 130 -28672 90
 80 70 60 50
";

    #[test]
    fn test_parse_header_and_rows() {
        let grid = AsciiGrid::parse(GRID).unwrap();
        assert_eq!(grid.ncols, 4);
        assert_eq!(grid.nrows, 2);
        assert_eq!(grid.nodata, Some(-28672.0));
        assert_eq!(grid.get(0, 1), Some(130.0));
        assert_eq!(grid.get(1, 3), Some(50.0));
        assert_eq!(grid.get(2, 0), None);
        assert!(grid.is_nodata(grid.get(0, 2).unwrap()));
    }

    #[test]
    fn test_sampled_stride() {
        let grid = AsciiGrid::parse(GRID).unwrap();
        let cells: Vec<_> = grid.sampled(2).collect();
        assert_eq!(cells, vec![(0, 0, 120.0), (0, 2, -28672.0)]);

        assert_eq!(grid.sampled(1).count(), 8);
        assert_eq!(grid.sampled(0).count(), 8);
    }

    #[test]
    fn test_header_less_grid() {
        let grid = AsciiGrid::parse("1 2 3\n4 5 6\n").unwrap();
        assert_eq!((grid.ncols, grid.nrows), (3, 2));
        assert_eq!(grid.nodata, None);
    }

    #[test]
    fn test_empty_grid() {
        assert_eq!(
            AsciiGrid::parse("ncols 4\nnrows 2\n"),
            Err(ParseError::EmptyGrid)
        );
    }

    #[test]
    fn test_bad_header_value() {
        assert!(matches!(
            AsciiGrid::parse("ncols four\n1 2\n"),
            Err(ParseError::InvalidNumber { field: "ncols", .. })
        ));
    }

    #[test]
    fn test_garbage_cell_is_nan() {
        let grid = AsciiGrid::parse("ncols 2\nnrows 1\n1 x\n").unwrap();
        assert!(grid.get(0, 1).unwrap().is_nan());
    }
}
