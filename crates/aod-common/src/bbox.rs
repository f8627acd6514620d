//! Rectangular zone bounds in geographic coordinates.

use serde::{Deserialize, Serialize};

/// A latitude/longitude rectangle used to restrict spatial aggregation.
///
/// All four edges are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneBounds {
    pub north: f64,
    pub south: f64,
    pub west: f64,
    pub east: f64,
}

impl ZoneBounds {
    /// Create a new zone from its four edges.
    pub fn new(north: f64, south: f64, west: f64, east: f64) -> Self {
        Self {
            north,
            south,
            west,
            east,
        }
    }

    /// Parse a zone string: "north,south,west,east"
    pub fn from_csv(s: &str) -> Result<Self, BboxParseError> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(BboxParseError::InvalidFormat(s.to_string()));
        }

        let parse = |p: &str| {
            p.parse::<f64>()
                .map_err(|_| BboxParseError::InvalidNumber(p.to_string()))
        };

        let bounds = Self {
            north: parse(parts[0])?,
            south: parse(parts[1])?,
            west: parse(parts[2])?,
            east: parse(parts[3])?,
        };

        if bounds.south > bounds.north || bounds.west > bounds.east {
            return Err(BboxParseError::Inverted(s.to_string()));
        }

        Ok(bounds)
    }

    /// Check if a point lies inside the zone, edges included.
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        lat >= self.south && lat <= self.north && lng >= self.west && lng <= self.east
    }

    /// Smallest zone covering both.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            north: self.north.max(other.north),
            south: self.south.min(other.south),
            west: self.west.min(other.west),
            east: self.east.max(other.east),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BboxParseError {
    #[error("Invalid zone format: {0}. Expected 'north,south,west,east'")]
    InvalidFormat(String),

    #[error("Invalid number in zone: {0}")]
    InvalidNumber(String),

    #[error("Zone edges are inverted: {0}")]
    Inverted(String),
}
