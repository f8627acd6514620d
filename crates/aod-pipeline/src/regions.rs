//! Coverage regions: fallback geotransforms and named analysis zones.
//!
//! When a raster's own geometry cannot be read, extraction falls back to the
//! transform of the region whose filename patterns match the file's path (or
//! the default region). Regions also carry the quadrant zones callers use to
//! filter hotspots and compute zone averages.
//!
//! Regions load from YAML with `${VAR}` / `${VAR:-default}` substitution
//! outside comment lines:
//!
//! ```yaml
//! default_region: nyc
//! regions:
//!   - id: nyc
//!     name: New York City
//!     filename_patterns: [nyc]
//!     fallback_transform: [-74.3, 0.01, 0.0, 41.0, 0.0, -0.01]
//!     zones:
//!       - id: citywide
//!         name: Citywide Average
//!       - id: northeastern
//!         name: Northeastern
//!         bounds: { north: 41.0, south: 40.7, west: -73.95, east: -73.6 }
//! ```

use anyhow::{Context, Result};
use aod_common::{GeoTransform, ZoneBounds};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// A named area inside a region. `bounds: None` means the whole coverage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub bounds: Option<ZoneBounds>,
}

impl Zone {
    fn bounded(id: &str, name: &str, bounds: ZoneBounds) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            bounds: Some(bounds),
        }
    }

    fn citywide() -> Self {
        Self {
            id: "citywide".to_string(),
            name: "Citywide Average".to_string(),
            bounds: None,
        }
    }

    /// Inclusive containment; unbounded zones contain every point.
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        self.bounds.map_or(true, |b| b.contains(lat, lng))
    }
}

/// One coverage region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: String,
    pub name: String,
    /// Case-insensitive substrings of a file path that select this region.
    #[serde(default)]
    pub filename_patterns: Vec<String>,
    pub fallback_transform: GeoTransform,
    #[serde(default)]
    pub zones: Vec<Zone>,
}

impl Region {
    pub fn zone(&self, id: &str) -> Option<&Zone> {
        self.zones.iter().find(|z| z.id == id)
    }

    /// Union of all bounded zones, if any.
    pub fn extent(&self) -> Option<ZoneBounds> {
        self.zones
            .iter()
            .filter_map(|z| z.bounds)
            .reduce(|acc, b| acc.union(&b))
    }

    fn matches(&self, path: &str) -> bool {
        self.filename_patterns
            .iter()
            .any(|p| !p.is_empty() && path.contains(&p.to_lowercase()))
    }
}

/// Ordered region list plus the region used when no pattern matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRegistry {
    pub default_region: String,
    pub regions: Vec<Region>,
}

impl Default for RegionRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl RegionRegistry {
    /// New York City (default) and Mumbai with 0.01 degree fallback grids.
    pub fn builtin() -> Self {
        let quadrants = |n: f64, mid_lat: f64, s: f64, w: f64, mid_lng: f64, e: f64| {
            vec![
                Zone::citywide(),
                Zone::bounded(
                    "northeastern",
                    "Northeastern",
                    ZoneBounds::new(n, mid_lat, mid_lng, e),
                ),
                Zone::bounded(
                    "northwestern",
                    "Northwestern",
                    ZoneBounds::new(n, mid_lat, w, mid_lng),
                ),
                Zone::bounded(
                    "southeastern",
                    "Southeastern",
                    ZoneBounds::new(mid_lat, s, mid_lng, e),
                ),
                Zone::bounded(
                    "southwestern",
                    "Southwestern",
                    ZoneBounds::new(mid_lat, s, w, mid_lng),
                ),
            ]
        };

        Self {
            default_region: "nyc".to_string(),
            regions: vec![
                Region {
                    id: "nyc".to_string(),
                    name: "New York City".to_string(),
                    filename_patterns: vec!["nyc".to_string(), "new_york".to_string()],
                    fallback_transform: GeoTransform::north_up(-74.3, 41.0, 0.01, -0.01),
                    zones: quadrants(41.0, 40.7, 40.4, -74.3, -73.95, -73.6),
                },
                Region {
                    id: "mumbai".to_string(),
                    name: "Mumbai".to_string(),
                    filename_patterns: vec!["mumbai".to_string()],
                    fallback_transform: GeoTransform::north_up(72.75, 19.30, 0.01, -0.01),
                    zones: quadrants(19.30, 19.05, 18.80, 72.75, 72.925, 73.10),
                },
            ],
        }
    }

    /// Load and validate a YAML registry, expanding environment variables first.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read region config from {:?}", path))?;
        Self::from_yaml_str(&content)
            .with_context(|| format!("Invalid region config in {:?}", path))
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let expanded = expand_env(content)
            .with_context(|| "Failed to expand environment variables in region config")?;
        let registry: RegionRegistry = serde_yaml::from_str(&expanded)
            .with_context(|| "Failed to parse region config YAML")?;
        registry.validate()?;
        Ok(registry)
    }

    fn validate(&self) -> Result<()> {
        anyhow::ensure!(!self.regions.is_empty(), "At least one region is required");

        let mut seen = HashSet::new();
        for region in &self.regions {
            anyhow::ensure!(
                seen.insert(region.id.as_str()),
                "Duplicate region id '{}'",
                region.id
            );
            let gt = region.fallback_transform;
            anyhow::ensure!(
                gt.pixel_width != 0.0 && gt.pixel_height != 0.0,
                "Region '{}' fallback transform has a zero pixel size",
                region.id
            );
        }

        anyhow::ensure!(
            self.get(&self.default_region).is_some(),
            "Default region '{}' is not defined",
            self.default_region
        );
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.id == id)
    }

    pub fn default_region(&self) -> Option<&Region> {
        self.get(&self.default_region)
    }

    /// Region whose patterns match `path`, else the default region.
    pub fn fallback_for(&self, path: &Path) -> Option<&Region> {
        let haystack = path.to_string_lossy().to_lowercase();
        self.regions
            .iter()
            .find(|r| r.matches(&haystack))
            .or_else(|| self.default_region())
    }

    /// A region's zone by id.
    pub fn zone(&self, region: &str, zone: &str) -> Option<&Zone> {
        self.get(region)?.zone(zone)
    }
}

/// Substitute environment variables line by line. Full-line comments are left as written.
fn expand_env(content: &str) -> Result<String, shellexpand::LookupError<std::env::VarError>> {
    let lines = content
        .lines()
        .map(|line| {
            if line.trim_start().starts_with('#') {
                Ok(Cow::Borrowed(line))
            } else {
                shellexpand::env(line)
            }
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comments_not_expanded() {
        std::env::remove_var("AOD_TEST_UNSET_VAR");
        let yaml = "\
# ${AOD_TEST_UNSET_VAR} would fail if expanded here
default_region: ${AOD_TEST_UNSET_REGION:-nyc}
regions:
  - id: nyc
    name: New York City
    filename_patterns: [nyc]
    fallback_transform: [-74.3, 0.01, 0.0, 41.0, 0.0, -0.01]
    zones:
      - id: citywide
        name: Citywide Average
";
        let registry = RegionRegistry::from_yaml_str(yaml).unwrap();
        assert_eq!(registry.default_region, "nyc");
    }

    #[test]
    fn test_unset_variable_outside_comment_fails() {
        std::env::remove_var("AOD_TEST_UNSET_VAR");
        let yaml = "default_region: ${AOD_TEST_UNSET_VAR}\nregions: []\n";
        assert!(RegionRegistry::from_yaml_str(yaml).is_err());
    }

    #[test]
    fn test_builtin_quadrants() {
        let registry = RegionRegistry::builtin();
        assert_eq!(registry.default_region, "nyc");

        let ne = registry.zone("nyc", "northeastern").unwrap().bounds.unwrap();
        assert_eq!(ne, ZoneBounds::new(41.0, 40.7, -73.95, -73.6));

        let sw = registry.zone("mumbai", "southwestern").unwrap().bounds.unwrap();
        assert_eq!(sw, ZoneBounds::new(19.05, 18.80, 72.75, 72.925));

        assert!(registry.zone("nyc", "citywide").unwrap().bounds.is_none());
        assert!(registry.zone("nyc", "downtown").is_none());
    }

    #[test]
    fn test_extent_covers_quadrants() {
        let registry = RegionRegistry::builtin();
        let extent = registry.get("mumbai").unwrap().extent().unwrap();
        assert_eq!(extent, ZoneBounds::new(19.30, 18.80, 72.75, 73.10));
    }

    #[test]
    fn test_fallback_selection() {
        let registry = RegionRegistry::builtin();

        let mumbai = registry
            .fallback_for(Path::new("/data/Mumbai/MCD19A2/MCD19A2.A2025060.tif"))
            .unwrap();
        assert_eq!(mumbai.id, "mumbai");

        let unknown = registry
            .fallback_for(Path::new("/data/other/MCD19A2.A2025060.tif"))
            .unwrap();
        assert_eq!(unknown.id, "nyc");
    }

    #[test]
    fn test_yaml_with_env_default() {
        std::env::remove_var("AOD_TEST_NONEXISTENT_REGION");
        let yaml = r#"
default_region: ${AOD_TEST_NONEXISTENT_REGION:-delhi}
regions:
  - id: delhi
    name: Delhi
    filename_patterns: [delhi]
    fallback_transform: [76.8, 0.01, 0.0, 28.9, 0.0, -0.01]
    zones:
      - id: citywide
        name: Citywide Average
      - id: central
        name: Central
        bounds: { north: 28.7, south: 28.5, west: 77.1, east: 77.3 }
"#;
        let registry = RegionRegistry::from_yaml_str(yaml).unwrap();
        assert_eq!(registry.default_region, "delhi");

        let region = registry.get("delhi").unwrap();
        assert_eq!(region.fallback_transform.origin_x, 76.8);
        assert_eq!(region.fallback_transform.pixel_height, -0.01);
        assert!(region.zone("central").unwrap().contains(28.6, 77.2));
    }

    #[test]
    fn test_yaml_rejects_unknown_default() {
        let yaml = r#"
default_region: paris
regions:
  - id: nyc
    name: New York City
    fallback_transform: [-74.3, 0.01, 0.0, 41.0, 0.0, -0.01]
"#;
        let err = RegionRegistry::from_yaml_str(yaml).unwrap_err();
        assert!(err.to_string().contains("paris"));
    }

    #[test]
    fn test_yaml_rejects_duplicate_ids() {
        let yaml = r#"
default_region: nyc
regions:
  - id: nyc
    name: A
    fallback_transform: [-74.3, 0.01, 0.0, 41.0, 0.0, -0.01]
  - id: nyc
    name: B
    fallback_transform: [-74.3, 0.01, 0.0, 41.0, 0.0, -0.01]
"#;
        assert!(RegionRegistry::from_yaml_str(yaml).is_err());
    }

    #[test]
    fn test_unbounded_zone_contains_everything() {
        let zone = Zone::citywide();
        assert!(zone.contains(-89.0, 179.0));
    }
}
