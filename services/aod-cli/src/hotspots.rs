//! Cross-file hotspot merging for the `hotspots` command.

use aod_pipeline::Hotspot;
use serde::Serialize;

/// Summary of the merged top-N list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HotspotStatistics {
    pub total_hotspots: usize,
    pub max_aod: f64,
    pub min_aod: f64,
    pub avg_aod: f64,
    pub max_aqi: u32,
    pub min_aqi: u32,
    pub avg_aqi: f64,
    pub processed_files: usize,
    pub total_files: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataRange {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HotspotReport {
    pub success: bool,
    pub region: String,
    pub area: String,
    pub area_id: String,
    pub hotspots: Vec<Hotspot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<HotspotStatistics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_range: Option<DataRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Highest `max` hotspots across files, re-ranked from 1.
pub fn merge_hotspots(mut all: Vec<Hotspot>, max: usize) -> Vec<Hotspot> {
    all.sort_by(|a, b| b.aod.total_cmp(&a.aod));
    all.truncate(max);
    for (i, hotspot) in all.iter_mut().enumerate() {
        hotspot.rank = i + 1;
        hotspot.id = format!("hotspot_{}", i + 1);
    }
    all
}

pub fn statistics(
    hotspots: &[Hotspot],
    processed_files: usize,
    total_files: usize,
) -> Option<HotspotStatistics> {
    if hotspots.is_empty() {
        return None;
    }

    let n = hotspots.len() as f64;
    let aods = hotspots.iter().map(|h| h.aod);
    let aqis = hotspots.iter().map(|h| h.aqi);

    Some(HotspotStatistics {
        total_hotspots: hotspots.len(),
        max_aod: aods.clone().fold(f64::MIN, f64::max),
        min_aod: aods.clone().fold(f64::MAX, f64::min),
        avg_aod: aods.sum::<f64>() / n,
        max_aqi: aqis.clone().max().unwrap_or_default(),
        min_aqi: aqis.clone().min().unwrap_or_default(),
        avg_aqi: aqis.map(f64::from).sum::<f64>() / n,
        processed_files,
        total_files,
    })
}

/// Earliest and latest observation dates among the hotspots.
pub fn data_range(hotspots: &[Hotspot]) -> Option<DataRange> {
    let dates = hotspots.iter().filter_map(|h| h.date.as_deref());
    let start = dates.clone().min()?;
    let end = dates.max()?;
    Some(DataRange {
        start: start.to_string(),
        end: end.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use aod_pipeline::{rank_hotspots, GeoPixel, SamplingConfig};

    fn hotspots(aods: &[f64], date: &str) -> Vec<Hotspot> {
        let pixels: Vec<GeoPixel> = aods
            .iter()
            .map(|&aod| GeoPixel {
                lat: 40.8,
                lng: -73.9,
                aod,
            })
            .collect();
        let mut ranked = rank_hotspots(&pixels, aods.len(), &SamplingConfig::default());
        for h in &mut ranked {
            h.date = Some(date.to_string());
        }
        ranked
    }

    #[test]
    fn test_merge_reranks_across_files() {
        let mut all = hotspots(&[0.9, 0.4], "2025-03-01");
        all.extend(hotspots(&[1.6, 0.5], "2025-03-02"));

        let merged = merge_hotspots(all, 3);
        let aods: Vec<f64> = merged.iter().map(|h| h.aod).collect();
        assert_eq!(aods, vec![1.6, 0.9, 0.5]);
        let ranks: Vec<usize> = merged.iter().map(|h| h.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
        assert_eq!(merged[1].id, "hotspot_2");
    }

    #[test]
    fn test_statistics() {
        let merged = merge_hotspots(hotspots(&[1.0, 0.5], "2025-03-01"), 10);
        let stats = statistics(&merged, 1, 30).unwrap();
        assert_eq!(stats.total_hotspots, 2);
        assert_eq!(stats.max_aod, 1.0);
        assert_eq!(stats.min_aod, 0.5);
        assert_eq!(stats.max_aqi, 150);
        assert_eq!(stats.min_aqi, 100);
        assert_eq!(stats.avg_aqi, 125.0);
        assert!(statistics(&[], 0, 0).is_none());
    }

    #[test]
    fn test_data_range() {
        let mut all = hotspots(&[0.3], "2025-03-05");
        all.extend(hotspots(&[0.9], "2025-03-01"));
        let range = data_range(&all).unwrap();
        assert_eq!(range.start, "2025-03-01");
        assert_eq!(range.end, "2025-03-05");
    }
}
