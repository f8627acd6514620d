//! Tests for ZoneBounds parsing and containment.

use aod_common::bbox::{BboxParseError, ZoneBounds};

// ============================================================================
// Parsing
// ============================================================================

#[test]
fn test_parse_zone_with_spaces() {
    let zone = ZoneBounds::from_csv(" 19.30, 19.05 , 72.925,73.10 ").unwrap();
    assert_eq!(zone.north, 19.30);
    assert_eq!(zone.south, 19.05);
    assert_eq!(zone.west, 72.925);
    assert_eq!(zone.east, 73.10);
}

#[test]
fn test_parse_zone_too_few() {
    let result = ZoneBounds::from_csv("41.0,40.7,-73.95");
    assert!(matches!(result, Err(BboxParseError::InvalidFormat(_))));
}

#[test]
fn test_parse_zone_bad_number() {
    let result = ZoneBounds::from_csv("41.0,abc,-73.95,-73.6");
    assert!(matches!(result, Err(BboxParseError::InvalidNumber(ref s)) if s == "abc"));
}

#[test]
fn test_parse_zone_inverted() {
    let result = ZoneBounds::from_csv("40.0,41.0,-73.95,-73.6");
    assert!(matches!(result, Err(BboxParseError::Inverted(_))));
}

// ============================================================================
// Containment
// ============================================================================

#[test]
fn test_degenerate_zone_contains_only_its_point() {
    let zone = ZoneBounds::new(1.0, 1.0, 2.0, 2.0);
    assert!(zone.contains(1.0, 2.0));
    assert!(!zone.contains(1.0, 2.0001));
    assert!(!zone.contains(1.0001, 2.0));
}

#[test]
fn test_nyc_quadrants_share_edges() {
    let ne = ZoneBounds::new(41.0, 40.7, -73.95, -73.6);
    let nw = ZoneBounds::new(41.0, 40.7, -74.3, -73.95);

    // Points on the shared meridian belong to both quadrants.
    assert!(ne.contains(40.8, -73.95));
    assert!(nw.contains(40.8, -73.95));
}

#[test]
fn test_serde_field_names() {
    let zone = ZoneBounds::new(41.0, 40.7, -74.3, -73.6);
    let json = serde_json::to_value(zone).unwrap();
    assert_eq!(json["north"], 41.0);
    assert_eq!(json["west"], -74.3);
}
