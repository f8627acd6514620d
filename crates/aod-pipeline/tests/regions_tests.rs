//! The shipped region config matches the built-in registry.

use aod_pipeline::RegionRegistry;
use test_utils::workspace_root;

#[test]
fn test_shipped_regions_match_builtin() {
    std::env::remove_var("AOD_DEFAULT_REGION");
    let path = workspace_root().join("config/regions.yaml");

    let loaded = RegionRegistry::from_yaml_file(&path).unwrap();
    assert_eq!(loaded, RegionRegistry::builtin());
}

#[test]
fn test_missing_file_reports_path() {
    let err = RegionRegistry::from_yaml_file("/nonexistent/regions.yaml").unwrap_err();
    assert!(format!("{err:#}").contains("/nonexistent/regions.yaml"));
}
