//! Shared test utilities for the AOD ingestion workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Builders for `gdalinfo` reports and ASCII grids
//! - Raw pixel grid generators
//! - Fake `gdalinfo` / `gdal_translate` executables (Unix)
//! - Workspace path helpers and float assertion macros
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

#[cfg(unix)]
pub mod fake_tools;
pub mod fixtures;
pub mod generators;
pub mod paths;

#[cfg(unix)]
pub use fake_tools::*;
pub use fixtures::*;
pub use generators::*;
pub use paths::*;

/// Macro for approximate floating-point equality assertions.
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// assert_approx_eq!(1.1_f32, 1.0_f32, 0.001_f32);    // fails
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}
