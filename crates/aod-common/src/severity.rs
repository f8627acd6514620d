//! Hotspot severity classes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a single high-AOD point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Moderate,
    High,
    Critical,
}

impl Severity {
    /// `critical` above 1.5, `high` above 1.0, otherwise `moderate`.
    pub fn from_aod(aod: f64) -> Self {
        if aod > 1.5 {
            Severity::Critical
        } else if aod > 1.0 {
            Severity::High
        } else {
            Severity::Moderate
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Moderate => "moderate",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
