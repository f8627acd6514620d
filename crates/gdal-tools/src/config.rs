//! Tool locations and translation parameters.
//!
//! Paths are resolved once, either from the compiled-in per-OS default
//! directory or from environment overrides, and then injected into
//! [`GdalTools`](crate::GdalTools).

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Default GDAL binary directory on Windows (conda environment).
pub const WINDOWS_GDAL_DIR: &str = r"C:\ProgramData\miniconda3\envs\gdal\Library\bin";

/// Default GDAL binary directory elsewhere.
pub const UNIX_GDAL_DIR: &str = "/usr/bin";

/// Default bound on a single tool invocation.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// MODIS MCD19A2 fill value for the AOD layers.
pub const DEFAULT_NODATA: i32 = -28672;

/// Raw value range passed to `gdal_translate -scale`.
pub const DEFAULT_SCALE_RANGE: (i32, i32) = (0, 6000);

/// Where to find `gdalinfo` and `gdal_translate`, and how long to wait for them.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolConfig {
    pub gdalinfo: PathBuf,
    pub gdal_translate: PathBuf,
    pub timeout: Duration,
}

impl ToolConfig {
    /// Tools inside `dir`, with the platform executable suffix.
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        let suffix = env::consts::EXE_SUFFIX;
        Self {
            gdalinfo: dir.join(format!("gdalinfo{}", suffix)),
            gdal_translate: dir.join(format!("gdal_translate{}", suffix)),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Compiled-in default for the host operating system.
    pub fn for_host() -> Self {
        if cfg!(windows) {
            Self::in_dir(WINDOWS_GDAL_DIR)
        } else {
            Self::in_dir(UNIX_GDAL_DIR)
        }
    }

    /// Host defaults overlaid with environment variables:
    /// `GDAL_BIN_DIR`, `GDALINFO_PATH`, `GDAL_TRANSLATE_PATH`, `GDAL_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        let mut config = match env::var("GDAL_BIN_DIR") {
            Ok(dir) if !dir.is_empty() => Self::in_dir(dir),
            _ => Self::for_host(),
        };

        if let Ok(path) = env::var("GDALINFO_PATH") {
            config.gdalinfo = PathBuf::from(path);
        }
        if let Ok(path) = env::var("GDAL_TRANSLATE_PATH") {
            config.gdal_translate = PathBuf::from(path);
        }
        if let Ok(secs) = env::var("GDAL_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout = Duration::from_secs(secs),
                _ => warn!(value = %secs, "Ignoring invalid GDAL_TIMEOUT_SECS"),
            }
        }

        config
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self::for_host()
    }
}

/// Parameters for extracting one band as an ASCII grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TranslateOptions {
    /// 1-based band index
    pub band: u32,
    /// Source and destination range for `-scale`
    pub scale_range: (i32, i32),
    /// Value declared with `-a_nodata`
    pub nodata: i32,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        Self {
            band: 1,
            scale_range: DEFAULT_SCALE_RANGE,
            nodata: DEFAULT_NODATA,
        }
    }
}

impl TranslateOptions {
    /// Argument list for `gdal_translate`, excluding source and destination.
    pub fn args(&self) -> Vec<String> {
        let (lo, hi) = self.scale_range;
        vec![
            "-of".to_string(),
            "AAIGrid".to_string(),
            "-b".to_string(),
            self.band.to_string(),
            "-scale".to_string(),
            lo.to_string(),
            hi.to_string(),
            lo.to_string(),
            hi.to_string(),
            "-a_nodata".to_string(),
            self.nodata.to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_dir_suffix() {
        let config = ToolConfig::in_dir("/opt/gdal/bin");
        let suffix = env::consts::EXE_SUFFIX;
        assert_eq!(
            config.gdalinfo,
            Path::new("/opt/gdal/bin").join(format!("gdalinfo{}", suffix))
        );
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_translate_args() {
        let args = TranslateOptions::default().args();
        assert_eq!(
            args,
            vec![
                "-of", "AAIGrid", "-b", "1", "-scale", "0", "6000", "0", "6000", "-a_nodata",
                "-28672"
            ]
        );
    }

    #[test]
    fn test_with_timeout() {
        let config = ToolConfig::in_dir("/x").with_timeout(Duration::from_millis(5));
        assert_eq!(config.timeout, Duration::from_millis(5));
    }
}
