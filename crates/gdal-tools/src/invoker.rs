//! Child-process execution of `gdalinfo` and `gdal_translate`.
//!
//! Arguments are passed directly to the executable with no shell in between,
//! so filenames are never interpreted. Every invocation is bounded by
//! [`ToolConfig::timeout`]; on expiry the child is killed.

use async_trait::async_trait;
use metrics::counter;
use std::ffi::OsStr;
use std::io::ErrorKind;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, instrument};

use crate::config::{ToolConfig, TranslateOptions};
use crate::error::{ToolError, ToolResult};
use crate::scoped::ScopedGrid;

const GDALINFO: &str = "gdalinfo";
const GDAL_TRANSLATE: &str = "gdal_translate";

/// Version strings reported by the two tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolVersions {
    pub gdalinfo: String,
    pub gdal_translate: String,
}

/// Source of raster metadata and pixel grids.
///
/// [`GdalTools`] is the production implementation; tests substitute canned
/// reports.
#[async_trait]
pub trait RasterSource: Send + Sync {
    /// Check that the tools can be invoked at all.
    async fn probe(&self) -> ToolResult<ToolVersions>;

    /// Plain metadata report (size, origin, pixel size, bands).
    async fn info_report(&self, path: &Path) -> ToolResult<String>;

    /// Metadata report with computed per-band statistics.
    async fn stats_report(&self, path: &Path) -> ToolResult<String>;

    /// One band rendered as ASCII grid text.
    async fn ascii_grid(&self, path: &Path, options: &TranslateOptions) -> ToolResult<String>;
}

/// Runs the GDAL command-line utilities configured in [`ToolConfig`].
#[derive(Debug, Clone)]
pub struct GdalTools {
    config: ToolConfig,
}

impl GdalTools {
    pub fn new(config: ToolConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    async fn run<I, S>(&self, tool: &'static str, exe: &Path, args: I) -> ToolResult<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        counter!("aod_tool_invocations_total", "tool" => tool).increment(1);

        let child = Command::new(exe)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| match source.kind() {
                ErrorKind::NotFound | ErrorKind::PermissionDenied => ToolError::Unavailable {
                    tool,
                    path: exe.to_path_buf(),
                    source,
                },
                _ => ToolError::Spawn { tool, source },
            })?;

        let output = tokio::time::timeout(self.config.timeout, child.wait_with_output())
            .await
            .map_err(|_| ToolError::Timeout {
                tool,
                after: self.config.timeout,
            })??;

        if !output.status.success() {
            return Err(ToolError::Execution {
                tool,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl RasterSource for GdalTools {
    #[instrument(skip(self))]
    async fn probe(&self) -> ToolResult<ToolVersions> {
        let gdalinfo = self
            .run(GDALINFO, &self.config.gdalinfo, ["--version"])
            .await?;
        let gdal_translate = self
            .run(GDAL_TRANSLATE, &self.config.gdal_translate, ["--version"])
            .await?;

        Ok(ToolVersions {
            gdalinfo: gdalinfo.trim().to_string(),
            gdal_translate: gdal_translate.trim().to_string(),
        })
    }

    #[instrument(skip(self), fields(path = %path.display()))]
    async fn info_report(&self, path: &Path) -> ToolResult<String> {
        debug!("Reading raster metadata");
        self.run(GDALINFO, &self.config.gdalinfo, [path.as_os_str()])
            .await
    }

    #[instrument(skip(self), fields(path = %path.display()))]
    async fn stats_report(&self, path: &Path) -> ToolResult<String> {
        debug!("Computing band statistics");
        self.run(
            GDALINFO,
            &self.config.gdalinfo,
            [OsStr::new("-stats"), path.as_os_str()],
        )
        .await
    }

    #[instrument(skip(self, options), fields(path = %path.display(), band = options.band))]
    async fn ascii_grid(&self, path: &Path, options: &TranslateOptions) -> ToolResult<String> {
        // Removed on every exit path, including errors and timeouts.
        let grid = ScopedGrid::beside(path, options.band);

        let mut args: Vec<&OsStr> = Vec::new();
        let option_args = options.args();
        args.extend(option_args.iter().map(OsStr::new));
        args.push(path.as_os_str());
        args.push(grid.path().as_os_str());

        debug!(output = %grid.path().display(), "Translating band to ASCII grid");
        self.run(GDAL_TRANSLATE, &self.config.gdal_translate, args)
            .await?;

        let text = tokio::fs::read_to_string(grid.path()).await?;
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_executable_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let tools = GdalTools::new(ToolConfig::in_dir(dir.path()));

        let err = tokio_test::block_on(tools.probe()).unwrap_err();
        assert!(err.is_unavailable());
        assert!(err.to_string().contains("gdalinfo"));
    }

    #[test]
    fn test_no_grid_left_when_translate_missing() {
        let dir = tempfile::tempdir().unwrap();
        let tif = dir.path().join("MCD19A2.A2025060.tif");
        std::fs::write(&tif, b"").unwrap();
        let tools = GdalTools::new(ToolConfig::in_dir(dir.path().join("bin")));

        let result = tokio_test::block_on(tools.ascii_grid(&tif, &TranslateOptions::default()));
        assert!(result.is_err());

        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }
}
