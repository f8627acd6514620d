//! Directory discovery and batch result assembly.

use aod_common::RasterFile;
use serde::Serialize;
use std::path::Path;

use crate::aggregate::FileAodResult;
use crate::error::{PipelineError, Result};
use crate::pixels::PixelFileResult;

/// A per-file result that lands in either the data or the error bucket.
pub trait FileOutcome {
    fn is_success(&self) -> bool;
}

impl FileOutcome for FileAodResult {
    fn is_success(&self) -> bool {
        self.has_valid_data
    }
}

impl FileOutcome for PixelFileResult {
    fn is_success(&self) -> bool {
        self.success
    }
}

/// Directory-level aggregate.
///
/// `valid_files + error_files == total_files`. `errors` holds only a sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult<T> {
    /// False when every file failed.
    pub success: bool,
    pub total_files: usize,
    pub valid_files: usize,
    pub error_files: usize,
    pub data: Vec<T>,
    pub errors: Vec<T>,
}

impl<T: FileOutcome> BatchResult<T> {
    /// Split ordered per-file results into buckets, keeping their order.
    pub fn assemble(results: Vec<T>, error_sample: usize) -> Self {
        let total_files = results.len();
        let (data, errors): (Vec<T>, Vec<T>) = results.into_iter().partition(T::is_success);
        let error_files = errors.len();

        Self {
            success: !data.is_empty(),
            total_files,
            valid_files: data.len(),
            error_files,
            data,
            errors: errors.into_iter().take(error_sample).collect(),
        }
    }

    /// Every discovered file failed.
    pub fn all_failed(&self) -> bool {
        self.valid_files == 0
    }
}

/// List `.tif` files in `dir`, sorted by name.
///
/// Filenames embed zero-padded dates, so name order is chronological order.
pub async fn discover_rasters(dir: &Path) -> Result<Vec<RasterFile>> {
    let unreadable = |source| PipelineError::DirectoryUnreadable {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = tokio::fs::read_dir(dir).await.map_err(unreadable)?;
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(unreadable)? {
        if let Some(name) = entry.file_name().to_str() {
            if RasterFile::is_tif_name(name) {
                names.push(name.to_string());
            }
        }
    }

    if names.is_empty() {
        return Err(PipelineError::NoRasterFiles(dir.to_path_buf()));
    }

    names.sort();
    Ok(names
        .into_iter()
        .map(|name| RasterFile::new(dir.join(name)))
        .collect())
}
