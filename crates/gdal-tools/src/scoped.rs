//! Scoped intermediate files written beside the source raster.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

static COUNTER: AtomicU64 = AtomicU64::new(0);

/// An ASCII grid path that is removed, together with the `.prj` and
/// `.aux.xml` sidecars GDAL writes next to it, when the guard drops.
#[derive(Debug)]
pub struct ScopedGrid {
    path: PathBuf,
}

impl ScopedGrid {
    /// Reserve a unique name next to `source`:
    /// `{stem}.b{band}.{pid}.{counter}.asc`.
    ///
    /// Process ID plus a process-wide counter keep concurrent extractions of
    /// the same file from colliding.
    pub fn beside(source: &Path, band: u32) -> Self {
        let dir = source.parent().unwrap_or_else(|| Path::new("."));
        let stem = source
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("raster");
        let count = COUNTER.fetch_add(1, Ordering::Relaxed);
        let name = format!("{}.b{}.{}.{}.asc", stem, band, std::process::id(), count);

        Self {
            path: dir.join(name),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn sidecars(&self) -> [PathBuf; 3] {
        let mut aux = self.path.clone().into_os_string();
        aux.push(".aux.xml");
        [
            self.path.clone(),
            self.path.with_extension("prj"),
            PathBuf::from(aux),
        ]
    }
}

// Drop cannot await, so the unlinks block. At most three small files.
impl Drop for ScopedGrid {
    fn drop(&mut self) {
        for path in self.sidecars() {
            match std::fs::remove_file(&path) {
                Ok(()) => debug!(path = %path.display(), "Removed intermediate file"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to remove intermediate file"
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_unique_and_beside_source() {
        let source = Path::new("/data/nyc/MCD19A2.A2025060.tif");
        let a = ScopedGrid::beside(source, 1);
        let b = ScopedGrid::beside(source, 1);

        assert_ne!(a.path(), b.path());
        assert_eq!(a.path().parent(), source.parent());

        let name = a.path().file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("MCD19A2.A2025060.b1."));
        assert!(name.ends_with(".asc"));
    }

    #[test]
    fn test_drop_removes_grid_and_sidecars() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("A2025060.tif");

        let guard = ScopedGrid::beside(&source, 1);
        let paths = guard.sidecars();
        for p in &paths {
            std::fs::write(p, b"x").unwrap();
        }

        drop(guard);

        for p in &paths {
            assert!(!p.exists(), "{} should be removed", p.display());
        }
    }

    #[test]
    fn test_drop_without_files_is_quiet() {
        let dir = tempfile::tempdir().unwrap();
        let guard = ScopedGrid::beside(&dir.path().join("x.tif"), 2);
        drop(guard);
    }
}
