//! Fake `gdalinfo` and `gdal_translate` executables for process-level tests.
//!
//! The scripts serve canned output keyed by the source file's basename, so
//! tests can exercise the real child-process path (exit codes, stderr,
//! timeouts, intermediate file cleanup) without GDAL installed.
//!
//! Only available on Unix, where `/bin/sh` runs the scripts.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const VERSION: &str = "GDAL 3.8.4, released 2024/02/08";

/// A scratch directory holding the two fake tools and their canned responses.
pub struct FakeGdal {
    root: TempDir,
}

impl FakeGdal {
    pub fn new() -> Self {
        let root = tempfile::Builder::new()
            .prefix("fake_gdal_")
            .tempdir()
            .expect("Failed to create fake tool directory");

        for sub in ["bin", "info", "stats", "grids", "fail"] {
            fs::create_dir_all(root.path().join(sub)).expect("Failed to create fake tool layout");
        }

        let fake = Self { root };
        fake.write_script("gdalinfo", &fake.gdalinfo_script());
        fake.write_script("gdal_translate", &fake.translate_script());
        fake
    }

    pub fn gdalinfo(&self) -> PathBuf {
        self.root.path().join("bin/gdalinfo")
    }

    pub fn gdal_translate(&self) -> PathBuf {
        self.root.path().join("bin/gdal_translate")
    }

    /// Output of `gdalinfo <file>`.
    pub fn set_info_report(&self, filename: &str, report: &str) {
        self.put("info", filename, report);
    }

    /// Output of `gdalinfo -stats <file>`.
    pub fn set_stats_report(&self, filename: &str, report: &str) {
        self.put("stats", filename, report);
    }

    /// Grid text `gdal_translate` writes for `<file>`.
    pub fn set_grid(&self, filename: &str, grid: &str) {
        self.put("grids", filename, grid);
    }

    /// Make `gdal_translate` print `stderr` and exit 1 for `<file>`.
    pub fn set_translate_failure(&self, filename: &str, stderr: &str) {
        self.put("fail", filename, stderr);
    }

    /// Make every invocation of `tool` sleep this long before answering.
    pub fn set_delay_secs(&self, tool: &str, secs: u64) {
        fs::write(self.root.path().join(format!("delay.{tool}")), secs.to_string())
            .expect("Failed to write delay");
    }

    /// One line per invocation: `<tool> <args...>`.
    pub fn invocations(&self) -> Vec<String> {
        fs::read_to_string(self.root.path().join("calls.log"))
            .map(|s| s.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    fn put(&self, kind: &str, filename: &str, content: &str) {
        fs::write(self.root.path().join(kind).join(filename), content)
            .expect("Failed to write canned response");
    }

    fn write_script(&self, name: &str, body: &str) {
        let path = self.root.path().join("bin").join(name);
        fs::write(&path, body).expect("Failed to write fake tool");
        let mut perms = fs::metadata(&path).expect("fake tool metadata").permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).expect("Failed to chmod fake tool");
    }

    fn prelude(&self, name: &str) -> String {
        let root = self.root.path().display();
        format!(
            "#!/bin/sh\nROOT='{root}'\necho \"{name} $*\" >> \"$ROOT/calls.log\"\n\
             if [ -f \"$ROOT/delay.{name}\" ]; then sleep \"$(cat \"$ROOT/delay.{name}\")\"; fi\n\
             if [ \"$1\" = \"--version\" ]; then echo '{VERSION}'; exit 0; fi\n"
        )
    }

    fn gdalinfo_script(&self) -> String {
        let mut s = self.prelude("gdalinfo");
        s.push_str(
            "if [ \"$1\" = \"-stats\" ]; then KIND=stats; SRC=\"$2\"; else KIND=info; SRC=\"$1\"; fi\n\
             F=\"$ROOT/$KIND/$(basename \"$SRC\")\"\n\
             if [ -f \"$F\" ]; then cat \"$F\"; exit 0; fi\n\
             echo \"ERROR 4: $SRC: No such file or directory\" >&2\n\
             exit 1\n",
        );
        s
    }

    fn translate_script(&self) -> String {
        let mut s = self.prelude("gdal_translate");
        s.push_str(
            "SRC=''; DST=''\n\
             for a in \"$@\"; do SRC=\"$DST\"; DST=\"$a\"; done\n\
             NAME=\"$(basename \"$SRC\")\"\n\
             if [ -f \"$ROOT/fail/$NAME\" ]; then cat \"$ROOT/fail/$NAME\" >&2; exit 1; fi\n\
             if [ -f \"$ROOT/grids/$NAME\" ]; then\n\
             \x20 cp \"$ROOT/grids/$NAME\" \"$DST\"\n\
             \x20 echo 'GEOGCS[\"WGS 84\"]' > \"${DST%.asc}.prj\"\n\
             \x20 exit 0\n\
             fi\n\
             echo \"ERROR 4: $SRC: No such file or directory\" >&2\n\
             exit 1\n",
        );
        s
    }
}

impl Default for FakeGdal {
    fn default() -> Self {
        Self::new()
    }
}

/// Write an empty placeholder raster so existence checks pass.
pub fn touch_raster(dir: &Path, filename: &str) -> PathBuf {
    let path = dir.join(filename);
    fs::write(&path, b"II*\0").expect("Failed to write placeholder raster");
    path
}
