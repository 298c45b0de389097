//! On-disk layout of a recording session.

use std::path::{Path, PathBuf};

use gazelog_common::config::ArtifactPaths;

/// Locations of everything a session leaves on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLayout {
    /// Append-only gaze log.
    pub log_file: PathBuf,
    /// Screenshot directory, archived under `screenshots/`.
    pub screenshots_dir: PathBuf,
    /// Archive built at finalize time.
    pub archive_file: PathBuf,
}

/// Snapshot of what currently exists on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactStatus {
    /// Number of non-empty log lines, if the log exists.
    pub log_lines: Option<usize>,
    /// Number of screenshot files.
    pub screenshots: usize,
    /// Archive size in bytes, if the archive exists.
    pub archive_bytes: Option<u64>,
}

impl ArtifactLayout {
    pub fn new(
        log_file: impl Into<PathBuf>,
        screenshots_dir: impl Into<PathBuf>,
        archive_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            log_file: log_file.into(),
            screenshots_dir: screenshots_dir.into(),
            archive_file: archive_file.into(),
        }
    }

    /// Layout with every artifact placed under `root`.
    pub fn in_dir(root: &Path) -> Self {
        let defaults = ArtifactPaths::default();
        Self::new(
            root.join(defaults.log_file),
            root.join(defaults.screenshots_dir),
            root.join(defaults.archive_file),
        )
    }

    /// Create the screenshot directory if it does not exist yet.
    /// Returns true when the directory was created by this call.
    pub fn ensure_screenshots_dir(&self) -> std::io::Result<bool> {
        if self.screenshots_dir.is_dir() {
            return Ok(false);
        }
        std::fs::create_dir_all(&self.screenshots_dir)?;
        Ok(true)
    }

    /// Regular files in the screenshot directory, sorted by name.
    /// A missing directory yields an empty list.
    pub fn screenshot_files(&self) -> std::io::Result<Vec<PathBuf>> {
        if !self.screenshots_dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut files = Vec::new();
        for entry in std::fs::read_dir(&self.screenshots_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                files.push(entry.path());
            }
        }
        files.sort();
        Ok(files)
    }

    /// Inspect the artifacts currently on disk.
    pub fn status(&self) -> std::io::Result<ArtifactStatus> {
        let log_lines = if self.log_file.is_file() {
            let content = std::fs::read_to_string(&self.log_file)?;
            Some(content.lines().filter(|l| !l.trim().is_empty()).count())
        } else {
            None
        };

        let archive_bytes = if self.archive_file.is_file() {
            Some(std::fs::metadata(&self.archive_file)?.len())
        } else {
            None
        };

        Ok(ArtifactStatus {
            log_lines,
            screenshots: self.screenshot_files()?.len(),
            archive_bytes,
        })
    }
}

impl From<&ArtifactPaths> for ArtifactLayout {
    fn from(paths: &ArtifactPaths) -> Self {
        Self::new(
            paths.log_file.clone(),
            paths.screenshots_dir.clone(),
            paths.archive_file.clone(),
        )
    }
}

impl Default for ArtifactLayout {
    fn default() -> Self {
        Self::from(&ArtifactPaths::default())
    }
}
