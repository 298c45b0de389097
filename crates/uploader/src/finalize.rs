//! Exactly-once session finalization.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU8, Ordering};

use chrono::{DateTime, Local};

use gazelog_common::clock::WallClock;
use gazelog_common::error::GazeError;
use gazelog_session_model::artifacts::ArtifactLayout;

use crate::archive::Archiver;
use crate::transport::Transport;

const IDLE: u8 = 0;
const FINALIZING: u8 = 1;
const DONE: u8 = 2;

/// IP placeholder used when the lookup fails.
pub const UNKNOWN_IP: &str = "unknown-ip";

/// Remote name for an archive: `iris_data_<ip>_<YYYY-MM-DD_HH-MM-SS>.zip`.
pub fn archive_name(ip: &str, now: DateTime<Local>) -> String {
    format!("iris_data_{ip}_{}.zip", now.format("%Y-%m-%d_%H-%M-%S"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalizeState {
    Idle,
    Finalizing,
    Done,
}

/// Result of a finalize call.
#[derive(Debug)]
pub enum FinalizeOutcome {
    /// Another call already claimed finalization.
    AlreadyFinalized,
    ArchiveFailed(GazeError),
    DestinationFailed(GazeError),
    UploadFailed(GazeError),
    /// Upload succeeded. Deletion problems are reported, not fatal.
    Uploaded {
        archive_name: String,
        cleanup_errors: Vec<(PathBuf, std::io::Error)>,
    },
}

impl FinalizeOutcome {
    pub fn is_uploaded(&self) -> bool {
        matches!(self, Self::Uploaded { .. })
    }
}

/// Runs archive, destination, upload, and cleanup at most once.
pub struct Finalizer<C: WallClock> {
    layout: ArtifactLayout,
    transport: Box<dyn Transport>,
    clock: C,
    state: AtomicU8,
}

impl<C: WallClock> Finalizer<C> {
    pub fn new(layout: ArtifactLayout, transport: Box<dyn Transport>, clock: C) -> Self {
        Self {
            layout,
            transport,
            clock,
            state: AtomicU8::new(IDLE),
        }
    }

    pub fn state(&self) -> FinalizeState {
        match self.state.load(Ordering::SeqCst) {
            IDLE => FinalizeState::Idle,
            FINALIZING => FinalizeState::Finalizing,
            _ => FinalizeState::Done,
        }
    }

    pub fn layout(&self) -> &ArtifactLayout {
        &self.layout
    }

    /// Finalize the session. Only the first call does any work; every
    /// later or concurrent call returns [`FinalizeOutcome::AlreadyFinalized`].
    pub async fn finalize(&self) -> FinalizeOutcome {
        if self
            .state
            .compare_exchange(IDLE, FINALIZING, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!("Finalize already claimed");
            return FinalizeOutcome::AlreadyFinalized;
        }

        let outcome = self.run_sequence().await;
        self.state.store(DONE, Ordering::SeqCst);
        outcome
    }

    async fn run_sequence(&self) -> FinalizeOutcome {
        let manifest = match Archiver::new(self.layout.clone()).build() {
            Ok(manifest) => manifest,
            Err(e) => {
                tracing::error!(error = %e, "Archive build failed; artifacts kept");
                return FinalizeOutcome::ArchiveFailed(e);
            }
        };

        let ip = match self.transport.external_ip().await {
            Ok(ip) => ip,
            Err(e) => {
                tracing::warn!(error = %e, "External IP lookup failed");
                UNKNOWN_IP.to_string()
            }
        };
        let name = archive_name(&ip, self.clock.now());

        let destination = match self.transport.request_destination(&name).await {
            Ok(destination) => destination,
            Err(e) => {
                tracing::error!(error = %e, archive_name = %name, "No upload URL; artifacts kept");
                return FinalizeOutcome::DestinationFailed(e);
            }
        };

        let body = match tokio::fs::read(&manifest.path).await {
            Ok(body) => body,
            Err(e) => {
                tracing::error!(error = %e, "Archive unreadable; artifacts kept");
                return FinalizeOutcome::UploadFailed(e.into());
            }
        };

        if let Err(e) = self
            .transport
            .upload(&destination.upload_url, body)
            .await
        {
            tracing::error!(error = %e, archive_name = %name, "Upload failed; artifacts kept");
            return FinalizeOutcome::UploadFailed(e);
        }

        let cleanup_errors = cleanup(&self.layout);
        for (path, error) in &cleanup_errors {
            tracing::warn!(path = %path.display(), %error, "Failed to delete artifact");
        }
        tracing::info!(archive_name = %name, "Session finalized");

        FinalizeOutcome::Uploaded {
            archive_name: name,
            cleanup_errors,
        }
    }
}

/// Delete the screenshot directory, the archive, and the log, in that order.
/// Missing items are skipped; other failures are collected and do not stop
/// the remaining deletions.
pub fn cleanup(layout: &ArtifactLayout) -> Vec<(PathBuf, std::io::Error)> {
    let mut errors = Vec::new();
    let mut record = |path: &Path, result: std::io::Result<()>| match result {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
            errors.push((path.to_path_buf(), e));
        }
        _ => {}
    };

    record(
        &layout.screenshots_dir,
        std::fs::remove_dir_all(&layout.screenshots_dir),
    );
    record(&layout.archive_file, std::fs::remove_file(&layout.archive_file));
    record(&layout.log_file, std::fs::remove_file(&layout.log_file));

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_archive_name_format() {
        let now = Local.with_ymd_and_hms(2026, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(
            archive_name("203.0.113.9", now),
            "iris_data_203.0.113.9_2026-03-09_14-05-07.zip"
        );
        assert_eq!(
            archive_name(UNKNOWN_IP, now),
            "iris_data_unknown-ip_2026-03-09_14-05-07.zip"
        );
    }

    #[test]
    fn test_cleanup_skips_missing_items() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ArtifactLayout::in_dir(dir.path());
        std::fs::write(&layout.log_file, "x").unwrap();

        let errors = cleanup(&layout);
        assert!(errors.is_empty());
        assert!(!layout.log_file.exists());
    }

    #[test]
    fn test_cleanup_removes_everything() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ArtifactLayout::in_dir(dir.path());
        std::fs::write(&layout.log_file, "x").unwrap();
        std::fs::write(&layout.archive_file, "zip").unwrap();
        std::fs::create_dir_all(&layout.screenshots_dir).unwrap();
        std::fs::write(layout.screenshots_dir.join("a.png"), "png").unwrap();

        assert!(cleanup(&layout).is_empty());
        assert!(!layout.log_file.exists());
        assert!(!layout.archive_file.exists());
        assert!(!layout.screenshots_dir.exists());
    }

    #[test]
    fn test_cleanup_continues_past_failed_deletion() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ArtifactLayout::in_dir(dir.path());
        std::fs::write(&layout.log_file, "x").unwrap();
        std::fs::write(&layout.archive_file, "zip").unwrap();
        // A plain file where the directory should be makes remove_dir_all fail.
        std::fs::write(&layout.screenshots_dir, "not a dir").unwrap();

        let errors = cleanup(&layout);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].0, layout.screenshots_dir);
        assert!(!layout.archive_file.exists());
        assert!(!layout.log_file.exists());
    }
}
