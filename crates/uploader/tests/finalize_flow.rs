//! Finalize sequence against an in-memory transport.

use std::io::Read;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Local, TimeZone};

use gazelog_common::clock::ManualClock;
use gazelog_common::error::{GazeError, GazeResult};
use gazelog_session_model::artifacts::ArtifactLayout;
use gazelog_uploader::{
    Archiver, FinalizeOutcome, FinalizeState, Finalizer, Transport, UploadDestination,
};

#[derive(Default)]
struct Calls {
    ip: AtomicUsize,
    destination: AtomicUsize,
    upload: AtomicUsize,
    names: Mutex<Vec<String>>,
    uploaded: Mutex<Vec<u8>>,
}

struct MockTransport {
    calls: Arc<Calls>,
    ip: Option<String>,
    fail_destination: bool,
    fail_upload: bool,
}

impl MockTransport {
    fn ok(calls: Arc<Calls>) -> Self {
        Self {
            calls,
            ip: Some("198.51.100.7".into()),
            fail_destination: false,
            fail_upload: false,
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn external_ip(&self) -> GazeResult<String> {
        self.calls.ip.fetch_add(1, Ordering::SeqCst);
        self.ip
            .clone()
            .ok_or_else(|| GazeError::destination("offline"))
    }

    async fn request_destination(&self, archive_name: &str) -> GazeResult<UploadDestination> {
        self.calls.destination.fetch_add(1, Ordering::SeqCst);
        self.calls.names.lock().unwrap().push(archive_name.to_string());
        tokio::task::yield_now().await;
        if self.fail_destination {
            return Err(GazeError::destination("Service returned 500"));
        }
        Ok(UploadDestination {
            upload_url: "https://bucket.example/put".into(),
        })
    }

    async fn upload(&self, _url: &str, body: Vec<u8>) -> GazeResult<()> {
        self.calls.upload.fetch_add(1, Ordering::SeqCst);
        if self.fail_upload {
            return Err(GazeError::upload("Upload returned 403"));
        }
        *self.calls.uploaded.lock().unwrap() = body;
        Ok(())
    }
}

fn clock() -> ManualClock {
    ManualClock::new(Local.with_ymd_and_hms(2026, 5, 1, 9, 30, 0).unwrap())
}

fn seed(layout: &ArtifactLayout, lines: usize, screenshots: usize) {
    let mut log = String::new();
    for i in 0..lines {
        log.push_str(&format!("({i}, {}), \"2026-05-01 09:29:0{}.000000\"\n", i + 1, i % 10));
    }
    std::fs::write(&layout.log_file, log).unwrap();
    std::fs::create_dir_all(&layout.screenshots_dir).unwrap();
    for i in 0..screenshots {
        std::fs::write(
            layout
                .screenshots_dir
                .join(format!("screenshot_2026-05-01_09-29-0{i}.png")),
            vec![i as u8; 64 + i],
        )
        .unwrap();
    }
}

#[tokio::test]
async fn test_successful_finalize_uploads_and_cleans_up() {
    let dir = tempfile::tempdir().unwrap();
    let layout = ArtifactLayout::in_dir(dir.path());
    seed(&layout, 4, 2);

    let calls = Arc::new(Calls::default());
    let finalizer = Finalizer::new(
        layout.clone(),
        Box::new(MockTransport::ok(calls.clone())),
        clock(),
    );

    let outcome = finalizer.finalize().await;
    match outcome {
        FinalizeOutcome::Uploaded {
            archive_name,
            cleanup_errors,
        } => {
            assert_eq!(archive_name, "iris_data_198.51.100.7_2026-05-01_09-30-00.zip");
            assert!(cleanup_errors.is_empty());
        }
        other => panic!("unexpected outcome: {other:?}"),
    }

    assert_eq!(finalizer.state(), FinalizeState::Done);
    assert!(!calls.uploaded.lock().unwrap().is_empty());
    assert!(!layout.log_file.exists());
    assert!(!layout.screenshots_dir.exists());
    assert!(!layout.archive_file.exists());
}

#[tokio::test]
async fn test_concurrent_finalize_runs_once() {
    let dir = tempfile::tempdir().unwrap();
    let layout = ArtifactLayout::in_dir(dir.path());
    seed(&layout, 2, 1);

    let calls = Arc::new(Calls::default());
    let finalizer = Finalizer::new(
        layout,
        Box::new(MockTransport::ok(calls.clone())),
        clock(),
    );

    let (a, b) = tokio::join!(finalizer.finalize(), finalizer.finalize());
    let uploaded = [&a, &b].iter().filter(|o| o.is_uploaded()).count();
    let skipped = [&a, &b]
        .iter()
        .filter(|o| matches!(o, FinalizeOutcome::AlreadyFinalized))
        .count();
    assert_eq!((uploaded, skipped), (1, 1));

    assert!(matches!(
        finalizer.finalize().await,
        FinalizeOutcome::AlreadyFinalized
    ));
    assert_eq!(calls.destination.load(Ordering::SeqCst), 1);
    assert_eq!(calls.upload.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_destination_failure_keeps_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let layout = ArtifactLayout::in_dir(dir.path());
    seed(&layout, 3, 1);

    let calls = Arc::new(Calls::default());
    let transport = MockTransport {
        fail_destination: true,
        ..MockTransport::ok(calls.clone())
    };
    let finalizer = Finalizer::new(layout.clone(), Box::new(transport), clock());

    assert!(matches!(
        finalizer.finalize().await,
        FinalizeOutcome::DestinationFailed(_)
    ));
    assert_eq!(calls.upload.load(Ordering::SeqCst), 0);
    assert!(layout.log_file.exists());
    assert!(layout.archive_file.exists());
    assert_eq!(layout.screenshot_files().unwrap().len(), 1);
}

#[tokio::test]
async fn test_upload_failure_keeps_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let layout = ArtifactLayout::in_dir(dir.path());
    seed(&layout, 3, 2);

    let calls = Arc::new(Calls::default());
    let transport = MockTransport {
        fail_upload: true,
        ..MockTransport::ok(calls.clone())
    };
    let finalizer = Finalizer::new(layout.clone(), Box::new(transport), clock());

    assert!(matches!(
        finalizer.finalize().await,
        FinalizeOutcome::UploadFailed(_)
    ));
    assert_eq!(finalizer.state(), FinalizeState::Done);
    assert!(layout.log_file.exists());
    assert!(layout.archive_file.exists());
    assert_eq!(layout.screenshot_files().unwrap().len(), 2);
}

#[tokio::test]
async fn test_missing_log_aborts_before_network() {
    let dir = tempfile::tempdir().unwrap();
    let layout = ArtifactLayout::in_dir(dir.path());

    let calls = Arc::new(Calls::default());
    let finalizer = Finalizer::new(layout, Box::new(MockTransport::ok(calls.clone())), clock());

    assert!(matches!(
        finalizer.finalize().await,
        FinalizeOutcome::ArchiveFailed(GazeError::FileNotFound { .. })
    ));
    assert_eq!(calls.ip.load(Ordering::SeqCst), 0);
    assert_eq!(calls.destination.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_ip_lookup_failure_uses_placeholder() {
    let dir = tempfile::tempdir().unwrap();
    let layout = ArtifactLayout::in_dir(dir.path());
    seed(&layout, 1, 0);

    let calls = Arc::new(Calls::default());
    let transport = MockTransport {
        ip: None,
        ..MockTransport::ok(calls.clone())
    };
    let finalizer = Finalizer::new(layout, Box::new(transport), clock());

    assert!(finalizer.finalize().await.is_uploaded());
    assert_eq!(
        calls.names.lock().unwrap().as_slice(),
        ["iris_data_unknown-ip_2026-05-01_09-30-00.zip".to_string()]
    );
}

#[test]
fn test_archive_contains_log_and_screenshots_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let layout = ArtifactLayout::in_dir(dir.path());
    seed(&layout, 5, 3);

    let manifest = Archiver::new(layout.clone()).build().unwrap();
    assert_eq!(manifest.entries.len(), 4);

    let file = std::fs::File::open(&layout.archive_file).unwrap();
    let mut zip = zip::ZipArchive::new(file).unwrap();
    assert_eq!(zip.len(), 4);

    let mut log = String::new();
    zip.by_name("iris_data.csv")
        .unwrap()
        .read_to_string(&mut log)
        .unwrap();
    assert_eq!(log, std::fs::read_to_string(&layout.log_file).unwrap());
    assert_eq!(log.lines().count(), 5);

    for path in layout.screenshot_files().unwrap() {
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        let mut bytes = Vec::new();
        zip.by_name(&format!("screenshots/{name}"))
            .unwrap()
            .read_to_end(&mut bytes)
            .unwrap();
        assert_eq!(bytes, std::fs::read(&path).unwrap());
    }
}

#[test]
fn test_rebuild_replaces_previous_archive() {
    let dir = tempfile::tempdir().unwrap();
    let layout = ArtifactLayout::in_dir(dir.path());
    seed(&layout, 2, 2);
    Archiver::new(layout.clone()).build().unwrap();

    std::fs::remove_dir_all(&layout.screenshots_dir).unwrap();
    let manifest = Archiver::new(layout.clone()).build().unwrap();
    assert_eq!(manifest.entries, vec!["iris_data.csv".to_string()]);

    let zip = zip::ZipArchive::new(std::fs::File::open(&layout.archive_file).unwrap()).unwrap();
    assert_eq!(zip.len(), 1);
}
