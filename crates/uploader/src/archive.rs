//! Session archive builder.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use gazelog_common::error::{GazeError, GazeResult};
use gazelog_session_model::artifacts::ArtifactLayout;

/// Directory name screenshots are stored under inside the archive.
pub const SCREENSHOTS_ENTRY_DIR: &str = "screenshots";

/// What went into a freshly built archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveManifest {
    pub path: PathBuf,
    pub entries: Vec<String>,
    pub bytes: u64,
}

/// Builds the session archive from the artifact layout.
#[derive(Debug, Clone)]
pub struct Archiver {
    layout: ArtifactLayout,
}

impl Archiver {
    pub fn new(layout: ArtifactLayout) -> Self {
        Self { layout }
    }

    /// Write the archive, replacing any previous one.
    ///
    /// The log is stored under its file name and screenshots under
    /// `screenshots/`. Source files are left untouched. Fails without
    /// writing anything if the log does not exist.
    pub fn build(&self) -> GazeResult<ArchiveManifest> {
        let log_file = &self.layout.log_file;
        if !log_file.is_file() {
            return Err(GazeError::FileNotFound {
                path: log_file.clone(),
            });
        }
        let log_entry = log_file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| GazeError::archive("Log path has no file name"))?;

        let screenshots = self.layout.screenshot_files()?;

        let archive_path = &self.layout.archive_file;
        if let Some(parent) = archive_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = File::create(archive_path).map_err(|e| {
            GazeError::archive(format!("Failed to create {}: {e}", archive_path.display()))
        })?;
        let mut zip = ZipWriter::new(BufWriter::new(file));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        let mut entries = Vec::with_capacity(screenshots.len() + 1);

        add_file(&mut zip, options, log_file, &log_entry)?;
        entries.push(log_entry);

        for path in &screenshots {
            let Some(name) = path.file_name() else {
                continue;
            };
            let entry = format!("{SCREENSHOTS_ENTRY_DIR}/{}", name.to_string_lossy());
            add_file(&mut zip, options, path, &entry)?;
            entries.push(entry);
        }

        let mut writer = zip
            .finish()
            .map_err(|e| GazeError::archive(format!("Failed to finish archive: {e}")))?;
        writer.flush()?;
        drop(writer);

        let bytes = std::fs::metadata(archive_path)?.len();
        tracing::info!(
            path = %archive_path.display(),
            entries = entries.len(),
            bytes,
            "Archive built"
        );

        Ok(ArchiveManifest {
            path: archive_path.clone(),
            entries,
            bytes,
        })
    }
}

fn add_file<W: Write + std::io::Seek>(
    zip: &mut ZipWriter<W>,
    options: SimpleFileOptions,
    source: &std::path::Path,
    entry: &str,
) -> GazeResult<()> {
    zip.start_file(entry, options)
        .map_err(|e| GazeError::archive(format!("Failed to add {entry}: {e}")))?;
    let mut input = File::open(source)?;
    std::io::copy(&mut input, zip)?;
    Ok(())
}
