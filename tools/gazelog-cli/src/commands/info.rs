//! Show artifact status.

use std::path::PathBuf;

use gazelog_common::config::AppConfig;
use gazelog_session_model::artifacts::ArtifactLayout;

pub fn run(config: AppConfig, config_path: PathBuf) -> anyhow::Result<()> {
    let layout = ArtifactLayout::from(&config.artifacts);
    let status = layout
        .status()
        .map_err(|e| anyhow::anyhow!("Failed to inspect artifacts: {e}"))?;

    let state = if config_path.exists() {
        ""
    } else {
        " (not found, using defaults)"
    };
    println!("Config: {}{state}", config_path.display());
    println!();

    println!("Artifacts:");
    match status.log_lines {
        Some(lines) => println!("  Log: {} ({lines} events)", layout.log_file.display()),
        None => println!("  Log: {} (missing)", layout.log_file.display()),
    }
    println!(
        "  Screenshots: {} ({} files)",
        layout.screenshots_dir.display(),
        status.screenshots
    );
    match status.archive_bytes {
        Some(bytes) => println!("  Archive: {} ({bytes} bytes)", layout.archive_file.display()),
        None => println!("  Archive: {} (not built)", layout.archive_file.display()),
    }
    println!();

    println!("Cadence:");
    println!("  Log interval: {}ms", config.cadence.log_interval_ms);
    println!(
        "  Screenshot every {} face frames",
        config.cadence.screenshot_frame_threshold.saturating_add(1)
    );
    println!();

    println!("Upload:");
    println!("  Destination: {}", config.upload.destination_url);
    println!("  IP lookup: {}", config.upload.external_ip_url);

    Ok(())
}
