//! Archive and upload artifacts left on disk.

use gazelog_common::config::AppConfig;
use gazelog_session_model::artifacts::ArtifactLayout;

use crate::signals;

/// Finalize existing artifacts. Every failure is reported and the command
/// still succeeds; artifacts stay on disk for the next attempt.
pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    let layout = ArtifactLayout::from(&config.artifacts);
    let _shutdown = signals::spawn_listener();

    println!("Uploading CSV file...");
    super::finalize(&config, layout).await;
    Ok(())
}
