pub mod info;
pub mod record;
pub mod upload;

use gazelog_common::clock::SystemClock;
use gazelog_common::config::AppConfig;
use gazelog_session_model::artifacts::ArtifactLayout;
use gazelog_uploader::{FinalizeOutcome, Finalizer, HttpTransport};

/// Run the finalize sequence against the configured endpoints and print
/// the result. Never fails; a transport that cannot be built is reported.
async fn finalize(config: &AppConfig, layout: ArtifactLayout) {
    let transport = match HttpTransport::new(&config.upload) {
        Ok(transport) => transport,
        Err(e) => {
            tracing::error!(error = %e, "Cannot finalize; artifacts kept");
            println!("Error: {e}");
            return;
        }
    };
    let finalizer = Finalizer::new(layout, Box::new(transport), SystemClock);
    let outcome = finalizer.finalize().await;
    report(&outcome);
}

fn report(outcome: &FinalizeOutcome) {
    match outcome {
        FinalizeOutcome::AlreadyFinalized => println!("Session already finalized."),
        FinalizeOutcome::ArchiveFailed(e) => println!("Error: could not build archive: {e}"),
        FinalizeOutcome::DestinationFailed(e) => println!("Error: failed to get upload URL: {e}"),
        FinalizeOutcome::UploadFailed(e) => println!("Failed to upload zip file: {e}"),
        FinalizeOutcome::Uploaded {
            archive_name,
            cleanup_errors,
        } => {
            println!("Upload successful: {archive_name}");
            for (path, error) in cleanup_errors {
                println!("Error deleting {}: {error}", path.display());
            }
        }
    }
}
