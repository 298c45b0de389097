//! gazelog Uploader
//!
//! Packages a session's artifacts and ships them off exactly once:
//!
//! 1. **Archive:** zip the gaze log and every screenshot
//! 2. **Destination:** ask the remote service for a one-time upload URL
//! 3. **Upload:** PUT the archive bytes to that URL
//! 4. **Cleanup:** delete local artifacts, but only after a successful upload
//!
//! Any failure before cleanup leaves everything on disk so a later
//! `gazelog upload` can retry.

pub mod archive;
pub mod finalize;
pub mod transport;

pub use archive::{ArchiveManifest, Archiver};
pub use finalize::{archive_name, cleanup, FinalizeOutcome, FinalizeState, Finalizer, UNKNOWN_IP};
pub use transport::{HttpTransport, Transport, UploadDestination};
