//! Error handling.
//!
//! Error types are grouped by the stage that raises them:
//! - **Initialization**: logger and HTTP client setup
//! - **Acquisition**: download, extraction and the run as a whole (fatal to the run)
//! - **Database**: loading the .mmdb file at startup (fatal to the process)
//! - **Lookup**: per-request failures (recovered into a generic HTTP 500)

mod types;

// Re-export public API
pub use types::{
    AcquisitionError, DatabaseError, DownloadError, ExtractError, InitializationError,
    LookupError,
};
