//! # Seisweb - client core for the seismic detection service
//!
//! Validates MiniSEED batches before upload, polls job progress until the
//! detection run finishes, and downloads the results archive. The detection
//! itself runs on the job server; this crate only talks to it over HTTP.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ Candidates  │────▶│  Validator  │────▶│   Upload    │────▶│   Poller    │──▶ Download
//! │ (name,size) │     │ (ext, size) │     │ (multipart) │     │ (job status)│
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//!                                                                   │
//!                                                      UiSink ◀─────┘ (notify)
//! ```
//!
//! The validator and the poller have no rendering or transport
//! dependencies. The poller talks to the server through the
//! [`StatusSource`] and [`Timer`] traits; the `native` feature (default)
//! provides `reqwest`/`tokio` implementations, the browser front end provides
//! `gloo-net`/`gloo-timers` ones.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use seisweb::{ClientConfig, HttpClient, ProgressPoller, TokioTimer, UploadFile, UploadOptions};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ClientConfig::default();
//!     let client = HttpClient::new(&config);
//!     let files = vec![UploadFile::from_path("IU.ANMO.mseed".as_ref()).unwrap()];
//!     let job = client.upload(files, &UploadOptions::default()).await.unwrap();
//!
//!     let mut poller = ProgressPoller::new(client.clone(), TokioTimer);
//!     poller
//!         .start(job.job_id, |s| println!("{:.0}% {}", s.percentage, s.message), |_| {})
//!         .await;
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types per operation
//! - [`config`] - Limits and defaults
//! - [`models`] - Candidates, snapshots, wire types
//! - [`validator`] - Batch validation
//! - [`poller`] - Job progress polling
//! - [`notify`] - Notification channel
//! - [`session`] - Caller-owned session store
//! - [`endpoints`] - Job server URLs
//! - [`download`] - Download progress and file naming
//! - `native` - `reqwest`/`tokio` transport (feature `native`)

// Core modules
pub mod error;
pub mod config;
pub mod models;

// Upload validation
pub mod validator;

// Job tracking
pub mod poller;

// Presentation seams
pub mod notify;
pub mod session;

// HTTP
pub mod endpoints;
pub mod download;

#[cfg(feature = "native")]
pub mod native;

// =============================================================================
// Re-exports - Errors
// =============================================================================

pub use error::{
    server_error_message,
    ClientError,
    ClientResult,
    PollError,
    PollResult,
    ServerError,
    TransportError,
    ValidationError,
    UNKNOWN_SERVER_ERROR,
};

// =============================================================================
// Re-exports - Configuration
// =============================================================================

pub use config::{ClientConfig, ExtensionMatch, ValidatorConfig};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    format_file_size,
    Dataset,
    FileCandidate,
    JobId,
    JobStatus,
    ProgressBand,
    ProgressSnapshot,
    UploadOptions,
    UploadResponse,
    ValidationResult,
    WindowLength,
};

// =============================================================================
// Re-exports - Validation & Polling
// =============================================================================

pub use validator::FileValidator;

pub use poller::{PollHandle, PollOutcome, PollState, PollTask, ProgressPoller, StatusSource, Timer};

// =============================================================================
// Re-exports - Notifications & Session
// =============================================================================

pub use notify::{report, LogSink, MemorySink, Notification, Severity, UiSink};

pub use session::SessionStore;

// =============================================================================
// Re-exports - HTTP
// =============================================================================

pub use download::{fallback_file_name, filename_from_content_disposition, DownloadProgress};
pub use endpoints::Endpoints;

#[cfg(feature = "native")]
pub use native::{DownloadSummary, HttpClient, TokioTimer, UploadFile};
