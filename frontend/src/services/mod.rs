//! Job server services.
//!
//! # Services
//!
//! - [`http`] - Shared request helpers and error mapping
//! - [`upload`] - Multipart upload of MiniSEED batches
//! - [`status`] - Progress polling seams (`gloo-net` + `gloo-timers`)
//! - [`download`] - Results archive download and job cleanup

pub mod http;
pub mod upload;
pub mod status;
pub mod download;

pub use upload::*;
pub use status::*;
pub use download::*;
