//! Native transport: `reqwest` for HTTP, `tokio` for timers.
//!
//! Enabled by the `native` feature (on by default). The browser front end
//! builds without it and provides its own transport over `gloo-net`.

mod http;
mod timer;

pub use http::{DownloadSummary, HttpClient, UploadFile};
pub use timer::TokioTimer;
