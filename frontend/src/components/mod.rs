//! UI Components for the seismic detection application.
//!
//! # Layout Components
//! - [`Hero`] - Main title and description
//! - [`Footer`] - Page footer
//!
//! # Feature Components
//! - [`UploadSection`] - MiniSEED batch selection, options and upload
//! - [`ProgressSection`] - Live job progress
//! - [`ResultsSection`] - Results link, archive download, cleanup
//! - [`Toasts`] - Notifications raised through [`ToastSink`]

mod hero;
mod upload;
mod progress;
mod results;
mod notifications;
mod footer;

pub use hero::*;
pub use upload::*;
pub use progress::*;
pub use results::*;
pub use notifications::*;
pub use footer::*;
