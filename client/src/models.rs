//! Domain types shared by the validator, the poller and the transports.
//!
//! # Categories
//!
//! - **Upload types** - [`FileCandidate`], [`ValidationResult`], [`WindowLength`], [`Dataset`]
//! - **Job types** - [`JobId`], [`JobStatus`] (wire), [`ProgressSnapshot`] (UI)
//! - **API types** - [`UploadResponse`]
//! - **Display helpers** - [`ProgressBand`], [`format_file_size`]

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_WINDOW_MINUTES, MAX_WINDOW_MINUTES, MIN_WINDOW_MINUTES};
use crate::error::ValidationError;

// =============================================================================
// Upload Types
// =============================================================================

/// A file selected by the user, not yet validated or transmitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    /// File name as reported by the file picker
    pub name: String,
    /// Size in bytes
    pub size: u64,
}

impl FileCandidate {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self { name: name.into(), size }
    }

    /// Substring after the last `.`; empty when the name has none.
    pub fn extension(&self) -> &str {
        self.name.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("")
    }
}

/// Outcome of validating a batch of candidates.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationResult {
    /// Reasons in the order they were found
    pub errors: Vec<ValidationError>,
    /// Sum of the sizes of the files that passed both per-file checks
    pub total_size_bytes: u64,
}

impl ValidationResult {
    /// True when no error was recorded.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Errors rendered as display lines.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

/// Length of the analysis windows requested from the server, in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct WindowLength(u32);

impl WindowLength {
    pub fn new(minutes: u32) -> Result<Self, ValidationError> {
        if minutes < MIN_WINDOW_MINUTES {
            return Err(ValidationError::InvalidWindowLength(format!(
                "window length must be at least {} minute",
                MIN_WINDOW_MINUTES
            )));
        }
        if minutes > MAX_WINDOW_MINUTES {
            return Err(ValidationError::InvalidWindowLength(format!(
                "window length cannot exceed {} minutes",
                MAX_WINDOW_MINUTES
            )));
        }
        Ok(Self(minutes))
    }

    pub fn minutes(self) -> u32 {
        self.0
    }
}

impl Default for WindowLength {
    fn default() -> Self {
        Self(DEFAULT_WINDOW_MINUTES)
    }
}

impl FromStr for WindowLength {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let minutes = s.trim().parse::<u32>().map_err(|_| {
            ValidationError::InvalidWindowLength("window length must be a whole number of minutes".into())
        })?;
        Self::new(minutes)
    }
}

impl TryFrom<u32> for WindowLength {
    type Error = ValidationError;

    fn try_from(minutes: u32) -> Result<Self, Self::Error> {
        Self::new(minutes)
    }
}

impl From<WindowLength> for u32 {
    fn from(w: WindowLength) -> Self {
        w.0
    }
}

impl fmt::Display for WindowLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Pre-trained weights the detection models are loaded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dataset {
    #[default]
    Stead,
    Instance,
    Ethz,
}

impl Dataset {
    pub const ALL: [Dataset; 3] = [Dataset::Stead, Dataset::Instance, Dataset::Ethz];

    /// Form value expected by the server.
    pub fn as_str(&self) -> &'static str {
        match self {
            Dataset::Stead => "stead",
            Dataset::Instance => "instance",
            Dataset::Ethz => "ethz",
        }
    }

    /// Label for the dataset picker.
    pub fn label(&self) -> &'static str {
        match self {
            Dataset::Stead => "STEAD (recommended)",
            Dataset::Instance => "INSTANCE",
            Dataset::Ethz => "ETHZ",
        }
    }
}

impl FromStr for Dataset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dataset::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown dataset: {}", s))
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Form fields sent along with the files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UploadOptions {
    pub window_length: WindowLength,
    pub dataset: Dataset,
}

impl UploadOptions {
    /// `(name, value)` pairs of the multipart text fields.
    pub fn form_fields(&self) -> [(&'static str, String); 2] {
        [
            ("window_length", self.window_length.to_string()),
            ("dataset", self.dataset.as_str().to_string()),
        ]
    }
}

/// Multipart field name carrying each uploaded file.
pub const UPLOAD_FILES_FIELD: &str = "files";

// =============================================================================
// Job Types
// =============================================================================

/// Opaque identifier of a server-side job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct JobId(String);

impl JobId {
    /// Wrap a job id; blank ids are rejected.
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for JobId {
    type Error = String;

    fn try_from(id: String) -> Result<Self, Self::Error> {
        JobId::new(id).ok_or_else(|| "job id must not be blank".to_string())
    }
}

impl From<JobId> for String {
    fn from(id: JobId) -> Self {
        id.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `error` field of a status body.
///
/// The server puts a message string there for lookups that fail, and the
/// boolean `true` for jobs whose processing failed (the text is in `message`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum StatusError {
    Flag(bool),
    Message(String),
}

/// Body of `GET /progress/<job>`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JobStatus {
    #[serde(default)]
    pub percentage: f64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub error: Option<StatusError>,
    /// Files processed so far
    #[serde(default)]
    pub current: Option<u64>,
    /// Files in the job
    #[serde(default)]
    pub total: Option<u64>,
}

/// Message shown while the server has not said anything yet.
pub const DEFAULT_PROGRESS_MESSAGE: &str = "Processing...";

/// One observation of a job's progress, ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSnapshot {
    /// Always within `[0, 100]`
    pub percentage: f64,
    pub message: String,
    pub completed: bool,
    pub error_message: Option<String>,
}

impl ProgressSnapshot {
    /// Whether the job finished in error.
    pub fn is_failure(&self) -> bool {
        self.error_message.is_some()
    }

    pub fn band(&self) -> ProgressBand {
        ProgressBand::from_percentage(self.percentage)
    }
}

impl From<JobStatus> for ProgressSnapshot {
    fn from(status: JobStatus) -> Self {
        let percentage = if status.percentage.is_finite() {
            status.percentage.clamp(0.0, 100.0)
        } else {
            0.0
        };
        let message = if status.message.trim().is_empty() {
            DEFAULT_PROGRESS_MESSAGE.to_string()
        } else {
            status.message
        };
        let error_message = match status.error {
            Some(StatusError::Flag(true)) => Some(message.clone()),
            Some(StatusError::Message(msg)) if !msg.trim().is_empty() => Some(msg),
            _ => None,
        };

        Self {
            percentage,
            message,
            completed: status.completed,
            error_message,
        }
    }
}

// =============================================================================
// API Types
// =============================================================================

/// Body of a successful `POST /upload`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub job_id: JobId,
    pub message: String,
    pub files_count: usize,
    pub window_length: u32,
    pub dataset: String,
}

// =============================================================================
// Display Helpers
// =============================================================================

/// Colour band of the progress bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressBand {
    /// Below 30%
    Low,
    /// Below 70%
    Medium,
    High,
}

impl ProgressBand {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage < 30.0 {
            ProgressBand::Low
        } else if percentage < 70.0 {
            ProgressBand::Medium
        } else {
            ProgressBand::High
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            ProgressBand::Low => "progress-low",
            ProgressBand::Medium => "progress-medium",
            ProgressBand::High => "progress-high",
        }
    }
}

/// Human readable size, base 1024: `0 Bytes`, `1.5 KB`, `100 MB`.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}
