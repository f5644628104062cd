//! Client configuration.
//!
//! The limits below mirror what the job server enforces. They are compile-time
//! defaults; [`ClientConfig::from_json`] lets an embedding page override them.

use std::collections::BTreeSet;
use std::time::Duration;

use serde::Deserialize;

/// Base URL of the job server in development.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";

/// Maximum size of a single file (in bytes).
///
/// 500 MB limit.
pub const MAX_FILE_SIZE: u64 = 500 * 1024 * 1024;

/// Maximum size of a whole batch (in bytes).
///
/// Same as the server's request body limit.
pub const MAX_TOTAL_SIZE: u64 = 500 * 1024 * 1024;

/// Delay between the end of one status request and the start of the next.
pub const POLL_INTERVAL: Duration = Duration::from_millis(1500);

/// Accepted MiniSEED extensions (compared case-insensitively by default).
pub const ALLOWED_EXTENSIONS: &[&str] = &["mseed", "ms", "miniseed"];

/// How long a notification stays on screen.
pub const NOTIFICATION_DURATION: Duration = Duration::from_millis(5000);

/// Maximum notifications kept in memory.
pub const MAX_NOTIFICATIONS: usize = 50;

/// Window length bounds in minutes (24 h plus a 20 minute margin).
pub const MIN_WINDOW_MINUTES: u32 = 1;
pub const MAX_WINDOW_MINUTES: u32 = 1460;
pub const DEFAULT_WINDOW_MINUTES: u32 = 2;

/// How file extensions are compared against the whitelist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtensionMatch {
    /// Byte-for-byte comparison.
    Exact,
    /// ASCII case-insensitive comparison.
    #[default]
    IgnoreCase,
}

/// Limits applied by [`crate::FileValidator`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ValidatorConfig {
    pub allowed_extensions: BTreeSet<String>,
    pub max_file_size_bytes: u64,
    pub max_total_size_bytes: u64,
    pub extension_match: ExtensionMatch,
}

impl ValidatorConfig {
    /// Build a config from an explicit whitelist, using exact matching.
    pub fn exact<I, S>(allowed: I, max_file_size_bytes: u64, max_total_size_bytes: u64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_extensions: allowed.into_iter().map(Into::into).collect(),
            max_file_size_bytes,
            max_total_size_bytes,
            extension_match: ExtensionMatch::Exact,
        }
    }

    /// Switch the extension comparison mode.
    pub fn with_extension_match(mut self, mode: ExtensionMatch) -> Self {
        self.extension_match = mode;
        self
    }

    /// Whether `extension` passes the whitelist.
    pub fn allows(&self, extension: &str) -> bool {
        match self.extension_match {
            ExtensionMatch::Exact => self.allowed_extensions.contains(extension),
            ExtensionMatch::IgnoreCase => self
                .allowed_extensions
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(extension)),
        }
    }

    /// Value for an `<input accept=...>` attribute, e.g. `.miniseed,.ms,.mseed`.
    pub fn accept_attribute(&self) -> String {
        self.allowed_extensions
            .iter()
            .map(|ext| format!(".{}", ext))
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: ALLOWED_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            max_file_size_bytes: MAX_FILE_SIZE,
            max_total_size_bytes: MAX_TOTAL_SIZE,
            extension_match: ExtensionMatch::IgnoreCase,
        }
    }
}

/// Everything a front end needs to talk to the job server.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientConfig {
    pub backend_url: String,
    #[serde(rename = "pollIntervalMs", with = "millis")]
    pub poll_interval: Duration,
    #[serde(rename = "notificationDurationMs", with = "millis")]
    pub notification_duration: Duration,
    pub validator: ValidatorConfig,
}

impl ClientConfig {
    /// Parse a JSON override document; missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            poll_interval: POLL_INTERVAL,
            notification_duration: NOTIFICATION_DURATION,
            validator: ValidatorConfig::default(),
        }
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_allows_any_case() {
        let config = ValidatorConfig::default();
        assert!(config.allows("mseed"));
        assert!(config.allows("MSEED"));
        assert!(config.allows("MiniSEED"));
        assert!(!config.allows("txt"));
        assert!(!config.allows(""));
    }

    #[test]
    fn test_exact_match_is_case_sensitive() {
        let config = ValidatorConfig::exact(["mseed", "MSEED"], 10, 10);
        assert!(config.allows("mseed"));
        assert!(config.allows("MSEED"));
        assert!(!config.allows("Mseed"));
    }

    #[test]
    fn test_accept_attribute() {
        let config = ValidatorConfig::default();
        assert_eq!(config.accept_attribute(), ".miniseed,.ms,.mseed");
    }

    #[test]
    fn test_client_config_partial_override() {
        let config = ClientConfig::from_json(
            r#"{"backendUrl": "https://seis.example.org", "pollIntervalMs": 500,
                "validator": {"maxFileSizeBytes": 1024, "extensionMatch": "exact"}}"#,
        )
        .unwrap();

        assert_eq!(config.backend_url, "https://seis.example.org");
        assert_eq!(config.poll_interval, Duration::from_millis(500));
        assert_eq!(config.notification_duration, NOTIFICATION_DURATION);
        assert_eq!(config.validator.max_file_size_bytes, 1024);
        assert_eq!(config.validator.max_total_size_bytes, MAX_TOTAL_SIZE);
        assert_eq!(config.validator.extension_match, ExtensionMatch::Exact);
        assert!(config.validator.allows("mseed"));
    }

    #[test]
    fn test_client_config_empty_document() {
        assert_eq!(ClientConfig::from_json("{}").unwrap(), ClientConfig::default());
    }
}
