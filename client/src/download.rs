//! Transport-independent pieces of result downloads.
//!
//! The browser and native transports both stream the archive in chunks and
//! feed their lengths to a [`DownloadProgress`]; the file name comes from the
//! `Content-Disposition` header when the server sends one.

use percent_encoding::percent_decode_str;

use crate::models::JobId;

/// Accumulates received bytes against an optional expected total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DownloadProgress {
    loaded: u64,
    total: Option<u64>,
}

impl DownloadProgress {
    /// A zero total is treated as unknown.
    pub fn new(total: Option<u64>) -> Self {
        Self {
            loaded: 0,
            total: total.filter(|t| *t > 0),
        }
    }

    /// Build from a raw `Content-Length` header value.
    pub fn from_content_length(header: Option<&str>) -> Self {
        Self::new(header.and_then(|v| v.trim().parse::<u64>().ok()))
    }

    /// Record a received chunk; returns the new percentage when known.
    pub fn advance(&mut self, chunk_len: usize) -> Option<f64> {
        self.loaded = self.loaded.saturating_add(chunk_len as u64);
        self.percentage()
    }

    pub fn loaded(&self) -> u64 {
        self.loaded
    }

    pub fn total(&self) -> Option<u64> {
        self.total
    }

    /// Percentage in `[0, 100]`, or `None` without a known total.
    pub fn percentage(&self) -> Option<f64> {
        let total = self.total?;
        Some((self.loaded as f64 / total as f64 * 100.0).min(100.0))
    }
}

/// File name to save a job's results under when the server does not name it.
pub fn fallback_file_name(job: &JobId) -> String {
    format!("results_{}.zip", sanitize_file_name(job.as_str()))
}

/// Extract the file name from a `Content-Disposition` header.
///
/// `filename*=UTF-8''...` takes precedence over `filename=`. Directory
/// components are stripped.
pub fn filename_from_content_disposition(header: &str) -> Option<String> {
    let mut plain = None;
    let mut extended = None;

    for param in header.split(';').map(str::trim) {
        let Some((key, value)) = param.split_once('=') else {
            continue;
        };
        match key.trim().to_ascii_lowercase().as_str() {
            "filename*" => {
                let value = value.trim();
                let encoded = value.split_once("''").map(|(_, v)| v).unwrap_or(value);
                extended = percent_decode_str(encoded)
                    .decode_utf8()
                    .ok()
                    .map(|s| s.into_owned());
            }
            "filename" => {
                plain = Some(value.trim().trim_matches('"').to_string());
            }
            _ => {}
        }
    }

    extended
        .or(plain)
        .map(|name| sanitize_file_name(&name))
        .filter(|name| !name.is_empty())
}

fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    base.chars()
        .filter(|c| !c.is_control() && *c != '"')
        .collect::<String>()
        .trim()
        .trim_start_matches('.')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_with_known_total() {
        let mut progress = DownloadProgress::from_content_length(Some("200"));
        assert_eq!(progress.advance(50), Some(25.0));
        assert_eq!(progress.advance(150), Some(100.0));
        // Servers occasionally send more than announced
        assert_eq!(progress.advance(10), Some(100.0));
        assert_eq!(progress.loaded(), 210);
    }

    #[test]
    fn test_progress_without_total() {
        let mut progress = DownloadProgress::from_content_length(None);
        assert_eq!(progress.advance(1024), None);
        assert_eq!(progress.loaded(), 1024);

        assert_eq!(DownloadProgress::from_content_length(Some("0")).total(), None);
        assert_eq!(DownloadProgress::from_content_length(Some("abc")).total(), None);
    }

    #[test]
    fn test_content_disposition_plain() {
        let header = r#"attachment; filename="resultados_abc_ventana_2min_dataset_stead.zip""#;
        assert_eq!(
            filename_from_content_disposition(header).as_deref(),
            Some("resultados_abc_ventana_2min_dataset_stead.zip")
        );
        assert_eq!(
            filename_from_content_disposition("attachment; filename=out.zip").as_deref(),
            Some("out.zip")
        );
    }

    #[test]
    fn test_content_disposition_extended_wins() {
        let header = "attachment; filename=\"fallback.zip\"; filename*=UTF-8''r%C3%A9sultats.zip";
        assert_eq!(filename_from_content_disposition(header).as_deref(), Some("résultats.zip"));
    }

    #[test]
    fn test_content_disposition_strips_paths() {
        let header = r#"attachment; filename="../../etc/passwd""#;
        assert_eq!(filename_from_content_disposition(header).as_deref(), Some("passwd"));
        assert_eq!(filename_from_content_disposition("inline"), None);
        assert_eq!(filename_from_content_disposition(r#"attachment; filename="""#), None);
    }

    #[test]
    fn test_fallback_file_name() {
        let job = JobId::new("abc-123").unwrap();
        assert_eq!(fallback_file_name(&job), "results_abc-123.zip");
    }
}
