//! URLs of the job server.
//!
//! | Method | Path               | Description                       |
//! |--------|--------------------|-----------------------------------|
//! | POST   | `/upload`          | Upload MiniSEED files, start a job |
//! | GET    | `/progress/<job>`  | Job status (polled)               |
//! | GET    | `/results/<job>`   | Server-rendered results page      |
//! | GET    | `/download/<job>`  | Results archive (zip)             |
//! | POST   | `/cleanup/<job>`   | Drop uploaded files and job state |

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::models::JobId;

/// Characters escaped in a job id path segment.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

/// Builds job server URLs from a base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: String,
}

impl Endpoints {
    /// A trailing `/` on the base is ignored. An empty base yields
    /// origin-relative paths.
    pub fn new(base_url: &str) -> Self {
        Self {
            base: base_url.trim().trim_end_matches('/').to_string(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn upload(&self) -> String {
        format!("{}/upload", self.base)
    }

    pub fn progress(&self, job: &JobId) -> String {
        self.job_url("progress", job)
    }

    pub fn results(&self, job: &JobId) -> String {
        self.job_url("results", job)
    }

    pub fn download(&self, job: &JobId) -> String {
        self.job_url("download", job)
    }

    pub fn cleanup(&self, job: &JobId) -> String {
        self.job_url("cleanup", job)
    }

    fn job_url(&self, route: &str, job: &JobId) -> String {
        format!(
            "{}/{}/{}",
            self.base,
            route,
            utf8_percent_encode(job.as_str(), SEGMENT)
        )
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_BACKEND_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_urls() {
        let endpoints = Endpoints::new("http://localhost:5000/");
        let job = JobId::new("0fc400d3-0494-4833-9fee-a5863b90a63f").unwrap();

        assert_eq!(endpoints.upload(), "http://localhost:5000/upload");
        assert_eq!(
            endpoints.progress(&job),
            "http://localhost:5000/progress/0fc400d3-0494-4833-9fee-a5863b90a63f"
        );
        assert_eq!(endpoints.download(&job), "http://localhost:5000/download/0fc400d3-0494-4833-9fee-a5863b90a63f");
        assert_eq!(endpoints.cleanup(&job), "http://localhost:5000/cleanup/0fc400d3-0494-4833-9fee-a5863b90a63f");
        assert_eq!(endpoints.results(&job), "http://localhost:5000/results/0fc400d3-0494-4833-9fee-a5863b90a63f");
    }

    #[test]
    fn test_job_id_is_escaped() {
        let endpoints = Endpoints::new("https://seis.example.org");
        let job = JobId::new("a/b c").unwrap();
        assert_eq!(endpoints.progress(&job), "https://seis.example.org/progress/a%2Fb%20c");
    }

    #[test]
    fn test_relative_base() {
        let endpoints = Endpoints::new("");
        let job = JobId::new("j1").unwrap();
        assert_eq!(endpoints.progress(&job), "/progress/j1");
        assert_eq!(endpoints.upload(), "/upload");
    }
}
