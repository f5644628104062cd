//! Browser implementations of the polling seams.

use std::time::Duration;

use async_trait::async_trait;
use gloo_net::http::Request;
use seisweb::models::JobStatus;
use seisweb::{Endpoints, JobId, PollError, PollResult, ProgressSnapshot, ServerError, StatusSource, Timer};

use super::http::transport;

/// Fetches `GET /progress/<job>` with `gloo-net`.
#[derive(Debug, Clone)]
pub struct FetchStatusSource {
    endpoints: Endpoints,
}

impl FetchStatusSource {
    pub fn new(endpoints: Endpoints) -> Self {
        Self { endpoints }
    }
}

#[async_trait(?Send)]
impl StatusSource for FetchStatusSource {
    async fn fetch_status(&self, job_id: &JobId) -> PollResult<ProgressSnapshot> {
        let url = self.endpoints.progress(job_id);
        let response = Request::get(&url).send().await.map_err(transport)?;

        let status = response.status();
        let body = response.text().await.map_err(transport)?;
        if !response.ok() {
            return Err(ServerError::from_body(status, &body).into());
        }

        parse_status(&body)
    }
}

fn parse_status(body: &str) -> PollResult<ProgressSnapshot> {
    let status: JobStatus = serde_json::from_str(body).map_err(|e| PollError::Decode(e.to_string()))?;
    Ok(status.into())
}

/// Sleeps with `setTimeout` through `gloo-timers`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooTimer;

#[async_trait(?Send)]
impl Timer for GlooTimer {
    async fn sleep(&self, duration: Duration) {
        gloo_timers::future::sleep(duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_running_status() {
        let snapshot = parse_status(r#"{"percentage": 42.5, "message": "Procesando archivo 2 de 4", "completed": false, "current": 2, "total": 4}"#).unwrap();
        assert_eq!(snapshot.percentage, 42.5);
        assert!(!snapshot.completed);
        assert!(!snapshot.is_failure());
    }

    #[test]
    fn test_parse_failed_job() {
        let snapshot = parse_status(r#"{"percentage": 100, "message": "Error: corrupt record", "completed": true, "error": true}"#).unwrap();
        assert!(snapshot.completed);
        assert_eq!(snapshot.error_message.as_deref(), Some("Error: corrupt record"));
    }

    #[test]
    fn test_parse_garbage_is_decode_error() {
        assert!(matches!(parse_status("<html>"), Err(PollError::Decode(_))));
    }
}
