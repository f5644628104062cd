//! HTTP client for the job server.
//!
//! Wraps a `reqwest::Client` and implements [`StatusSource`] so it can drive a
//! [`crate::ProgressPoller`] directly.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, CONTENT_DISPOSITION, CONTENT_LENGTH};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::ClientConfig;
use crate::download::{fallback_file_name, filename_from_content_disposition, DownloadProgress};
use crate::endpoints::Endpoints;
use crate::error::{ClientError, ClientResult, PollError, PollResult, ServerError, TransportError};
use crate::models::{
    FileCandidate, JobId, JobStatus, ProgressSnapshot, UploadOptions, UploadResponse, UPLOAD_FILES_FIELD,
};
use crate::poller::StatusSource;
use crate::validator::FileValidator;

/// A file held in memory, ready to upload.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self { name: name.into(), bytes }
    }

    /// Read a file from disk, keeping only its file name.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(name, std::fs::read(path)?))
    }

    pub fn candidate(&self) -> FileCandidate {
        FileCandidate::new(self.name.clone(), self.bytes.len() as u64)
    }
}

/// What a finished download produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadSummary {
    /// Name from `Content-Disposition`, or the fallback name
    pub file_name: String,
    pub bytes: u64,
}

#[derive(Deserialize)]
struct CleanupResponse {
    #[serde(default)]
    message: String,
}

/// Client for upload, status, download and cleanup requests.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    endpoints: Endpoints,
    validator: FileValidator,
}

impl HttpClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Use a preconfigured `reqwest::Client` (timeouts, proxies, ...).
    pub fn with_client(client: reqwest::Client, config: &ClientConfig) -> Self {
        Self {
            client,
            endpoints: Endpoints::new(&config.backend_url),
            validator: FileValidator::new(config.validator.clone()),
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Fetch one status observation.
    pub async fn fetch_status(&self, job: &JobId) -> PollResult<ProgressSnapshot> {
        let response = self
            .client
            .get(self.endpoints.progress(job))
            .send()
            .await
            .map_err(transport)?;
        let status: JobStatus = read_json(response).await.map_err(|e| match e {
            ClientError::Transport(t) => PollError::Transport(t),
            ClientError::Server(s) => PollError::Server(s),
            ClientError::Decode(msg) => PollError::Decode(msg),
            other => PollError::Decode(other.to_string()),
        })?;
        Ok(status.into())
    }

    /// Validate `files` and upload them, starting a job.
    ///
    /// An invalid batch is rejected with [`ClientError::Validation`] and
    /// nothing is sent.
    pub async fn upload(&self, files: Vec<UploadFile>, options: &UploadOptions) -> ClientResult<UploadResponse> {
        let candidates: Vec<FileCandidate> = files.iter().map(UploadFile::candidate).collect();
        let total = self
            .validator
            .check_upload(&candidates)
            .map_err(ClientError::Validation)?;

        log::info!("Uploading {} file(s), {} bytes", files.len(), total);

        let mut form = Form::new();
        for (name, value) in options.form_fields() {
            form = form.text(name, value);
        }
        for file in files {
            form = form.part(UPLOAD_FILES_FIELD, Part::bytes(file.bytes).file_name(file.name));
        }

        let response = self
            .client
            .post(self.endpoints.upload())
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;
        let uploaded: UploadResponse = read_json(response).await?;

        log::info!("Job {} started: {}", uploaded.job_id, uploaded.message);
        Ok(uploaded)
    }

    /// Stream a job's results archive into `writer`.
    ///
    /// `on_progress` is called after every chunk.
    pub async fn download_to<W, P>(&self, job: &JobId, writer: &mut W, mut on_progress: P) -> ClientResult<DownloadSummary>
    where
        W: Write,
        P: FnMut(&DownloadProgress),
    {
        let mut response = self
            .client
            .get(self.endpoints.download(job))
            .send()
            .await
            .map_err(transport)?;
        ensure_success(&mut response).await?;

        let headers = response.headers();
        let file_name = header_str(headers, CONTENT_DISPOSITION)
            .and_then(filename_from_content_disposition)
            .unwrap_or_else(|| fallback_file_name(job));
        let mut progress = DownloadProgress::from_content_length(header_str(headers, CONTENT_LENGTH));

        while let Some(chunk) = response.chunk().await.map_err(transport)? {
            writer.write_all(&chunk)?;
            progress.advance(chunk.len());
            on_progress(&progress);
        }
        writer.flush()?;

        log::info!("Downloaded {} ({} bytes)", file_name, progress.loaded());
        Ok(DownloadSummary {
            file_name,
            bytes: progress.loaded(),
        })
    }

    /// Download a job's results archive into `dir`, returning the file path.
    pub async fn download_file<P>(&self, job: &JobId, dir: &Path, on_progress: P) -> ClientResult<PathBuf>
    where
        P: FnMut(&DownloadProgress),
    {
        let partial = dir.join(format!(".{}.part", fallback_file_name(job)));
        let mut writer = BufWriter::new(File::create(&partial)?);

        let summary = match self.download_to(job, &mut writer, on_progress).await {
            Ok(summary) => summary,
            Err(e) => {
                drop(writer);
                let _ = std::fs::remove_file(&partial);
                return Err(e);
            }
        };
        drop(writer);

        let target = dir.join(&summary.file_name);
        if let Err(e) = std::fs::rename(&partial, &target) {
            let _ = std::fs::remove_file(&partial);
            return Err(e.into());
        }
        Ok(target)
    }

    /// Ask the server to drop a job's uploads and state.
    pub async fn cleanup(&self, job: &JobId) -> ClientResult<String> {
        let response = self
            .client
            .post(self.endpoints.cleanup(job))
            .send()
            .await
            .map_err(transport)?;
        let body: CleanupResponse = read_json(response).await?;
        log::info!("Cleaned up job {}", job);
        Ok(body.message)
    }
}

#[async_trait(?Send)]
impl StatusSource for HttpClient {
    async fn fetch_status(&self, job_id: &JobId) -> PollResult<ProgressSnapshot> {
        HttpClient::fetch_status(self, job_id).await
    }
}

fn transport(err: reqwest::Error) -> TransportError {
    TransportError(err.to_string())
}

fn header_str(headers: &HeaderMap, name: HeaderName) -> Option<&str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Turn a non-success response into a [`ServerError`] built from its body.
async fn ensure_success(response: &mut reqwest::Response) -> ClientResult<()> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await.map_err(transport)? {
        body.extend_from_slice(&chunk);
    }
    Err(ServerError::from_body(status.as_u16(), &String::from_utf8_lossy(&body)).into())
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
    let status = response.status();
    let body = response.text().await.map_err(transport)?;

    if !status.is_success() {
        return Err(ServerError::from_body(status.as_u16(), &body).into());
    }

    serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))
}
