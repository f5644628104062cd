//! Upload of MiniSEED batches to the job server.

use gloo_net::http::Request;
use seisweb::models::UPLOAD_FILES_FIELD;
use seisweb::{ClientError, ClientResult, Endpoints, FileCandidate, FileValidator, UploadOptions, UploadResponse};
use web_sys::{File, FormData, HtmlInputElement};

use super::http::{browser_error, read_json, send, transport};

/// Name and size of a browser file, as seen by the validator.
pub fn candidate(file: &File) -> FileCandidate {
    FileCandidate::new(file.name(), file.size() as u64)
}

/// Files currently selected in a file input.
pub fn selected_files(input: &HtmlInputElement) -> Vec<File> {
    let Some(list) = input.files() else {
        return Vec::new();
    };
    (0..list.length()).filter_map(|i| list.get(i)).collect()
}

/// Validate the batch, then post it as `multipart/form-data`.
///
/// A rejected batch never leaves the browser.
pub async fn upload_files(
    endpoints: &Endpoints,
    validator: &FileValidator,
    files: &[File],
    options: &UploadOptions,
) -> ClientResult<UploadResponse> {
    let candidates: Vec<FileCandidate> = files.iter().map(candidate).collect();
    let total = validator.check_upload(&candidates).map_err(ClientError::Validation)?;

    let form_data = FormData::new().map_err(browser_error)?;
    for file in files {
        form_data
            .append_with_blob_and_filename(UPLOAD_FILES_FIELD, file, &file.name())
            .map_err(browser_error)?;
    }
    for (name, value) in options.form_fields() {
        form_data.append_with_str(name, &value).map_err(browser_error)?;
    }

    log::info!(
        "Uploading {} file(s), {} bytes, window {} min, dataset {}",
        files.len(),
        total,
        options.window_length,
        options.dataset
    );

    let request = Request::post(&endpoints.upload()).body(form_data).map_err(transport)?;
    let response = send(request).await?;
    let upload: UploadResponse = read_json(response).await?;

    log::info!("Job {} accepted: {}", upload.job_id, upload.message);
    Ok(upload)
}

