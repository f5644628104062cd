//! Results archive download and job cleanup.

use gloo_net::http::Request;
use js_sys::{Array, Reflect, Uint8Array};
use seisweb::{
    fallback_file_name, filename_from_content_disposition, ClientResult, DownloadProgress, Endpoints, JobId,
};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, HtmlAnchorElement, ReadableStreamDefaultReader, Url};

use super::http::{browser_error, read_json, send, transport};

/// Stream the results archive of `job_id` and hand it to the browser as a
/// file download.
///
/// `on_progress` is called after every received chunk. Returns the file
/// name the archive was saved under.
pub async fn download_results<P>(endpoints: &Endpoints, job_id: &JobId, mut on_progress: P) -> ClientResult<String>
where
    P: FnMut(&DownloadProgress),
{
    let request = Request::get(&endpoints.download(job_id)).build().map_err(transport)?;
    let response = send(request).await?;

    let headers = response.headers();
    let mut progress = DownloadProgress::from_content_length(headers.get("content-length").as_deref());
    let file_name = headers
        .get("content-disposition")
        .and_then(|value| filename_from_content_disposition(&value))
        .unwrap_or_else(|| fallback_file_name(job_id));

    let chunks = Array::new();
    match response.body() {
        Some(stream) => {
            let reader: ReadableStreamDefaultReader = stream.get_reader().unchecked_into();
            while let Some(chunk) = next_chunk(&reader).await? {
                progress.advance(chunk.length() as usize);
                chunks.push(&chunk);
                on_progress(&progress);
            }
        }
        None => {
            let bytes = response.binary().await.map_err(transport)?;
            progress.advance(bytes.len());
            chunks.push(&Uint8Array::from(bytes.as_slice()));
            on_progress(&progress);
        }
    }

    let blob = Blob::new_with_u8_array_sequence(&chunks).map_err(browser_error)?;
    save_blob(&blob, &file_name).map_err(browser_error)?;

    log::info!("Saved {} ({} bytes)", file_name, progress.loaded());
    Ok(file_name)
}

/// Read one chunk; `None` once the stream is done.
async fn next_chunk(reader: &ReadableStreamDefaultReader) -> ClientResult<Option<Uint8Array>> {
    let result = JsFuture::from(reader.read()).await.map_err(browser_error)?;
    let done = Reflect::get(&result, &JsValue::from_str("done"))
        .map_err(browser_error)?
        .as_bool()
        .unwrap_or(true);
    if done {
        return Ok(None);
    }
    let value = Reflect::get(&result, &JsValue::from_str("value")).map_err(browser_error)?;
    value.dyn_into::<Uint8Array>().map(Some).map_err(browser_error)
}

/// Offer a blob as a download through a temporary anchor.
fn save_blob(blob: &Blob, file_name: &str) -> Result<(), JsValue> {
    let url = Url::create_object_url_with_blob(blob)?;
    let document = gloo_utils::document();
    let anchor: HtmlAnchorElement = document.create_element("a")?.unchecked_into();
    anchor.set_href(&url);
    anchor.set_download(file_name);

    let body = gloo_utils::body();
    body.append_child(&anchor)?;
    anchor.click();
    body.remove_child(&anchor)?;

    Url::revoke_object_url(&url)
}

#[derive(serde::Deserialize)]
struct CleanupResponse {
    #[serde(default)]
    message: String,
}

/// Ask the server to delete the job's files. Returns the server's message.
pub async fn cleanup_job(endpoints: &Endpoints, job_id: &JobId) -> ClientResult<String> {
    let request = Request::post(&endpoints.cleanup(job_id)).build().map_err(transport)?;
    let response = send(request).await?;
    let cleanup: CleanupResponse = read_json(response).await?;
    log::info!("Job {} cleaned up", job_id);
    Ok(cleanup.message)
}
