//! Request helpers shared by the services.

use gloo_net::http::{Request, Response};
use seisweb::{ClientError, ClientResult, ServerError, TransportError};
use wasm_bindgen::JsValue;

/// Network-level failure reported by `gloo-net`.
pub fn transport(err: gloo_net::Error) -> TransportError {
    TransportError(err.to_string())
}

/// A browser API call (FormData, Blob, URL) failed.
pub fn browser_error(err: JsValue) -> ClientError {
    let detail = err.as_string().unwrap_or_else(|| format!("{:?}", err));
    ClientError::Transport(TransportError(detail))
}

/// Send a request and turn non-success statuses into [`ServerError`].
pub async fn send(request: Request) -> ClientResult<Response> {
    let response = request.send().await.map_err(transport)?;
    ensure_success(response).await
}

/// Pass successful responses through; read the error body otherwise.
pub async fn ensure_success(response: Response) -> ClientResult<Response> {
    if response.ok() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    log::warn!("Server answered {}: {}", status, body);
    Err(ServerError::from_body(status, &body).into())
}

/// Decode a JSON body.
pub async fn read_json<T: serde::de::DeserializeOwned>(response: Response) -> ClientResult<T> {
    let body = response.text().await.map_err(transport)?;
    serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))
}
