//! Server Command Wrappers
//!
//! Frontend bindings to the queue server's HTTP endpoints, organized by domain.

mod queue;
mod station;

use serde::de::DeserializeOwned;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

use reorder::SubmitError;
use crate::models::ApiErrorBody;

// Re-export all public items
pub use queue::*;
pub use station::*;

const DEFAULT_API_BASE: &str = "http://127.0.0.1:8787";

/// Server base URL from `<meta name="queue-api" content="...">`
pub fn api_base() -> String {
    web_sys::window()
        .and_then(|win| win.document())
        .and_then(|doc| doc.query_selector("meta[name=\"queue-api\"]").ok().flatten())
        .and_then(|meta| meta.get_attribute("content"))
        .map(|base| base.trim_end_matches('/').to_string())
        .filter(|base| !base.is_empty())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
}

fn js_error(err: JsValue) -> SubmitError {
    SubmitError::Network(err.as_string().unwrap_or_else(|| format!("{:?}", err)))
}

/// Send a request; any non-2xx status becomes `SubmitError::Rejected`
async fn send(method: &str, path: &str, body: Option<String>) -> Result<Option<JsValue>, SubmitError> {
    let opts = RequestInit::new();
    opts.set_method(method);
    if let Some(body) = body {
        opts.set_body(&JsValue::from_str(&body));
    }

    let url = format!("{}{}", api_base(), path);
    let request = Request::new_with_str_and_init(&url, &opts).map_err(js_error)?;
    request.headers().set("Content-Type", "application/json").map_err(js_error)?;

    let window = web_sys::window().ok_or_else(|| SubmitError::Network("no window".to_string()))?;
    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(js_error)?
        .dyn_into()
        .map_err(|_| SubmitError::Decode("not a fetch Response".to_string()))?;

    if !response.ok() {
        let detail = match response.json() {
            Ok(promise) => JsFuture::from(promise)
                .await
                .ok()
                .and_then(|value| serde_wasm_bindgen::from_value::<ApiErrorBody>(value).ok())
                .map(|body| body.message),
            Err(_) => None,
        };
        return Err(SubmitError::Rejected { status: response.status(), detail });
    }
    if response.status() == 204 {
        return Ok(None);
    }

    let promise = response.json().map_err(|e| SubmitError::Decode(format!("{:?}", e)))?;
    let value = JsFuture::from(promise)
        .await
        .map_err(|e| SubmitError::Decode(format!("{:?}", e)))?;
    Ok(Some(value))
}

async fn get_json<T: DeserializeOwned>(path: &str) -> Result<T, SubmitError> {
    decode(send("GET", path, None).await?)
}

async fn post_json<T: DeserializeOwned>(path: &str, body: &impl serde::Serialize) -> Result<T, SubmitError> {
    let body = serde_json::to_string(body).map_err(|e| SubmitError::Decode(e.to_string()))?;
    decode(send("POST", path, Some(body)).await?)
}

fn decode<T: DeserializeOwned>(value: Option<JsValue>) -> Result<T, SubmitError> {
    let value = value.ok_or_else(|| SubmitError::Decode("empty response".to_string()))?;
    serde_wasm_bindgen::from_value(value).map_err(|e| SubmitError::Decode(e.to_string()))
}
