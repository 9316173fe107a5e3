//! Fetch-backed transport for the browser.

use gloo_net::http::Request;
use predict_client::{RawReply, Transport, TransportError};

/// Transport over the browser's `fetch`.
pub struct GlooTransport;

impl Transport for GlooTransport {
    async fn post_json(&self, url: &str, body: String) -> Result<RawReply, TransportError> {
        let response = Request::post(url)
            .header("Content-Type", "application/json")
            .body(body)
            .map_err(fetch_error)?
            .send()
            .await
            .map_err(fetch_error)?;

        let status = response.status();
        let body = response.binary().await.map_err(fetch_error)?;

        Ok(RawReply { status, body })
    }
}

fn fetch_error(e: gloo_net::Error) -> TransportError {
    web_sys::console::error_1(&format!("Prediction request failed: {}", e).into());
    TransportError::Fetch(e.to_string())
}
