use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{Error, Result};

/// Sends a request and decodes a JSON body, classifying failures by kind.
///
/// `endpoint` is the API path, used only for error messages and logs.
pub(crate) async fn send_json<T: DeserializeOwned>(
    endpoint: &str,
    request: RequestBuilder,
) -> Result<T> {
    let response = request
        .send()
        .await
        .map_err(|source| network_error(endpoint, source))?;

    let status = response.status();
    debug!(endpoint, status = status.as_u16(), "response received");

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(Error::AuthenticationRejected {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
        });
    }
    if !status.is_success() {
        return Err(Error::UnexpectedStatus {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response
        .text()
        .await
        .map_err(|source| network_error(endpoint, source))?;

    serde_json::from_str(&body).map_err(|source| Error::MalformedResponse {
        endpoint: endpoint.to_string(),
        source,
    })
}

fn network_error(endpoint: &str, source: reqwest::Error) -> Error {
    let url = source
        .url()
        .map(ToString::to_string)
        .unwrap_or_else(|| endpoint.to_string());
    Error::NetworkUnreachable { url, source }
}
