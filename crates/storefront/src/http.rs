//! Shared HTTP plumbing for the catalog, content and gallery clients.

use std::time::Duration;

use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

/// Errors that can occur when talking to a remote API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Request URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the remote API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Remote API answered, but with data that does not match the request.
    #[error("Unexpected response: {0}")]
    Unexpected(String),

    /// Remote API returned a non-success status.
    #[error("API error: {status} - {body}")]
    Status { status: u16, body: String },
}

/// Build a `reqwest` client with the configured timeout.
pub(crate) fn build_client(timeout: Duration) -> Result<reqwest::Client, ApiError> {
    Ok(reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("rocketshoes/", env!("CARGO_PKG_VERSION")))
        .build()?)
}

/// `GET` a URL and decode the JSON body.
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: Url,
) -> Result<T, ApiError> {
    let response = client.get(url.clone()).send().await?;
    read_json(url, response).await
}

/// Check the status of a response and decode its JSON body.
pub(crate) async fn read_json<T: DeserializeOwned>(
    url: Url,
    response: reqwest::Response,
) -> Result<T, ApiError> {
    let status = response.status();

    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound(url.path().to_string()));
    }

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(1);
        return Err(ApiError::RateLimited(retry_after));
    }

    // Read the body as text first for better error diagnostics
    let body = response.text().await?;

    if !status.is_success() {
        tracing::error!(
            status = %status,
            url = %url,
            body = %body.chars().take(500).collect::<String>(),
            "API returned non-success status"
        );
        return Err(ApiError::Status {
            status: status.as_u16(),
            body: body.chars().take(200).collect(),
        });
    }

    serde_json::from_str(&body).map_err(|e| {
        tracing::error!(
            error = %e,
            url = %url,
            body = %body.chars().take(500).collect::<String>(),
            "Failed to parse API response"
        );
        ApiError::Parse(e)
    })
}

/// Check the status of a response whose body is not needed.
pub(crate) async fn expect_success(url: Url, response: reqwest::Response) -> Result<(), ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound(url.path().to_string()));
    }

    let body = response.text().await.unwrap_or_default();
    tracing::error!(
        status = %status,
        url = %url,
        body = %body.chars().take(500).collect::<String>(),
        "API returned non-success status"
    );
    Err(ApiError::Status {
        status: status.as_u16(),
        body: body.chars().take(200).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::NotFound("/stock/9".to_string());
        assert_eq!(err.to_string(), "Not found: /stock/9");

        let err = ApiError::Status {
            status: 502,
            body: "bad gateway".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 502 - bad gateway");
    }

    #[test]
    fn test_rate_limited_error() {
        let err = ApiError::RateLimited(60);
        assert_eq!(err.to_string(), "Rate limited, retry after 60 seconds");
    }
}
