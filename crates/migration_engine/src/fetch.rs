use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;

use crate::{FailureKind, FetchError, FetchMetadata, FetchOutput};

pub const USER_AGENT: &str = "Mozilla/5.0 (Ghost-to-WordPress Migration Bot)";

/// Timeouts and size limits for every outbound request of a run.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub feed_timeout: Duration,
    pub page_timeout: Duration,
    pub download_timeout: Duration,
    pub upload_timeout: Duration,
    pub post_timeout: Duration,
    pub max_page_bytes: u64,
    pub max_asset_bytes: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            feed_timeout: Duration::from_secs(30),
            page_timeout: Duration::from_secs(10),
            download_timeout: Duration::from_secs(30),
            upload_timeout: Duration::from_secs(60),
            post_timeout: Duration::from_secs(30),
            max_page_bytes: 20 * 1024 * 1024,
            max_asset_bytes: 100 * 1024 * 1024,
        }
    }
}

/// Shared client for all source-side and target-side calls.
pub fn build_client(settings: &FetchSettings) -> Result<reqwest::Client, FetchError> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(settings.connect_timeout)
        .build()
        .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))
}

/// GET `url` and collect the body, failing on non-2xx or more than `max_bytes`.
pub async fn fetch_bytes(
    client: &reqwest::Client,
    url: &str,
    timeout: Duration,
    max_bytes: u64,
) -> Result<FetchOutput, FetchError> {
    let parsed = reqwest::Url::parse(url)
        .map_err(|err| FetchError::new(FailureKind::InvalidUrl, format!("{url}: {err}")))?;

    let response = client
        .get(parsed)
        .timeout(timeout)
        .send()
        .await
        .map_err(map_reqwest_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::new(
            FailureKind::HttpStatus(status.as_u16()),
            status.to_string(),
        ));
    }

    if let Some(content_len) = response.content_length() {
        if content_len > max_bytes {
            return Err(FetchError::new(
                FailureKind::TooLarge {
                    max_bytes,
                    actual: Some(content_len),
                },
                "response too large",
            ));
        }
    }

    let final_url = response.url().to_string();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string());

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(map_reqwest_error)?;
        let next_len = bytes.len() as u64 + chunk.len() as u64;
        if next_len > max_bytes {
            return Err(FetchError::new(
                FailureKind::TooLarge {
                    max_bytes,
                    actual: Some(next_len),
                },
                "response too large",
            ));
        }
        bytes.extend_from_slice(&chunk);
    }

    let metadata = FetchMetadata {
        original_url: url.to_string(),
        final_url,
        content_type,
        byte_len: bytes.len() as u64,
    };

    Ok(FetchOutput { bytes, metadata })
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
