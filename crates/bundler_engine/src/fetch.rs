use std::time::Duration;

use futures_util::StreamExt;
use thiserror::Error;

use crate::entry_name::derived_entry_name;
use crate::types::Download;

/// Per-fetch behavior toggles. The defaults reproduce the service's original
/// lenient behavior: no deadline beyond the client's own, and HTTP error
/// statuses archived like any other body.
#[derive(Debug, Clone, Default)]
pub struct FetchSettings {
    /// Optional per-request deadline. `None` waits as long as the client does.
    pub request_timeout: Option<Duration>,
    /// Treat non-2xx responses as failures instead of archiving their bodies.
    pub reject_error_status: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("http status {0}")]
    Status(u16),
    #[error("timeout")]
    Timeout,
    #[error("transport error: {0}")]
    Transport(String),
}

/// Single-attempt GET of one image. Implementations must be safe to call
/// from many tasks at once; the archive side never is.
#[async_trait::async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Download, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestImageFetcher {
    client: reqwest::Client,
    settings: FetchSettings,
}

impl ReqwestImageFetcher {
    /// The client is shared across all concurrent fetches of a process.
    pub fn new(client: reqwest::Client, settings: FetchSettings) -> Self {
        Self { client, settings }
    }
}

#[async_trait::async_trait]
impl ImageFetcher for ReqwestImageFetcher {
    async fn fetch(&self, url: &str) -> Result<Download, FetchError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|err| FetchError::InvalidUrl(err.to_string()))?;

        let mut request = self.client.get(parsed);
        if let Some(timeout) = self.settings.request_timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if self.settings.reject_error_status && !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(map_reqwest_error));

        Ok(Download {
            url: url.to_string(),
            entry_name: derived_entry_name(url),
            body: Box::pin(body),
        })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::Timeout;
    }
    FetchError::Transport(err.to_string())
}
