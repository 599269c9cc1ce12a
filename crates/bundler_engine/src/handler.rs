use std::sync::Arc;

use service_logging::{service_error, service_info, service_warn};

use crate::auth::TokenAuthenticator;
use crate::config::{ContentType, ServiceConfig};
use crate::fetch::{FetchSettings, ImageFetcher, ReqwestImageFetcher};
use crate::pipeline::{bundle_images, BundleError};
use crate::request::BundleRequest;

const PLAIN_TEXT: &str = "text/plain; charset=utf-8";

/// Host-agnostic response. The embedding HTTP server copies these fields
/// onto its own reply type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceResponse {
    pub status: u16,
    pub content_type: String,
    pub content_disposition: Option<String>,
    pub body: Vec<u8>,
}

impl ServiceResponse {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: 400,
            content_type: PLAIN_TEXT.to_string(),
            content_disposition: None,
            body: message.into().into_bytes(),
        }
    }

    fn bad_gateway(message: &str) -> Self {
        Self {
            status: 502,
            content_type: PLAIN_TEXT.to_string(),
            content_disposition: None,
            body: message.as_bytes().to_vec(),
        }
    }

    fn archive(bytes: Vec<u8>, filename: &str, content_type: ContentType) -> Self {
        Self {
            status: 200,
            content_type: content_type.as_str().to_string(),
            content_disposition: Some(format!("attachment; filename=\"{filename}\"")),
            body: bytes,
        }
    }
}

/// The whole per-request operation behind one entry point: validate,
/// authenticate (in the auth variant), fetch concurrently, archive, respond.
///
/// Constructed once at process startup; the single HTTP client inside is
/// shared by every fetch task and auth check for the process lifetime.
pub struct BundleService {
    config: ServiceConfig,
    fetcher: Arc<dyn ImageFetcher>,
    authenticator: Option<TokenAuthenticator>,
}

impl BundleService {
    pub fn new(config: ServiceConfig) -> Self {
        let client = reqwest::Client::new();

        let fetcher = Arc::new(ReqwestImageFetcher::new(
            client.clone(),
            FetchSettings {
                request_timeout: config.request_timeout,
                reject_error_status: config.reject_error_status,
            },
        ));

        let authenticator = if config.require_auth {
            if config.auth_endpoint.is_none() {
                service_warn!("auth required but no auth endpoint configured; all tokens will be rejected");
            }
            Some(TokenAuthenticator::new(
                client,
                config.auth_endpoint.clone().unwrap_or_default(),
            ))
        } else {
            None
        };

        Self {
            config,
            fetcher,
            authenticator,
        }
    }

    /// Handles one request body and always produces a response; nothing
    /// escapes as a panic or an unmapped error.
    pub async fn handle(&self, body: &[u8]) -> ServiceResponse {
        service_info!("bundle request received ({} bytes)", body.len());

        let request = match BundleRequest::parse(body) {
            Ok(request) => request,
            Err(err) => return ServiceResponse::bad_request(err.to_string()),
        };

        if let Some(authenticator) = &self.authenticator {
            let outcome = authenticator.authenticate(&request.token).await;
            if !outcome.is_authenticated() {
                return ServiceResponse::bad_request("invalid token");
            }
        }

        service_info!(
            "bundling {} images into {}",
            request.images.len(),
            request.zip_filename
        );

        match bundle_images(Arc::clone(&self.fetcher), &request.images).await {
            Ok(bytes) => {
                service_info!(
                    "archive {} finished ({} bytes)",
                    request.zip_filename,
                    bytes.len()
                );
                ServiceResponse::archive(bytes, &request.zip_filename, self.config.content_type)
            }
            Err(err) => {
                // The URL is logged, never echoed back to the caller.
                match &err {
                    BundleError::Fetch { url, source } => {
                        service_error!("image fetch failed for {url}: {source}");
                    }
                    BundleError::Archive(archive) => {
                        service_error!("archive write failed: {archive}");
                    }
                }
                ServiceResponse::bad_gateway("failed to assemble image archive")
            }
        }
    }
}
