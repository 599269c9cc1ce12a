use serde::Serialize;
use service_logging::service_info;

/// Result of the external token check.
///
/// Transport failures get their own state so that collapsing them into a
/// rejection stays a visible policy decision in the caller, not a buried
/// catch branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    Authenticated,
    Rejected,
    CheckFailed(String),
}

impl AuthOutcome {
    /// The handler's policy: only a positive answer from the endpoint
    /// authenticates; `CheckFailed` counts as rejected.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthOutcome::Authenticated)
    }
}

#[derive(Serialize)]
struct AuthRequest<'a> {
    token: &'a str,
}

/// Thin client for the external authentication endpoint.
#[derive(Debug, Clone)]
pub struct TokenAuthenticator {
    client: reqwest::Client,
    endpoint: String,
}

impl TokenAuthenticator {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// Single POST of `{ "token": ... }`. HTTP 200 authenticates, any other
    /// status rejects, and transport errors are logged and swallowed into
    /// `CheckFailed`; nothing propagates past this boundary.
    pub async fn authenticate(&self, token: &str) -> AuthOutcome {
        let result = self
            .client
            .post(&self.endpoint)
            .json(&AuthRequest { token })
            .send()
            .await;

        match result {
            Ok(response) if response.status() == reqwest::StatusCode::OK => {
                AuthOutcome::Authenticated
            }
            Ok(response) => {
                service_info!("auth endpoint rejected token (status {})", response.status());
                AuthOutcome::Rejected
            }
            Err(err) => {
                service_info!("auth check failed: {err}");
                AuthOutcome::CheckFailed(err.to_string())
            }
        }
    }
}
