use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use service_logging::service_warn;

/// Optional settings file read from the working directory at startup.
pub const SETTINGS_FILE: &str = "local.settings.json";

/// Media type reported for the finished archive, per deployment variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentType {
    #[default]
    Zip,
    OctetStream,
}

impl ContentType {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::Zip => "application/zip",
            ContentType::OctetStream => "application/octet-stream",
        }
    }
}

/// Shape of `local.settings.json`. Every field is optional; environment
/// variables override whatever the file provides.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SettingsFile {
    pub auth_endpoint: Option<String>,
    pub require_auth: Option<bool>,
    pub content_type: Option<String>,
    pub reject_error_status: Option<bool>,
    pub fetch_timeout_secs: Option<u64>,
}

/// Resolved process configuration: built once at startup, immutable after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// External token-check endpoint, consumed only when auth is required.
    pub auth_endpoint: Option<String>,
    /// Whether the authenticated deployment variant is active.
    pub require_auth: bool,
    pub content_type: ContentType,
    /// When set, non-2xx image responses fail the fetch instead of being
    /// archived. Off by default to keep the original lenient behavior.
    pub reject_error_status: bool,
    /// Optional per-fetch deadline. None by default: a fetch may wait as
    /// long as the HTTP client allows.
    pub request_timeout: Option<Duration>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            auth_endpoint: None,
            require_auth: false,
            content_type: ContentType::default(),
            reject_error_status: false,
            request_timeout: None,
        }
    }
}

impl ServiceConfig {
    /// Reads `local.settings.json` (if present) and merges the environment
    /// over it.
    pub fn load() -> Self {
        let file = read_settings_file(Path::new(SETTINGS_FILE));
        Self::from_sources(file, |key| std::env::var(key).ok())
    }

    /// Merge rule: environment wins over file, file wins over defaults.
    /// `require_auth` defaults to true exactly when an auth endpoint is
    /// configured.
    pub fn from_sources(file: SettingsFile, env: impl Fn(&str) -> Option<String>) -> Self {
        let auth_endpoint = env("AUTH_ENDPOINT")
            .or(file.auth_endpoint)
            .filter(|value| !value.is_empty());

        let require_auth = env("REQUIRE_AUTH")
            .and_then(|value| parse_bool(&value))
            .or(file.require_auth)
            .unwrap_or(auth_endpoint.is_some());

        let content_type = env("CONTENT_TYPE")
            .or(file.content_type)
            .map(|value| parse_content_type(&value))
            .unwrap_or_default();

        let reject_error_status = env("REJECT_ERROR_STATUS")
            .and_then(|value| parse_bool(&value))
            .or(file.reject_error_status)
            .unwrap_or(false);

        let request_timeout = env("FETCH_TIMEOUT_SECS")
            .and_then(|value| value.parse().ok())
            .or(file.fetch_timeout_secs)
            .map(Duration::from_secs);

        Self {
            auth_endpoint,
            require_auth,
            content_type,
            reject_error_status,
            request_timeout,
        }
    }
}

fn read_settings_file(path: &Path) -> SettingsFile {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(_) => return SettingsFile::default(),
    };
    match serde_json::from_slice(&bytes) {
        Ok(settings) => settings,
        Err(err) => {
            service_warn!("ignoring unreadable {}: {err}", path.display());
            SettingsFile::default()
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

fn parse_content_type(value: &str) -> ContentType {
    match value.to_ascii_lowercase().as_str() {
        "zip" | "application/zip" => ContentType::Zip,
        "octet-stream" | "application/octet-stream" => ContentType::OctetStream,
        other => {
            service_warn!("unknown content type setting {other:?}; using application/zip");
            ContentType::Zip
        }
    }
}
