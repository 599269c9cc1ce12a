use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("Invalid request body")]
    Malformed,
    #[error("images array missing from request body")]
    MissingImages,
    #[error("token missing from request body")]
    MissingToken,
    #[error("zip_filename missing from request body")]
    MissingZipFilename,
}

// Parsed leniently so that an absent field reports as missing rather than as
// a malformed body.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawRequest {
    images: Option<Vec<String>>,
    token: Option<String>,
    zip_filename: Option<String>,
}

/// A validated bundling request. Immutable once parsed; validation runs
/// before any network call is made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleRequest {
    pub images: Vec<String>,
    pub token: String,
    pub zip_filename: String,
}

impl BundleRequest {
    /// Parses raw body bytes and checks each field for presence in a fixed
    /// order. The checks are independent; there is no cross-field
    /// validation.
    pub fn parse(body: &[u8]) -> Result<Self, RequestError> {
        let raw: RawRequest =
            serde_json::from_slice(body).map_err(|_| RequestError::Malformed)?;

        let images = match raw.images {
            Some(images) if !images.is_empty() => images,
            _ => return Err(RequestError::MissingImages),
        };
        let token = match raw.token {
            Some(token) if !token.is_empty() => token,
            _ => return Err(RequestError::MissingToken),
        };
        let zip_filename = match raw.zip_filename {
            Some(name) if !name.is_empty() => name,
            _ => return Err(RequestError::MissingZipFilename),
        };

        Ok(Self {
            images,
            token,
            zip_filename,
        })
    }
}
