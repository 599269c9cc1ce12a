//! Bundler engine: request validation, concurrent image fetching and zip
//! assembly for the image bundling service.
mod archive;
mod auth;
mod config;
mod entry_name;
mod fetch;
mod handler;
mod pipeline;
mod request;
mod types;

pub use archive::{ArchiveError, ZipBundleWriter};
pub use auth::{AuthOutcome, TokenAuthenticator};
pub use config::{ContentType, ServiceConfig, SettingsFile, SETTINGS_FILE};
pub use entry_name::derived_entry_name;
pub use fetch::{FetchError, FetchSettings, ImageFetcher, ReqwestImageFetcher};
pub use handler::{BundleService, ServiceResponse};
pub use pipeline::{bundle_images, BundleError};
pub use request::{BundleRequest, RequestError};
pub use types::{BodyStream, Download};
