use std::pin::Pin;

use bytes::Bytes;
use futures_util::Stream;

use crate::fetch::FetchError;

/// Async byte stream produced by a fetch. Consumed exactly once, chunk by
/// chunk, by the archive writer.
pub type BodyStream = Pin<Box<dyn Stream<Item = Result<Bytes, FetchError>> + Send>>;

/// One completed fetch, owned by its task until handed to the archive writer.
pub struct Download {
    /// The URL the bytes were fetched from.
    pub url: String,
    /// Archive entry name derived from the URL's final path segment.
    pub entry_name: String,
    /// The response body. Nothing is buffered until the writer drains this.
    pub body: BodyStream,
}

impl std::fmt::Debug for Download {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Download")
            .field("url", &self.url)
            .field("entry_name", &self.entry_name)
            .finish_non_exhaustive()
    }
}
