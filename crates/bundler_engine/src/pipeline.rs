use std::sync::Arc;

use service_logging::service_debug;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::archive::{ArchiveError, ZipBundleWriter};
use crate::fetch::{FetchError, ImageFetcher};
use crate::types::Download;

#[derive(Debug, Error)]
pub enum BundleError {
    #[error("fetch failed for {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: FetchError,
    },
    #[error("archive write failed: {0}")]
    Archive(#[from] ArchiveError),
}

/// Fetches every URL concurrently and assembles the results into one zip.
///
/// One task per URL, no concurrency cap. Each task posts its result onto a
/// completion channel; the drain loop below is the only place that touches
/// the archive writer, so entries land in completion order and writes stay
/// serialized. The first fetch failure fails the whole bundle: remaining
/// in-flight tasks are abandoned and their late results discarded with the
/// dropped receiver.
pub async fn bundle_images(
    fetcher: Arc<dyn ImageFetcher>,
    urls: &[String],
) -> Result<Vec<u8>, BundleError> {
    let (tx, mut rx) = mpsc::channel(urls.len().max(1));

    for url in urls {
        let fetcher = Arc::clone(&fetcher);
        let tx = tx.clone();
        let url = url.clone();
        tokio::spawn(async move {
            let result = fetcher.fetch(&url).await;
            let _ = tx.send((url, result)).await;
        });
    }
    drop(tx);

    let mut writer = ZipBundleWriter::new();
    while let Some((url, result)) = rx.recv().await {
        let download = result.map_err(|source| BundleError::Fetch {
            url: url.clone(),
            source,
        })?;
        let Download {
            entry_name, body, ..
        } = download;
        let written = writer
            .write_entry(&entry_name, body)
            .await
            .map_err(|err| match err {
                // A body that dies mid-copy is still that URL's fetch failing.
                ArchiveError::Body(source) => BundleError::Fetch { url, source },
                other => BundleError::Archive(other),
            })?;
        service_debug!("archived entry {entry_name} ({written} bytes)");
    }

    Ok(writer.finish()?)
}
