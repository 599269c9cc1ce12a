use std::io::{Cursor, Write};

use chrono::{Datelike, Local, Timelike};
use futures_util::StreamExt;
use thiserror::Error;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::fetch::FetchError;
use crate::types::BodyStream;

/// Deflate level used for every entry. Middle of the 0-9 range, fixed rather
/// than per-request configurable.
const COMPRESSION_LEVEL: i32 = 3;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("error reading entry body: {0}")]
    Body(FetchError),
}

/// Append-only zip writer over a growing in-memory buffer.
///
/// Only the pipeline's single drain loop ever touches an instance, so no
/// locking is needed. Entries are written in whatever order downloads
/// complete; duplicate names become duplicate entries.
pub struct ZipBundleWriter {
    zip: ZipWriter<Cursor<Vec<u8>>>,
}

impl Default for ZipBundleWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ZipBundleWriter {
    pub fn new() -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    /// Copies one download body into a new entry stamped with the current
    /// wall-clock time. Returns the number of uncompressed bytes written.
    ///
    /// The body is copied chunk by chunk as the transport delivers it; the
    /// whole file is never buffered outside the archive.
    pub async fn write_entry(
        &mut self,
        name: &str,
        mut body: BodyStream,
    ) -> Result<u64, ArchiveError> {
        let options = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(COMPRESSION_LEVEL))
            .last_modified_time(now_as_zip_time());

        self.zip.start_file(name, options)?;

        let mut written = 0u64;
        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(ArchiveError::Body)?;
            self.zip.write_all(&chunk)?;
            written += chunk.len() as u64;
        }

        Ok(written)
    }

    /// Writes the central directory and hands back the finished buffer.
    ///
    /// The returned bytes are a complete, independently re-openable zip
    /// starting at offset 0. On any earlier entry failure the writer is
    /// dropped instead, so a partial archive never escapes.
    pub fn finish(mut self) -> Result<Vec<u8>, ArchiveError> {
        let cursor = self.zip.finish()?;
        Ok(cursor.into_inner())
    }
}

fn now_as_zip_time() -> zip::DateTime {
    let now = Local::now();
    // Zip timestamps only cover 1980-2107; clamp instead of failing an
    // otherwise healthy archive over a bad system clock.
    let year = now.year().clamp(1980, 2107) as u16;
    zip::DateTime::from_date_and_time(
        year,
        now.month() as u8,
        now.day() as u8,
        now.hour() as u8,
        now.minute() as u8,
        now.second().min(59) as u8,
    )
    .unwrap_or_default()
}
