//! Artifact download and integrity check.
//!
//! Downloads are streamed straight to disk, then the file is read back and
//! hashed with SHA-256. Nothing is buffered whole in memory, so artifacts of
//! hundreds of megabytes are fine.

use crate::backend::Backend;
use crate::error::{Error, Result};
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{self, BufWriter, Read};
use std::path::{Path, PathBuf};

/// Receives progress updates while an artifact downloads.
pub trait DownloadProgress {
    /// Called before the first byte, with the size published in the catalog.
    fn on_start(&self, filename: &str, expected_size: Option<u64>);

    /// Called as bytes are written.
    fn on_advance(&self, bytes: u64);

    /// Called once the body has been fully written.
    fn on_finish(&self);
}

/// No-op progress callback.
pub struct NoProgress;

impl DownloadProgress for NoProgress {
    fn on_start(&self, _filename: &str, _expected_size: Option<u64>) {}
    fn on_advance(&self, _bytes: u64) {}
    fn on_finish(&self) {}
}

/// Reader adapter that reports every chunk to a progress callback.
///
/// Remembers whether the inner reader failed, so a broken body can be told
/// apart from a failed write once `io::copy` returns.
struct ProgressReader<'a, R> {
    inner: R,
    progress: &'a dyn DownloadProgress,
    failed: bool,
}

impl<R: Read> Read for ProgressReader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf).inspect_err(|_| self.failed = true)?;
        self.progress.on_advance(n as u64);
        Ok(n)
    }
}

/// Downloads artifacts into a local directory and verifies them.
pub struct Fetcher<'a> {
    backend: &'a dyn Backend,
    download_dir: &'a Path,
    progress: &'a dyn DownloadProgress,
}

impl<'a> Fetcher<'a> {
    /// Create a fetcher writing into `download_dir`.
    #[must_use]
    pub fn new(backend: &'a dyn Backend, download_dir: &'a Path) -> Self {
        Self {
            backend,
            download_dir,
            progress: &NoProgress,
        }
    }

    /// Report download progress to `progress`.
    #[must_use]
    pub fn with_progress(mut self, progress: &'a dyn DownloadProgress) -> Self {
        self.progress = progress;
        self
    }

    /// Download `filename` and check it against `expected_sha256`.
    ///
    /// Returns the local path of the verified file. There is no retry.
    ///
    /// # Errors
    ///
    /// - `Error::HttpError` / `Error::DownloadFailed` if the transfer fails
    /// - `Error::Io` on filesystem failures
    /// - `Error::Integrity` if the digest does not match; the file is left
    ///   at the path carried by the error
    pub fn download(&self, filename: &str, expected_sha256: &str) -> Result<PathBuf> {
        self.download_sized(filename, expected_sha256, None)
    }

    /// Like [`Fetcher::download`], passing the published size on to the
    /// progress callback.
    ///
    /// # Errors
    ///
    /// Same as [`Fetcher::download`].
    pub fn download_sized(
        &self,
        filename: &str,
        expected_sha256: &str,
        size: Option<u64>,
    ) -> Result<PathBuf> {
        let location = self.download_dir.join(filename);

        fs::create_dir_all(self.download_dir).map_err(|e| Error::io(self.download_dir, e))?;

        let body = self.backend.open_artifact(filename)?;

        self.progress.on_start(filename, size);
        let written = self.write_body(filename, body, &location);
        self.progress.on_finish();
        let written = written?;
        log::debug!("wrote {} bytes to {}", written, location.display());

        verify_sha256(&location, expected_sha256)?;
        Ok(location)
    }

    /// Stream a response body into `location`, closing the file afterwards.
    fn write_body(&self, filename: &str, body: Box<dyn Read>, location: &Path) -> Result<u64> {
        let file = File::create(location).map_err(|e| Error::io(location, e))?;
        let mut writer = BufWriter::new(file);
        let mut reader = ProgressReader {
            inner: body,
            progress: self.progress,
            failed: false,
        };

        let written = io::copy(&mut reader, &mut writer).map_err(|e| {
            if reader.failed {
                Error::DownloadFailed {
                    filename: filename.to_string(),
                    message: e.to_string(),
                }
            } else {
                Error::io(location, e)
            }
        })?;

        writer
            .into_inner()
            .map_err(|e| Error::io(location, e.into_error()))?
            .sync_all()
            .map_err(|e| Error::io(location, e))?;

        Ok(written)
    }
}

/// Compute the lowercase hex SHA-256 digest of a file, streaming it.
///
/// # Errors
///
/// Returns `Error::Io` if the file cannot be read.
pub fn sha256_file(path: &Path) -> Result<String> {
    let mut file = File::open(path).map_err(|e| Error::io(path, e))?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher).map_err(|e| Error::io(path, e))?;
    Ok(hex::encode(hasher.finalize()))
}

/// Check a file against an expected hex SHA-256 digest.
///
/// Both sides are compared lower-cased.
///
/// # Errors
///
/// Returns `Error::Integrity` with both digests on mismatch.
pub fn verify_sha256(path: &Path, expected: &str) -> Result<()> {
    let actual = sha256_file(path)?;

    if actual != expected.trim().to_lowercase() {
        return Err(Error::Integrity {
            path: path.to_path_buf(),
            expected: expected.to_string(),
            actual,
        });
    }

    log::debug!("checksum verified for {}", path.display());
    Ok(())
}
