//! Backend traits and implementations for talking to the download server.
//!
//! This module provides the [`Backend`] trait and implementations for
//! different release sources. The primary implementation is
//! [`http::HttpBackend`] for the official Go download server.
//!
//! # Testing
//!
//! Use [`MockBackend`] for testing without network access:
//!
//! ```
//! use gotoolchain::backend::{Backend, MockBackend};
//! use gotoolchain::Release;
//!
//! let mut mock = MockBackend::new();
//! mock.add_release(Release {
//!     version: "go1.21.0".to_string(),
//!     stable: true,
//!     files: vec![],
//! });
//!
//! let catalog = mock.fetch_catalog().unwrap();
//! assert_eq!(catalog.len(), 1);
//! ```

pub mod http;

use crate::error::{Error, Result};
use crate::types::{Catalog, Release};
use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::sync::{Arc, Mutex};

/// Backend trait for the release catalog and artifact downloads.
pub trait Backend: Send + Sync {
    /// Fetch the release catalog.
    ///
    /// Returns releases in server order (newest first).
    ///
    /// # Errors
    ///
    /// Returns `Error::HttpError` on transport or status failures and
    /// `Error::Parse` if the body is not a valid catalog.
    fn fetch_catalog(&self) -> Result<Catalog>;

    /// Open a streaming reader over an artifact's bytes.
    ///
    /// # Errors
    ///
    /// Returns `Error::HttpError` if the request fails.
    fn open_artifact(&self, filename: &str) -> Result<Box<dyn Read>>;
}

/// Mock backend for testing without network access.
///
/// This backend stores releases and artifact bytes in memory and counts
/// downloads so tests can assert that none happened.
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    releases: Arc<Mutex<Vec<Release>>>,
    artifacts: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    downloads: Arc<Mutex<Vec<String>>>,
    catalog_error: Arc<Mutex<Option<u16>>>,
}

impl MockBackend {
    /// Create a new empty mock backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a release to the catalog.
    pub fn add_release(&mut self, release: Release) {
        self.releases.lock().unwrap().push(release);
    }

    /// Add artifact data for a given file name.
    pub fn add_artifact(&mut self, filename: impl Into<String>, data: Vec<u8>) {
        self.artifacts.lock().unwrap().insert(filename.into(), data);
    }

    /// Make catalog requests fail with the given HTTP status.
    pub fn fail_catalog(&mut self, status: u16) {
        *self.catalog_error.lock().unwrap() = Some(status);
    }

    /// File names requested so far.
    #[must_use]
    pub fn downloads(&self) -> Vec<String> {
        self.downloads.lock().unwrap().clone()
    }
}

impl Backend for MockBackend {
    fn fetch_catalog(&self) -> Result<Catalog> {
        if let Some(status) = *self.catalog_error.lock().unwrap() {
            return Err(Error::http(format!("HTTP {status}"), Some(status)));
        }
        Ok(Catalog::new(self.releases.lock().unwrap().clone()))
    }

    fn open_artifact(&self, filename: &str) -> Result<Box<dyn Read>> {
        self.downloads.lock().unwrap().push(filename.to_string());

        let artifacts = self.artifacts.lock().unwrap();
        let data = artifacts
            .get(filename)
            .cloned()
            .ok_or_else(|| Error::http("HTTP 404", Some(404)))?;
        Ok(Box::new(Cursor::new(data)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn release(version: &str) -> Release {
        Release {
            version: version.to_string(),
            stable: true,
            files: vec![],
        }
    }

    #[test]
    fn test_mock_backend_new() {
        let mock = MockBackend::new();
        let catalog = mock.fetch_catalog().unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_mock_backend_keeps_order() {
        let mut mock = MockBackend::new();
        mock.add_release(release("go1.21.0"));
        mock.add_release(release("go1.20.7"));

        let catalog = mock.fetch_catalog().unwrap();
        assert_eq!(catalog.most_recent().unwrap().version, "go1.21.0");
    }

    #[test]
    fn test_mock_backend_catalog_failure() {
        let mut mock = MockBackend::new();
        mock.fail_catalog(503);

        match mock.fetch_catalog() {
            Err(Error::HttpError { status, .. }) => assert_eq!(status, Some(503)),
            _ => panic!("Expected HttpError"),
        }
    }

    #[test]
    fn test_mock_backend_open_artifact() {
        let mut mock = MockBackend::new();
        mock.add_artifact("go.tar.gz", vec![0x1f, 0x8b]);

        let mut data = Vec::new();
        mock.open_artifact("go.tar.gz")
            .unwrap()
            .read_to_end(&mut data)
            .unwrap();
        assert_eq!(data, vec![0x1f, 0x8b]);
        assert_eq!(mock.downloads(), vec!["go.tar.gz".to_string()]);
    }

    #[test]
    fn test_mock_backend_artifact_not_configured() {
        let mock = MockBackend::new();
        assert!(mock.open_artifact("missing.tar.gz").is_err());
    }
}
