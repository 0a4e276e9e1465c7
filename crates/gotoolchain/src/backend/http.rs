//! Go download server backend.
//!
//! This module provides the [`HttpBackend`] implementation which reads the
//! JSON release catalog and streams artifacts from the official download
//! host (or whatever the [`Config`] points at).

use crate::backend::Backend;
use crate::config::Config;
use crate::error::Result;
use crate::types::Catalog;
use std::io::Read;

/// HTTP backend for the Go download server.
///
/// # Example
///
/// ```no_run
/// use gotoolchain::backend::Backend;
/// use gotoolchain::backend::http::HttpBackend;
/// use gotoolchain::Config;
///
/// let backend = HttpBackend::new(&Config::default());
/// let catalog = backend.fetch_catalog().unwrap();
/// println!("Found {} releases", catalog.len());
/// ```
pub struct HttpBackend {
    /// HTTP agent for requests.
    agent: ureq::Agent,
    /// Catalog endpoint.
    catalog_url: String,
    /// Base URL artifact names are appended to.
    download_base_url: String,
    /// User-Agent header value.
    user_agent: String,
}

impl HttpBackend {
    /// Create a backend for the endpoints in `config`.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            agent: ureq::Agent::new_with_defaults(),
            catalog_url: config.catalog_url.clone(),
            download_base_url: config.download_base_url.clone(),
            user_agent: config.user_agent.clone(),
        }
    }

    /// Get the catalog URL.
    #[must_use]
    pub fn catalog_url(&self) -> &str {
        &self.catalog_url
    }

    /// Build the download URL for an artifact.
    fn artifact_url(&self, filename: &str) -> String {
        format!("{}{}", self.download_base_url, filename)
    }
}

impl Default for HttpBackend {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl Backend for HttpBackend {
    fn fetch_catalog(&self) -> Result<Catalog> {
        log::debug!("fetching release catalog from {}", self.catalog_url);

        let body = self
            .agent
            .get(&self.catalog_url)
            .header("Accept", "application/json")
            .header("User-Agent", &self.user_agent)
            .call()?
            .body_mut()
            .read_to_string()?;

        parse_catalog(&body)
    }

    fn open_artifact(&self, filename: &str) -> Result<Box<dyn Read>> {
        let url = self.artifact_url(filename);
        log::debug!("downloading {url}");

        let response = self
            .agent
            .get(&url)
            .header("Accept", "application/octet-stream")
            .header("User-Agent", &self.user_agent)
            .call()?;

        // Unlimited reader; the caller streams it straight to disk.
        Ok(Box::new(response.into_body().into_reader()))
    }
}

/// Decode a catalog response body.
///
/// # Errors
///
/// Returns `Error::Parse` if the body is not a JSON array of releases with
/// all required fields.
pub fn parse_catalog(body: &str) -> Result<Catalog> {
    Ok(serde_json::from_str(body)?)
}
