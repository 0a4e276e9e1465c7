//! Endpoints and locations used by the updater.
//!
//! Defaults target the official Go servers and `/usr/local/go`. Each value can
//! be overridden to use a mirror, a local test server or a scratch install
//! directory.
//!
//! # Example
//!
//! ```
//! use gotoolchain::Config;
//!
//! let config = Config::new()
//!     .catalog_url("http://127.0.0.1:8080/dl/?mode=json")
//!     .download_dir("/tmp/updatego")
//!     .install_dir("/opt/go");
//!
//! assert_eq!(config.artifact_url("go1.21.0.linux-amd64.tar.gz"),
//!     "https://dl.google.com/go/go1.21.0.linux-amd64.tar.gz");
//! assert_eq!(config.extract_dir().unwrap().to_str(), Some("/opt"));
//! ```

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Default release catalog endpoint.
pub const DEFAULT_CATALOG_URL: &str = "https://go.dev/dl/?mode=json";

/// Default base URL for artifact downloads.
pub const DEFAULT_DOWNLOAD_BASE_URL: &str = "https://dl.google.com/go/";

/// Default directory for temporary downloads, relative to the working directory.
pub const DEFAULT_DOWNLOAD_DIR: &str = ".tmp";

/// Default system install location for tarball installs.
pub const DEFAULT_INSTALL_DIR: &str = "/usr/local/go";

/// Updater configuration.
///
/// Use the builder methods to override individual values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// URL of the JSON release catalog.
    pub catalog_url: String,
    /// Base URL artifact file names are appended to.
    pub download_base_url: String,
    /// Directory downloads are written to.
    pub download_dir: PathBuf,
    /// Directory replaced wholesale on tarball installs.
    pub install_dir: PathBuf,
    /// Name of the executable to look up on PATH.
    pub binary_name: String,
    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            download_base_url: DEFAULT_DOWNLOAD_BASE_URL.to_string(),
            download_dir: PathBuf::from(DEFAULT_DOWNLOAD_DIR),
            install_dir: PathBuf::from(DEFAULT_INSTALL_DIR),
            binary_name: "go".to_string(),
            user_agent: concat!("updatego/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Config {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the release catalog URL.
    #[must_use]
    pub fn catalog_url(mut self, url: impl Into<String>) -> Self {
        self.catalog_url = url.into();
        self
    }

    /// Set the base URL for artifact downloads.
    #[must_use]
    pub fn download_base_url(mut self, url: impl Into<String>) -> Self {
        self.download_base_url = url.into();
        self
    }

    /// Set the temporary download directory.
    #[must_use]
    pub fn download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = dir.into();
        self
    }

    /// Set the tarball install location.
    ///
    /// Go tarballs unpack into a `go/` directory, so this path is expected
    /// to end in `go`; the archive is extracted into its parent.
    #[must_use]
    pub fn install_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.install_dir = dir.into();
        self
    }

    /// Set the executable name looked up on PATH.
    #[must_use]
    pub fn binary_name(mut self, name: impl Into<String>) -> Self {
        self.binary_name = name.into();
        self
    }

    /// Full download URL for an artifact.
    ///
    /// File names come from the catalog and are used as-is.
    #[must_use]
    pub fn artifact_url(&self, filename: &str) -> String {
        format!("{}{}", self.download_base_url, filename)
    }

    /// Local path an artifact is downloaded to.
    #[must_use]
    pub fn download_path(&self, filename: &str) -> PathBuf {
        self.download_dir.join(filename)
    }

    /// Directory tarballs are extracted into (parent of the install dir).
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` if the install dir has no parent.
    pub fn extract_dir(&self) -> Result<&Path> {
        self.install_dir
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| {
                Error::InvalidConfig(format!(
                    "install dir {} has no parent directory",
                    self.install_dir.display()
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.catalog_url, DEFAULT_CATALOG_URL);
        assert_eq!(config.download_base_url, DEFAULT_DOWNLOAD_BASE_URL);
        assert_eq!(config.download_dir, PathBuf::from(".tmp"));
        assert_eq!(config.install_dir, PathBuf::from("/usr/local/go"));
        assert_eq!(config.binary_name, "go");
        assert!(config.user_agent.starts_with("updatego/"));
    }

    #[test]
    fn test_config_builder() {
        let config = Config::new()
            .catalog_url("http://localhost/catalog")
            .download_base_url("http://localhost/files/")
            .download_dir("/tmp/dl")
            .install_dir("/opt/go")
            .binary_name("go1.21");

        assert_eq!(config.catalog_url, "http://localhost/catalog");
        assert_eq!(config.download_dir, PathBuf::from("/tmp/dl"));
        assert_eq!(config.binary_name, "go1.21");
        assert_eq!(
            config.artifact_url("go.tar.gz"),
            "http://localhost/files/go.tar.gz"
        );
    }

    #[test]
    fn test_download_path() {
        let config = Config::default();
        assert_eq!(
            config.download_path("go1.21.0.linux-amd64.tar.gz"),
            PathBuf::from(".tmp/go1.21.0.linux-amd64.tar.gz")
        );
    }

    #[test]
    fn test_extract_dir_default() {
        let config = Config::default();
        assert_eq!(config.extract_dir().unwrap(), Path::new("/usr/local"));
    }

    #[test]
    fn test_extract_dir_without_parent() {
        let config = Config::new().install_dir("go");
        assert!(matches!(
            config.extract_dir(),
            Err(Error::InvalidConfig(_))
        ));

        let root = Config::new().install_dir("/");
        assert!(root.extract_dir().is_err());
    }
}
