use crate::cli::Overrides;
use anyhow::{Context, Result};
use gotoolchain::Config;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the default config file path
pub fn default_path() -> Result<PathBuf> {
    let dir = dirs::config_dir().context("Could not determine config directory")?;
    Ok(dir.join("updatego").join("config.toml"))
}

/// On-disk settings. Every key is optional.
#[derive(Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub catalog_url: Option<String>,
    pub download_url: Option<String>,
    pub download_dir: Option<String>,
    pub install_dir: Option<String>,
}

impl ConfigFile {
    /// Load the config file.
    ///
    /// An explicit path must exist; the default location may be absent.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let path = default_path()?;
                if !path.exists() {
                    log::debug!("no config file at {}", path.display());
                    return Ok(Self::default());
                }
                path
            }
        };

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Could not read config file: {}", path.display()))?;
        log::debug!("loaded config from {}", path.display());
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid TOML format in updatego config")
    }

    /// Merge with command-line overrides into the library config.
    pub fn resolve(self, overrides: Overrides) -> Config {
        let mut config = Config::new();

        if let Some(url) = overrides.catalog_url.or(self.catalog_url) {
            config = config.catalog_url(url);
        }
        if let Some(url) = overrides.download_base_url.or(self.download_url) {
            config = config.download_base_url(with_trailing_slash(url));
        }
        if let Some(dir) = overrides.download_dir.or_else(|| self.download_dir.map(expand)) {
            config = config.download_dir(dir);
        }
        if let Some(dir) = overrides.install_dir.or_else(|| self.install_dir.map(expand)) {
            config = config.install_dir(dir);
        }

        config
    }
}

fn expand(path: String) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path).as_ref())
}

fn with_trailing_slash(mut url: String) -> String {
    if !url.ends_with('/') {
        url.push('/');
    }
    url
}
