use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "updatego")]
#[command(version)]
#[command(about = "Install or update the Go toolchain to the latest release", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print privileged commands instead of running them
    #[arg(long, global = true, env = "UPDATEGO_DRY_RUN")]
    pub dry_run: bool,

    /// Config file (default: ~/.config/updatego/config.toml)
    #[arg(long, global = true, env = "UPDATEGO_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: Overrides,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Settings that take precedence over the config file.
#[derive(Args, Debug, Default, Clone)]
pub struct Overrides {
    /// Release catalog URL
    #[arg(long, global = true, env = "UPDATEGO_CATALOG_URL")]
    pub catalog_url: Option<String>,

    /// Base URL artifacts are downloaded from
    #[arg(long = "download-url", global = true, env = "UPDATEGO_DOWNLOAD_URL")]
    pub download_base_url: Option<String>,

    /// Directory downloads are written to
    #[arg(long, global = true, env = "UPDATEGO_DOWNLOAD_DIR")]
    pub download_dir: Option<PathBuf>,

    /// Where tarball installs end up
    #[arg(long, global = true, env = "UPDATEGO_INSTALL_DIR")]
    pub install_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Install Go, or upgrade it if a newer release exists (default)
    Update,

    /// Compare the local Go with the latest release without installing
    Check,

    /// List published releases
    Releases {
        /// Include unstable releases
        #[arg(short, long)]
        all: bool,
    },

    /// List the platforms a release ships artifacts for
    Platforms {
        /// Release version, e.g. go1.21.0 (default: latest)
        #[arg(value_name = "VERSION")]
        release: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
