//! Host platform detection in Go naming.
//!
//! The release catalog labels files with Go's `GOOS`/`GOARCH` values, which
//! differ from Rust's `std::env::consts` names for several targets. This
//! module translates between the two.
//!
//! # Example
//!
//! ```
//! use gotoolchain::platform;
//!
//! let platform = platform::detect().expect("unsupported platform");
//! println!("Running on: {}", platform);
//! ```

use crate::error::{Error, Result};
use crate::types::Platform;

/// Detect the current platform.
///
/// # Supported Platforms
///
/// | Rust OS   | Go OS     |   | Rust arch     | Go arch   |
/// |-----------|-----------|---|---------------|-----------|
/// | macos     | darwin    |   | x86_64        | amd64     |
/// | linux     | linux     |   | aarch64       | arm64     |
/// | windows   | windows   |   | x86           | 386       |
/// | freebsd   | freebsd   |   | arm           | armv6l    |
///
/// `powerpc64` (little endian), `s390x`, `riscv64` and `loongarch64` are
/// also mapped.
///
/// # Errors
///
/// Returns `Error::UnsupportedPlatform` if the current platform has no Go
/// release name.
pub fn detect() -> Result<Platform> {
    from_rust(std::env::consts::OS, std::env::consts::ARCH)
}

/// Translate Rust target names into Go release names.
///
/// # Errors
///
/// Returns `Error::UnsupportedPlatform` for unknown combinations.
pub fn from_rust(os: &str, arch: &str) -> Result<Platform> {
    let unsupported = || Error::UnsupportedPlatform {
        os: os.to_string(),
        arch: arch.to_string(),
    };

    let go_os = match os {
        "macos" => "darwin",
        "linux" => "linux",
        "windows" => "windows",
        "freebsd" => "freebsd",
        _ => return Err(unsupported()),
    };

    let go_arch = match arch {
        "x86_64" => "amd64",
        "aarch64" => "arm64",
        "x86" => "386",
        // The catalog publishes 32-bit ARM only as armv6l.
        "arm" => "armv6l",
        "powerpc64" if cfg!(target_endian = "little") => "ppc64le",
        "s390x" => "s390x",
        "riscv64" => "riscv64",
        "loongarch64" => "loong64",
        _ => return Err(unsupported()),
    };

    Ok(Platform::new(go_os, go_arch))
}
