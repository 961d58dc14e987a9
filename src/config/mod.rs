//! Configuration for the crawler kernel
//!
//! This module handles:
//! - Data directory resolution (`ROVE_HOME` override, per-user default)
//! - The optional `rove.toml` settings file (proxy, table size caps)
//!
//! The settings file is re-read by the kernel on every control tick so that
//! proxy changes made by the management surface take effect without a
//! restart.

mod paths;
mod types;

pub use paths::{ensure_home_path, home_path, settings_path, HOME_ENV};
pub use types::{LimitSettings, ProxyKind, ProxySettings, Settings};

use std::path::Path;
use thiserror::Error;

/// Settings-specific errors
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Result type alias for settings operations
pub type SettingsResult<T> = std::result::Result<T, SettingsError>;

/// Loads settings from the given path
///
/// A missing file is not an error: every setting has a default, and a fresh
/// installation has no settings file until the management surface writes one.
pub fn load_settings(path: &Path) -> SettingsResult<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }

    let contents = std::fs::read_to_string(path)?;
    let settings: Settings = toml::from_str(&contents)?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings(&dir.path().join("rove.toml")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_proxy_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rove.toml");
        std::fs::write(
            &path,
            r#"
[proxy]
kind = "socks5"
host = "127.0.0.1"
port = 9050
user = "alice"
password = "secret"
"#,
        )
        .unwrap();

        let settings = load_settings(&path).unwrap();
        assert_eq!(settings.proxy.kind, ProxyKind::Socks5);
        assert_eq!(settings.proxy.host, "127.0.0.1");
        assert_eq!(settings.proxy.port, 9050);
        assert_eq!(settings.proxy.user, "alice");
    }

    #[test]
    fn test_load_limit_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rove.toml");
        std::fs::write(&path, "[limits]\nmax_table_bytes = 1048576\n").unwrap();

        let settings = load_settings(&path).unwrap();
        assert_eq!(settings.limits.max_table_bytes, 1_048_576);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rove.toml");
        std::fs::write(&path, "[proxy\nkind =").unwrap();

        assert!(load_settings(&path).is_err());
    }
}
