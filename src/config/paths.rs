//! Data directory resolution
//!
//! The store and the settings file live together in one data directory. An
//! environment override selects its location; the default is a per-user
//! dot directory.

use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory location
pub const HOME_ENV: &str = "ROVE_HOME";

/// Maximum accepted length of the environment override
const HOME_MAX_LEN: usize = 256;

/// Name of the settings file within the data directory
const SETTINGS_FILE: &str = "rove.toml";

/// Resolves the data directory
///
/// Order of preference:
/// 1. `ROVE_HOME`, when set and pointing at a usable directory
/// 2. `<user home>/.rove`
/// 3. the system temp directory, when neither of the above is usable
pub fn home_path() -> PathBuf {
    if let Ok(dir) = std::env::var(HOME_ENV) {
        let path = PathBuf::from(clamp_override(dir));

        if is_usable(&path) {
            return path;
        }

        tracing::warn!(
            "{} does not point at a usable directory, using the temp directory instead",
            HOME_ENV
        );
        return std::env::temp_dir();
    }

    match std::env::var("HOME").or_else(|_| std::env::var("USERPROFILE")) {
        Ok(base) => PathBuf::from(base).join(".rove"),
        Err(_) => std::env::temp_dir().join(".rove"),
    }
}

/// Resolves the data directory and creates it if it does not exist yet
pub fn ensure_home_path() -> std::io::Result<PathBuf> {
    let path = home_path();
    std::fs::create_dir_all(&path)?;
    Ok(path)
}

/// Path of the settings file within the given data directory
pub fn settings_path(home: &Path) -> PathBuf {
    home.join(SETTINGS_FILE)
}

/// Caps the override's length, cutting only at a character boundary so a
/// multi-byte value cannot panic the truncation
fn clamp_override(mut dir: String) -> String {
    if dir.len() > HOME_MAX_LEN {
        let mut cut = HOME_MAX_LEN;
        while !dir.is_char_boundary(cut) {
            cut -= 1;
        }
        dir.truncate(cut);
    }
    dir
}

/// A directory is usable when it exists and is writable
fn is_usable(path: &Path) -> bool {
    match path.metadata() {
        Ok(metadata) => metadata.is_dir() && !metadata.permissions().readonly(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_path_is_under_home() {
        let path = settings_path(Path::new("/data/rove"));
        assert_eq!(path, Path::new("/data/rove/rove.toml"));
    }

    #[test]
    fn test_missing_directory_is_not_usable() {
        assert!(!is_usable(Path::new("/nonexistent/rove-home")));
    }

    #[test]
    fn test_existing_directory_is_usable() {
        let dir = tempfile::tempdir().unwrap();
        assert!(is_usable(dir.path()));
    }

    #[test]
    fn test_short_override_is_untouched() {
        assert_eq!(clamp_override("/data/rove".to_string()), "/data/rove");
    }

    #[test]
    fn test_long_override_is_capped() {
        let long = "a".repeat(HOME_MAX_LEN + 40);
        assert_eq!(clamp_override(long).len(), HOME_MAX_LEN);
    }

    #[test]
    fn test_cap_never_splits_a_multibyte_character() {
        // A two-byte character straddling the byte cap
        let mut value = "a".repeat(HOME_MAX_LEN - 1);
        value.push('é');
        value.push_str("tail");

        let clamped = clamp_override(value);
        assert_eq!(clamped.len(), HOME_MAX_LEN - 1);
        assert!(clamped.chars().all(|c| c == 'a'));
    }
}
