//! Platform paths for data and configuration.
//!
//! Locations follow the platform conventions reported by the `directories`
//! crate, e.g. `~/.local/share/pindrop` for data and
//! `~/.config/pindrop/config.toml` for configuration on Linux.

use std::path::{Path, PathBuf};

const APP_DIR: &str = "pindrop";

/// Directory holding the persisted keys and trace files.
///
/// Falls back to `./.pindrop` when no home directory can be determined.
#[must_use]
pub fn default_data_dir() -> PathBuf {
    directories::BaseDirs::new().map_or_else(
        || PathBuf::from(".").join(".pindrop"),
        |b| b.data_local_dir().join(APP_DIR),
    )
}

/// Location of the optional TOML configuration file.
#[must_use]
pub fn default_config_file() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.config_dir().join(APP_DIR).join("config.toml"))
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a leading tilde, or any path when the home directory is
/// unknown, are returned unchanged.
///
/// ```
/// use pindrop::infrastructure::expand_tilde;
/// use std::path::PathBuf;
///
/// assert_eq!(expand_tilde("/srv/pindrop"), PathBuf::from("/srv/pindrop"));
/// ```
#[must_use]
pub fn expand_tilde(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    directories::BaseDirs::new().map_or_else(|| path.to_path_buf(), |b| b.home_dir().join(rest))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_dir_ends_with_app_name() {
        assert!(default_data_dir().ends_with("pindrop"));
    }

    #[test]
    fn config_file_is_toml() {
        if let Some(path) = default_config_file() {
            assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("config.toml"));
        }
    }

    #[test]
    fn tilde_expansion() {
        assert_eq!(expand_tilde("relative/dir"), PathBuf::from("relative/dir"));
        assert_eq!(expand_tilde("~user/dir"), PathBuf::from("~user/dir"));

        if let Some(base) = directories::BaseDirs::new() {
            assert_eq!(expand_tilde("~/trips"), base.home_dir().join("trips"));
            assert_eq!(expand_tilde("~"), base.home_dir().to_path_buf());
        }
    }
}
