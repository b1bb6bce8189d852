//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the database file.
    pub database_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            database_path: home.join(".trs.db"),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    ///
    /// Later sources win: defaults, `<config dir>/trs/config.toml`, the given
    /// file, then `TRS_*` environment variables.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("TRS_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for trs.
///
/// On Linux: `~/.config/trs`
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("trs"))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    #[test]
    fn test_default_config_uses_home_dir_for_db() {
        let config = Config::default();
        let home = dirs::home_dir().unwrap();
        assert_eq!(config.database_path, home.join(".trs.db"));
    }

    #[test]
    fn test_dirs_config_path_ends_with_trs() {
        let path = dirs_config_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "trs");
    }

    #[test]
    fn test_config_file_overrides_database_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"database_path = "/var/tmp/work.db""#).unwrap();
        file.flush().unwrap();

        let config = Config::load_from(Some(file.path())).unwrap();

        assert_eq!(config.database_path, PathBuf::from("/var/tmp/work.db"));
    }

    #[test]
    fn test_debug_shows_database_path() {
        let config = Config {
            database_path: PathBuf::from("/tmp/trs.db"),
        };
        assert_eq!(
            format!("{config:?}"),
            r#"Config { database_path: "/tmp/trs.db" }"#
        );
    }
}
