//! CLI command implementations.
//!
//! Each command is implemented in its own module with a `run` function
//! that handles the command logic.

pub mod browse;
pub mod list;
pub mod show;

use tracing::debug;

use crate::config::Config;
use crate::discovery::SessionStore;
use crate::error::Result;

use super::Cli;

/// Open the sessions root: `--sessions-dir`, then the config file, then
/// auto-discovery.
pub fn open_store(cli: &Cli, config: &Config) -> Result<SessionStore> {
    let store = match cli.sessions_dir.as_ref().or(config.sessions_dir.as_ref()) {
        Some(path) => SessionStore::open(path)?,
        None => SessionStore::discover()?,
    };
    debug!(root = %store.root().display(), "Using sessions root");
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CohistoryError;
    use clap::Parser;

    #[test]
    fn test_flag_beats_config() {
        let flag_dir = tempfile::tempdir().unwrap();
        let config_dir = tempfile::tempdir().unwrap();
        let cli = Cli::try_parse_from([
            "cohistory",
            "dates",
            "--sessions-dir",
            flag_dir.path().to_str().unwrap(),
        ])
        .unwrap();
        let config = Config {
            sessions_dir: Some(config_dir.path().to_path_buf()),
            ..Config::default()
        };

        let store = open_store(&cli, &config).unwrap();
        assert_eq!(store.root(), flag_dir.path());
    }

    #[test]
    fn test_config_root_used_without_flag() {
        let config_dir = tempfile::tempdir().unwrap();
        let cli = Cli::try_parse_from(["cohistory", "dates"]).unwrap();
        let config = Config {
            sessions_dir: Some(config_dir.path().to_path_buf()),
            ..Config::default()
        };

        let store = open_store(&cli, &config).unwrap();
        assert_eq!(store.root(), config_dir.path());
    }

    #[test]
    fn test_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let cli = Cli::try_parse_from([
            "cohistory",
            "dates",
            "--sessions-dir",
            missing.to_str().unwrap(),
        ])
        .unwrap();

        let err = open_store(&cli, &Config::default()).unwrap_err();
        assert!(matches!(err, CohistoryError::NotFound { .. }));
    }
}
