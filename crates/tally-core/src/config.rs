//! Runtime configuration
//!
//! Config is loaded with a two-layer resolution:
//! 1. An explicit path passed on the command line
//! 2. `~/.config/tally/config.toml` when present
//! Missing file (and any missing field) falls back to defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SQLite database path
    pub db_path: PathBuf,

    /// Category model artifact path
    pub model_path: PathBuf,

    /// Retrain the category model after every successful upload.
    ///
    /// Retraining walks the full labeled corpus, so cost grows with ledger
    /// size. Large ledgers can switch this off and retrain on their own
    /// cadence with the explicit train command; upload behavior is otherwise
    /// identical.
    pub retrain_on_upload: bool,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tally");
        Self {
            db_path: data_dir.join("tally.db"),
            model_path: data_dir.join("category-model.json"),
            retrain_on_upload: true,
        }
    }
}

impl Config {
    /// Load configuration, resolving the file as documented above
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let resolved = match path {
            Some(explicit) => Some(explicit.to_path_buf()),
            None => dirs::config_dir()
                .map(|dir| dir.join("tally").join("config.toml"))
                .filter(|candidate| candidate.exists()),
        };

        match resolved {
            Some(file) => {
                let text = std::fs::read_to_string(&file)?;
                toml::from_str(&text)
                    .map_err(|e| Error::Config(format!("{}: {e}", file.display())))
            }
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_retraining() {
        let config = Config::default();
        assert!(config.retrain_on_upload);
        assert!(config.db_path.ends_with("tally/tally.db"));
    }

    #[test]
    fn partial_file_keeps_defaults_for_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("config.toml");
        std::fs::write(&file, "retrain_on_upload = false\n").unwrap();

        let config = Config::load(Some(&file)).unwrap();
        assert!(!config.retrain_on_upload);
        assert!(config.model_path.ends_with("tally/category-model.json"));
    }

    #[test]
    fn explicit_paths_are_honored() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("config.toml");
        std::fs::write(
            &file,
            "db_path = \"/tmp/elsewhere.db\"\nmodel_path = \"/tmp/model.json\"\n",
        )
        .unwrap();

        let config = Config::load(Some(&file)).unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/elsewhere.db"));
        assert_eq!(config.model_path, PathBuf::from("/tmp/model.json"));
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("config.toml");
        std::fs::write(&file, "retrain_on_upload = maybe").unwrap();

        assert!(matches!(
            Config::load(Some(&file)),
            Err(Error::Config(_))
        ));
    }
}
