use crate::{Config, FileSystem, OsFileSystem};
use anyhow::{anyhow, Context};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Why an existing config file could not be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigReadError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{path} has an empty `{field}`")]
    Incomplete { path: PathBuf, field: &'static str },
}

/// Reads, writes and deletes the single config record.
///
/// There is no locking: concurrent invocations race and the last save wins.
pub struct ConfigStore<F = OsFileSystem> {
    fs: F,
    path: PathBuf,
}

impl ConfigStore<OsFileSystem> {
    /// The store at the fixed per-user location.
    pub fn for_current_user() -> anyhow::Result<Self> {
        Ok(Self::new(OsFileSystem, crate::user_config_path()?))
    }
}

impl<F: FileSystem> ConfigStore<F> {
    pub fn new(fs: F, path: PathBuf) -> Self {
        Self { fs, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the record, treating a missing, unreadable or malformed file as
    /// absent. Problems are logged, never returned.
    pub fn load(&self) -> Option<Config> {
        match self.try_load() {
            Ok(config) => config,
            Err(err) => {
                log::warn!("{err}; the config will be recreated");
                None
            }
        }
    }

    /// Like [`ConfigStore::load`] but reports why an existing file was
    /// rejected.
    pub fn try_load(&self) -> Result<Option<Config>, ConfigReadError> {
        let raw = match self.fs.read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigReadError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let config: Config =
            serde_json::from_str(&raw).map_err(|source| ConfigReadError::Parse {
                path: self.path.clone(),
                source,
            })?;

        if let Some(field) = config.missing_connection_field() {
            return Err(ConfigReadError::Incomplete {
                path: self.path.clone(),
                field,
            });
        }

        log::debug!("loaded config from {}: {config:?}", self.path.display());
        Ok(Some(config))
    }

    /// Replaces the whole record with `config`.
    pub fn save(&self, config: &Config) -> anyhow::Result<()> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| anyhow!("invalid config path: {}", self.path.display()))?;
        self.fs
            .create_dir_all(parent)
            .with_context(|| format!("create config directory {}", parent.display()))?;

        let mut json = serde_json::to_string_pretty(config).context("serialize config")?;
        json.push('\n');
        self.fs
            .write_atomic(&self.path, json.as_bytes())
            .with_context(|| format!("write {}", self.path.display()))?;
        log::debug!("saved config to {}", self.path.display());
        Ok(())
    }

    /// Deletes the record. Returns whether a file was actually removed.
    pub fn clear(&self) -> anyhow::Result<bool> {
        match self.fs.remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err).with_context(|| format!("remove {}", self.path.display())),
        }
    }
}
