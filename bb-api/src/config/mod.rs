//! Client configuration file
//!
//! # Config file
//! The configuration lives in `config.toml` inside [`config_dir`](bb_common::config_dir)
//! (`$XDG_CONFIG_HOME/blackboard-client` or the OS equivalent, overridable with `BB_CONFIG_DIR`).
//! A commented default is written the first time it's loaded.
//!
//! ```toml
//! [session]
//! url = "https://blackboard.example.org/learn/api/public/v{version}"
//! timeout = 12
//!
//! [filters.attachments]
//! whitelist = ["application/pdf", "image/*"]
//!
//! [filters.memberships]
//! blacklist = ["SYSTEM"]
//! min_year = 2023
//! ```
use bb_common::config_dir;
use log::debug;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs::{read_to_string, File};
use tokio::io::AsyncWriteExt;

use crate::filters::{AttachmentFilter, MembershipFilter};

const CFG_INIT_TEXT: &str = include_str!("config.toml");

/// Content written to `config.toml` when it doesn't exist yet.
pub const DEFAULT_CONFIG_TOML: &str = CFG_INIT_TEXT;

pub const CONFIG_FILE_NAME: &str = "config.toml";

pub const DEFAULT_TIMEOUT: u64 = 12;

#[derive(Error, Debug)]
pub enum Error {
    /// The config file could not be read or created.
    #[error("Failed to access config file. error: {source}")]
    ConfigIOError {
        #[from]
        source: io::Error,
    },

    /// The config file is not valid TOML or has an unexpected layout.
    #[error("Failed to parse config file. error: {source}")]
    ConfigDecodeError {
        #[from]
        source: toml::de::Error,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SessionConfig {
    /// Base URL of the REST API, may contain `{version}`.
    pub url: Option<String>,
    /// Request timeout in seconds.
    pub timeout: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct FilterConfig {
    pub attachments: AttachmentFilter,
    pub memberships: MembershipFilter,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    pub session: SessionConfig,
    pub filters: FilterConfig,
}

impl ClientConfig {
    /// Parses the configuration from a string.
    ///
    /// # Errors
    /// Fails if the content is not valid TOML or does not match the expected layout.
    pub fn from_config(config_content: &str) -> Result<Self, toml::de::Error> {
        let deserialized = toml::from_str::<Self>(config_content)?;

        debug!("Client config decoded");
        debug!(
            "Attachment filter active: {}, membership filter active: {}, min_year: {:?}",
            deserialized.filters.attachments.mime_types.is_active(),
            deserialized.filters.memberships.data_sources.is_active(),
            deserialized.filters.memberships.min_year
        );
        Ok(deserialized)
    }

    /// Path of `config.toml` inside the default config directory.
    pub fn default_path() -> Result<PathBuf, Error> {
        Ok(config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Loads `config.toml` from the default config directory, creating it if needed.
    pub async fn load() -> Result<Self, Error> {
        Self::load_from(&Self::default_path()?).await
    }

    /// Loads the configuration from `path`. If the file doesn't exist, it's created with
    /// [`DEFAULT_CONFIG_TOML`].
    pub async fn load_from(path: &Path) -> Result<Self, Error> {
        let content = if path.exists() {
            read_to_string(path).await?
        } else {
            debug!("Creating default config at {}", path.display());
            let mut file = File::create(path).await?;
            file.write_all(DEFAULT_CONFIG_TOML.as_bytes()).await?;
            file.flush().await?;
            DEFAULT_CONFIG_TOML.to_string()
        };

        Ok(Self::from_config(&content)?)
    }
}

#[cfg(test)]
mod test {
    use crate::bwfilter::BWFilter;

    use super::*;

    #[test]
    fn default_config_parses() {
        let cfg = ClientConfig::from_config(DEFAULT_CONFIG_TOML).unwrap();

        assert_eq!(cfg.session.url, None);
        assert_eq!(cfg.session.timeout, 12);
        assert_eq!(cfg.filters, FilterConfig::default());
    }

    #[test]
    fn empty_config() {
        let cfg = ClientConfig::from_config("").unwrap();
        assert_eq!(cfg, ClientConfig::default());
        assert_eq!(cfg.session.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn full_config() {
        let cfg = ClientConfig::from_config(
            r#"
            [session]
            url = "https://bb.test/learn/api/public/v{version}"
            timeout = 30

            [filters.attachments]
            whitelist = ["application/pdf", "image/*"]
            blacklist = ["video/*"]

            [filters.memberships]
            blacklist = ["SYSTEM"]
            min_year = 2023
            "#,
        )
        .unwrap();

        assert_eq!(cfg.session.timeout, 30);
        assert_eq!(
            cfg.filters.attachments.mime_types.whitelist(),
            Some(&[String::from("application/pdf"), String::from("image/*")][..])
        );
        assert_eq!(
            cfg.filters.memberships.data_sources,
            BWFilter::blacklist_only(&["SYSTEM"])
        );
        assert_eq!(cfg.filters.memberships.min_year, Some(2023));
    }

    #[test]
    fn invalid_config() {
        assert!(ClientConfig::from_config("[session]\ntimeout = \"soon\"").is_err());
        assert!(ClientConfig::from_config("[filters.attachments]\nwhitelist = 3").is_err());
    }

    #[tokio::test]
    async fn creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        let cfg = ClientConfig::load_from(&path).await.unwrap();

        assert!(path.exists());
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            DEFAULT_CONFIG_TOML
        );
        assert_eq!(cfg.session.timeout, DEFAULT_TIMEOUT);
        assert_eq!(cfg.session.url, None);

        let reloaded = ClientConfig::load_from(&path).await.unwrap();
        assert_eq!(reloaded, cfg);
    }

    #[tokio::test]
    async fn reads_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[filters.memberships]\nmin_year = 2020\n").unwrap();

        let cfg = ClientConfig::load_from(&path).await.unwrap();
        assert_eq!(cfg.filters.memberships.min_year, Some(2020));
        assert_eq!(cfg.session.url, None);
    }
}
