//! Session credentials and their on-disk cache
//!
//! Blackboard Learn authenticates REST calls made on behalf of a user with the cookies of a logged
//! in browser session. The cookie header is stored with `bincode` in `<config_dir>/credentials` so
//! it only has to be entered once.
use bb_common::config_dir;
use bincode::{deserialize, serialize};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs::{read, remove_file, OpenOptions};
use tokio::io::AsyncWriteExt;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
#[cfg(unix)]
use tokio::fs::set_permissions;

pub const CREDENTIALS_FILE_NAME: &str = "credentials";

#[cfg(unix)]
const CACHE_FILE_MODE: u32 = 0o600;

#[derive(Error, Debug)]
pub enum Error {
    /// The cookie string given for the session is empty.
    #[error("Session cookie cannot be empty")]
    EmptyCookie,

    /// Indicates any unrecoverable IO error when trying to read or write the credentials cache.
    #[error("Failed to access credentials cache. error: {source}")]
    CacheIOError {
        #[from]
        source: io::Error,
    },

    /// Indicates a failed attempt to serialize the credentials to `bincode`.
    #[error("Failed to encode credentials cache")]
    CacheEncodeError,
}

/// Cookie header of an authenticated browser session.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Credentials {
    cookie: String,
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("cookie", &format_args!("<{} bytes>", self.cookie.len()))
            .finish()
    }
}

impl Credentials {
    /// Wraps a cookie header like `BbRouter=expires:...; JSESSIONID=...`.
    pub fn new<S: Into<String>>(cookie: S) -> Result<Self, Error> {
        let cookie = cookie.into().trim().to_string();
        if cookie.is_empty() {
            return Err(Error::EmptyCookie);
        }
        Ok(Self { cookie })
    }

    #[inline]
    pub fn cookie(&self) -> &str {
        &self.cookie
    }

    /// Individual `name=value` pairs of the cookie header.
    pub fn pairs(&self) -> impl Iterator<Item = &str> {
        self.cookie
            .split(';')
            .map(str::trim)
            .filter(|pair| !pair.is_empty())
    }

    pub fn cache_path() -> Result<PathBuf, Error> {
        Ok(config_dir()?.join(CREDENTIALS_FILE_NAME))
    }

    /// Reads the cached credentials, `None` if nothing was cached yet.
    pub async fn load() -> Result<Option<Self>, Error> {
        Self::load_from(&Self::cache_path()?).await
    }

    pub async fn load_from(path: &Path) -> Result<Option<Self>, Error> {
        if !path.exists() {
            debug!("No credentials cached at {}", path.display());
            return Ok(None);
        }

        let bytes = read(path).await?;

        match deserialize::<Self>(&bytes) {
            Ok(creds) if !creds.cookie.is_empty() => Ok(Some(creds)),
            _ => {
                warn!(
                    "Credentials cache at {} is unreadable, ignoring it",
                    path.display()
                );
                Ok(None)
            }
        }
    }

    /// Writes the credentials to the default cache file, replacing what was there.
    pub async fn save(&self) -> Result<(), Error> {
        self.save_to(&Self::cache_path()?).await
    }

    /// The file is only readable by its owner on unix.
    pub async fn save_to(&self, path: &Path) -> Result<(), Error> {
        let Ok(bytes) = serialize(&self) else {
            return Err(Error::CacheEncodeError);
        };

        let mut opts = OpenOptions::new();
        opts.create(true).truncate(true).write(true);
        #[cfg(unix)]
        opts.mode(CACHE_FILE_MODE);

        let mut cache = opts.open(path).await?;

        // `mode` only applies when the file is created
        #[cfg(unix)]
        set_permissions(path, std::fs::Permissions::from_mode(CACHE_FILE_MODE)).await?;

        cache.write_all(&bytes).await?;
        cache.flush().await?;
        debug!("Wrote credentials cache to {}", path.display());
        Ok(())
    }

    /// Deletes the default cache file if present.
    pub async fn forget() -> Result<(), Error> {
        let path = Self::cache_path()?;
        if path.exists() {
            remove_file(&path).await?;
            debug!("Removed credentials cache at {}", path.display());
        }
        Ok(())
    }
}
