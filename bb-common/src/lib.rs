use std::{
    env,
    fs::create_dir_all,
    io,
    path::{Path, PathBuf},
};

// Public Exports
pub use chrono;
pub use directories;
pub use log;
pub use reqwest;
pub use serde;
pub use serde_json;
pub use tokio;

use directories::ProjectDirs;

use log::debug;

pub mod models;

/// Default user-agent sent with every request.
///
/// It will always follow the version declared inside ```Cargo.toml```
pub const USER_AGENT: &str = concat!("Rust Blackboard Client/", env!("CARGO_PKG_VERSION"));

/// Environment variable that overrides the location returned by [`config_dir`].
pub const CONFIG_DIR_ENV: &str = "BB_CONFIG_DIR";

/// Returns a `PathBuf` pointing to the directory holding the client configuration and the
/// cached session credentials.
///
/// This is XDG-compliant and resolves to `$XDG_CONFIG_HOME/blackboard-client` on Linux or
/// `%APPDATA%/blackboard-client` on Windows.
///
/// Or you can set the env var `BB_CONFIG_DIR` to point it to a custom location.
///
/// The directory is created if it doesn't exist yet.
#[inline]
pub fn config_dir() -> Result<PathBuf, io::Error> {
    let cfg_path = match env::var(CONFIG_DIR_ENV) {
        Ok(path) => PathBuf::from(path),
        Err(_) => ProjectDirs::from("org", "blackboard", "blackboard-client")
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    "could not resolve a home directory for the config files",
                )
            })?
            .config_dir()
            .to_path_buf(),
    };

    let cfold = Path::new(&cfg_path);

    if !cfold.exists() {
        debug!("Creating config dir {}", cfold.display());
        create_dir_all(cfold)?;
    }

    Ok(cfold.to_path_buf())
}
