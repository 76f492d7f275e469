use std::io;

use bb_api::error::{ApiError, FilterError};
use thiserror::Error;

#[allow(clippy::enum_variant_names)]
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Blackboard request failed: {source}")]
    ApiFail {
        #[from]
        source: ApiError,
    },

    #[error("Failed to access credentials: {source}")]
    CredentialsFail {
        #[from]
        source: bb_api::auth::Error,
    },

    #[error("Failed to load configuration: {source}")]
    ConfigFail {
        #[from]
        source: bb_api::config::Error,
    },

    #[error("Invalid filter: {source}")]
    FilterFail {
        #[from]
        source: FilterError,
    },

    #[error("Failed to write input to console: {source}")]
    DialoguerIOFail {
        #[from]
        source: dialoguer::Error,
    },

    #[error("Failed to access file: {source}")]
    IOError {
        #[from]
        source: io::Error,
    },

    #[error("No API URL given. Use --url, BB_URL or set `session.url` in the config file.")]
    MissingUrl,

    #[error("Not logged in. Run `bbctl login` or pass --cookie.")]
    NotLoggedIn,
}
