use thiserror::Error;

/// Errors raised while building or applying a [`BWFilter`](crate::bwfilter::BWFilter).
#[derive(Error, Debug)]
pub enum FilterError {
    /// An entry of the list in effect is not a valid glob pattern.
    /// `pattern` holds the offending entry as written in the configuration.
    #[error("Invalid wildcard pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        source: glob::PatternError,
    },
}

/// Enumerates the possible errors returned by a
/// [`BlackboardSession`](crate::session::BlackboardSession).
///
/// Status codes that have a meaning of their own for Blackboard Learn (400, 401 and 403) get a
/// dedicated variant. Every other non-success status ends up in [`ApiError::Status`].
#[derive(Error, Debug)]
pub enum ApiError {
    /// The server rejected the request parameters (HTTP 400).
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    /// The session cookie is missing, expired or invalid (HTTP 401).
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// The user can't access the requested resource (HTTP 403).
    /// Usually happens with courses that were closed or hidden by the instructor.
    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    /// Any other non-success status code.
    #[error("Server returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// An error occurred during a network request (e.g., connection timeout, DNS resolution
    /// failure).
    #[error("Connection Error")]
    ConnectionError(#[from] reqwest::Error),

    /// The response body could not be decoded into the expected record.
    #[error("Error while deserializing JSON")]
    JsonSerializeFail(#[from] serde_json::Error),

    /// A required placeholder of the route template was left unbound.
    #[error("Missing route parameter {param}")]
    MissingRouteParam { param: String },

    /// The base URL given to the session is not usable.
    #[error("Invalid base URL: {url}")]
    InvalidUrl { url: String },

    /// The endpoint exists in the API but this client does not implement it.
    #[error("Endpoint {endpoint} is not implemented")]
    NotImplemented { endpoint: &'static str },

    /// A configured result filter could not be applied.
    #[error(transparent)]
    Filter(#[from] FilterError),

    /// Failed to write a downloaded file to disk.
    #[error("Failed to write downloaded file. error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl ApiError {
    /// Builds the error that matches an HTTP status code.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            400 => Self::BadRequest { message },
            401 => Self::Unauthorized { message },
            403 => Self::Forbidden { message },
            _ => Self::Status { status, message },
        }
    }

    /// HTTP status code behind this error, if it came from a server response.
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::BadRequest { .. } => Some(400),
            Self::Unauthorized { .. } => Some(401),
            Self::Forbidden { .. } => Some(403),
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn status_mapping() {
        assert!(matches!(
            ApiError::from_status(400, String::new()),
            ApiError::BadRequest { .. }
        ));
        assert!(matches!(
            ApiError::from_status(401, String::new()),
            ApiError::Unauthorized { .. }
        ));
        assert!(matches!(
            ApiError::from_status(403, String::new()),
            ApiError::Forbidden { .. }
        ));
        assert!(matches!(
            ApiError::from_status(500, String::new()),
            ApiError::Status { status: 500, .. }
        ));
        assert!(matches!(
            ApiError::from_status(404, String::new()),
            ApiError::Status { status: 404, .. }
        ));
    }

    #[test]
    fn status_roundtrip() {
        for code in [400, 401, 403, 404, 418, 500, 503] {
            assert_eq!(ApiError::from_status(code, String::new()).status(), Some(code));
        }
        assert_eq!(
            ApiError::MissingRouteParam {
                param: String::from("courseId")
            }
            .status(),
            None
        );
    }
}
