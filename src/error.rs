use reqwest::StatusCode;
use thiserror::Error;

/// Why a single blocklist submission was not acknowledged.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("registry rejected the request with status {status}: {body}")]
    Rejected {
        status: StatusCode,
        body: String,
    },

    #[error("registry returned {status} but the body is not JSON: {source}")]
    MalformedAck {
        status: StatusCode,
        #[source]
        source: serde_json::Error,
    },
}

impl SubmitError {
    /// HTTP status behind the failure, when the registry answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            SubmitError::Transport(err) => err.status(),
            SubmitError::Rejected { status, .. } => Some(*status),
            SubmitError::MalformedAck { status, .. } => Some(*status),
        }
    }
}

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("failed to load the token page: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid token page url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("no csrf-token meta tag found in {0}")]
    MissingToken(String),

    #[error("csrf token is empty")]
    EmptyToken,

    #[error("csrf token cannot be sent as a header value")]
    InvalidToken,
}

#[derive(Debug, Error)]
pub enum DomainListError {
    #[error("domain list is empty")]
    Empty,

    #[error("domain at position {0} is empty")]
    EmptyEntry(usize),

    #[error("failed to read domain list {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("base url is required")]
    MissingBaseUrl,

    #[error("invalid base url: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    #[error("invalid header value for {0}")]
    InvalidHeader(&'static str),

    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
}
