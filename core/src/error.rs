use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file unreadable: {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("config parse error")]
    Parse(#[source] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

/// Every way a call to the messaging platform can fail. Callers inside the
/// gate never propagate these past the protocol boundary.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out")]
    Timeout,

    #[error("http {status}: {description}")]
    HttpStatus { status: u16, description: String },

    #[error("api error {code}: {description}")]
    Api { code: i64, description: String },

    #[error("decode error: {0}")]
    Decode(String),
}

impl TransportError {
    /// Failures expected to clear up on their own. The poll loop retries
    /// everything until the deadline; this only picks the log level.
    pub fn is_retryable(&self) -> bool {
        match self {
            TransportError::Network(_) | TransportError::Timeout | TransportError::Decode(_) => {
                true
            }
            TransportError::HttpStatus { status, .. } => {
                *status == 409 || *status == 429 || *status >= 500
            }
            TransportError::Api { code, .. } => *code == 409 || *code == 429 || *code >= 500,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token belongs to another namespace")]
    WrongNamespace,

    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("unknown action: {0}")]
    UnknownAction(String),

    #[error("encoded token is {len} bytes, limit is {limit}")]
    TooLong { len: usize, limit: usize },
}
