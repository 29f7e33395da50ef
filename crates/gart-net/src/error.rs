use thiserror::Error;

/// Centralized error type for gart-net.
#[derive(Debug, Error, Clone)]
pub enum NetError {
    /// Connection-level failure: DNS, TLS, refused, timed out.
    #[error("transport failure: {0}")]
    Transport(String),

    /// Non-success HTTP status.
    #[error("HTTP {status} for URL: {url}")]
    Status { status: u16, url: String },

    /// Response arrived but did not have the expected shape
    /// (missing headers, unparsable lengths, body on a 304).
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl NetError {
    pub fn transport<S: Into<String>>(msg: S) -> Self {
        Self::Transport(msg.into())
    }

    pub fn status(status: u16, url: &url::Url) -> Self {
        Self::Status {
            status,
            url: url.to_string(),
        }
    }

    pub fn malformed<S: Into<String>>(msg: S) -> Self {
        Self::Malformed(msg.into())
    }

    /// 4xx: the request itself is invalid or the resource does not exist.
    pub fn is_client_error(&self) -> bool {
        matches!(self, NetError::Status { status, .. } if (400..500).contains(status))
    }

    /// 5xx: server-side, typically transient.
    pub fn is_server_error(&self) -> bool {
        matches!(self, NetError::Status { status, .. } if (500..600).contains(status))
    }

    /// HTTP status code, if this is a status error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            NetError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for NetError {
    fn from(error: reqwest::Error) -> Self {
        Self::Transport(error.to_string())
    }
}

pub type NetResult<T> = Result<T, NetError>;
