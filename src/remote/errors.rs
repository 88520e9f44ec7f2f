use thiserror::Error;

/// Failures reported by the remote service client.
///
/// Kinds stay distinct so callers can tell a duplicate record apart from a
/// transport problem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    #[error("record already exists: {message}")]
    Conflict { message: String },
    #[error("request was not authorized: {message}")]
    Unauthorized { message: String },
    #[error("network error: {message}")]
    Network { message: String },
    #[error("operation '{operation}' timed out")]
    Timeout { operation: String },
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("GraphQL error: {}", messages.join("; "))]
    GraphQl { messages: Vec<String> },
    #[error("invalid response: {message}")]
    InvalidResponse { message: String },
}

impl RemoteError {
    pub fn network(message: impl Into<String>) -> Self {
        RemoteError::Network {
            message: message.into(),
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        RemoteError::InvalidResponse {
            message: message.into(),
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, RemoteError::Conflict { .. })
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            let operation = err
                .url()
                .map(|url| url.path().to_string())
                .unwrap_or_else(|| "request".to_string());
            RemoteError::Timeout { operation }
        } else if err.is_decode() {
            RemoteError::invalid_response(err.to_string())
        } else if let Some(status) = err.status() {
            RemoteError::Http {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else {
            RemoteError::network(err.to_string())
        }
    }
}
