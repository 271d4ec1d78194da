use thiserror::Error;

pub const GENERIC_FAILURE: &str = "An error occurred. Please try again.";

/// Failure of a remote call. `Clone` because results travel inside iced messages.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("no credential stored, request not sent")]
    MissingCredential,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("server responded with status {status}")]
    Status { status: u16, message: Option<String> },

    #[error("unexpected response body: {0}")]
    Decode(String),

    #[error("not supported by this server: {0}")]
    Unsupported(&'static str),
}

impl ApiError {
    /// Text shown to the user in an alert: the server's own error when it sent one.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { message: Some(message), .. } if !message.trim().is_empty() => {
                message.clone()
            }
            _ => GENERIC_FAILURE.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("credential file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed config file: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_is_preferred() {
        let err = ApiError::Status { status: 401, message: Some("Invalid credentials".into()) };
        assert_eq!(err.user_message(), "Invalid credentials");
    }

    #[test]
    fn fallback_message_when_server_is_silent() {
        assert_eq!(ApiError::Status { status: 500, message: None }.user_message(), GENERIC_FAILURE);
        assert_eq!(ApiError::Transport("refused".into()).user_message(), GENERIC_FAILURE);
        assert_eq!(
            ApiError::Status { status: 400, message: Some("  ".into()) }.user_message(),
            GENERIC_FAILURE
        );
    }
}
