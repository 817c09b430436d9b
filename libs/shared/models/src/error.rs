use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Invalid state: {0}")]
    State(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected response ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Decode error: {0}")]
    Decode(String),
}

impl ClientError {
    /// Maps a non-success HTTP status to the client taxonomy.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => ClientError::Auth(message),
            400 | 422 => ClientError::Validation(message),
            404 => ClientError::NotFound(message),
            409 => ClientError::Conflict(message),
            _ => ClientError::Api { status, message },
        }
    }

    /// Message the backend attached to the failure, if any.
    pub fn server_message(&self) -> Option<&str> {
        let message = match self {
            ClientError::Auth(m)
            | ClientError::Validation(m)
            | ClientError::Conflict(m)
            | ClientError::NotFound(m)
            | ClientError::State(m) => m,
            ClientError::Api { message, .. } => message,
            ClientError::Network(_) | ClientError::Decode(_) => return None,
        };
        if message.trim().is_empty() {
            None
        } else {
            Some(message)
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, ClientError::Auth(_))
    }
}
