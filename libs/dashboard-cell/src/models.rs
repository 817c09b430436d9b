use std::fmt;
use shared_models::error::ClientError;

pub const LOGIN_FAILED: &str = "Login failed";
pub const REGISTRATION_FAILED: &str = "Registration failed";
pub const BOOKING_FAILED: &str = "Failed to book appointment";
pub const UPDATE_FAILED: &str = "Failed to update appointment";
pub const CANCEL_FAILED: &str = "Failed to cancel appointment";

pub const BOOKED: &str = "Appointment booked successfully!";
pub const CANCELLED: &str = "Appointment cancelled successfully";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Transient feedback shown after a user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    /// Error notice carrying the backend's message, or `fallback` when the
    /// failure has none.
    pub fn from_error(error: &ClientError, fallback: &str) -> Self {
        Self::error(error.server_message().unwrap_or(fallback))
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            NoticeLevel::Success => write!(f, "[ok] {}", self.message),
            NoticeLevel::Error => write!(f, "[error] {}", self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_message_wins() {
        let notice = Notice::from_error(&ClientError::Auth("Invalid credentials".into()), LOGIN_FAILED);
        assert_eq!(notice, Notice::error("Invalid credentials"));
    }

    #[test]
    fn test_fallback_without_message() {
        let network = ClientError::Network("connection refused".into());
        assert_eq!(Notice::from_error(&network, BOOKING_FAILED).message, BOOKING_FAILED);

        let blank = ClientError::Api { status: 500, message: " ".into() };
        assert_eq!(Notice::from_error(&blank, UPDATE_FAILED).message, UPDATE_FAILED);
    }
}
