//! Error types for contacts-tui
//!
//! Wraps service layer errors and terminal/IO errors for unified handling.

use thiserror::Error;

/// TUI-specific errors
#[derive(Error, Debug)]
pub enum TuiError {
    /// Service layer error
    #[error("Service error: {0}")]
    Service(#[from] libcontacts::ContactsError),

    /// Terminal/IO error
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

impl TuiError {
    /// Process exit code, delegating to the service error where there is one
    pub fn exit_code(&self) -> i32 {
        match self {
            TuiError::Service(e) => e.exit_code(),
            TuiError::Terminal(_) => 1,
        }
    }
}

/// Result type for TUI operations
pub type Result<T> = std::result::Result<T, TuiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use libcontacts::ContactsError;

    #[test]
    fn test_service_error_keeps_its_exit_code() {
        let error = TuiError::from(ContactsError::InvalidInput("bad".to_string()));
        assert_eq!(error.exit_code(), 3);
    }

    #[test]
    fn test_terminal_error_exit_code() {
        let error = TuiError::from(std::io::Error::new(std::io::ErrorKind::Other, "tty gone"));
        assert_eq!(error.exit_code(), 1);
    }
}
