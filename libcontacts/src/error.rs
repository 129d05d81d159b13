//! Error types for the contact manager

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ContactsError>;

/// Result of a contact store operation
pub type StorageResult<T> = std::result::Result<T, StorageError>;

#[derive(Error, Debug)]
pub enum ContactsError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ContactsError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            ContactsError::InvalidInput(_) => 3,
            ContactsError::Config(_) => 1,
            ContactsError::Storage(_) => 1,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },
}

/// The only failure kind the contact store reports.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database operation failed: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Raised by the in-memory store when configured to fail.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}
