//! Error types for the debt reminder.

/// Top-level error type for one reminder run.
///
/// Variants are transparent so the message reported at the HTTP boundary is
/// the stage error's own message.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Sheet(#[from] SheetError),

    #[error(transparent)]
    Notify(#[from] NotifyError),
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Spreadsheet export errors.
#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    /// The export endpoint answered with a non-success status. The status is
    /// kept for logs only; callers see the generic message.
    #[error("Gagal ambil data Sheet")]
    BadStatus { status: u16 },

    #[error("{0}")]
    Request(String),
}

/// Messaging relay errors.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("{0}")]
    Request(String),

    #[error("Invalid relay response: {0}")]
    InvalidResponse(String),
}

/// Result type alias for reminder runs.
pub type Result<T> = std::result::Result<T, Error>;
