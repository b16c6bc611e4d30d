use thiserror::Error;

/// Errors raised while building, parsing or mutating a header field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    /// Bad arguments for an address: empty or malformed email, or a display name that would
    /// break the header line.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The raw header line could not be understood as the requested field.
    #[error("Parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, HeaderError>;
