//! Custom error types for the milkyway-stats crate.

use thiserror::Error;

/// The primary error type for all operations in this crate.
#[derive(Debug, Error)]
pub enum MilkywayError {
    /// An error originating from I/O operations.
    #[error("I/O error: {0:?}")]
    Io(#[from] std::io::Error),

    /// An error originating from the HTTP transport.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The byte stream ended before a read could be satisfied.
    #[error("Unexpected end of data: needed {needed} bytes at offset {offset}, {remaining} remaining")]
    UnexpectedEndOfData {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    /// A 7-bit encoded length prefix ran past its 5-byte limit.
    #[error("Too many bytes in what should have been a 7 bit encoded Int32")]
    VarIntTooLong,

    /// The login response did not have the expected field count.
    #[error("Malformed login response: expected '<login_key>,<full_data_url>', got {found} fields")]
    MalformedResponse { found: usize },

    /// The payload is structurally invalid.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// A convenience `Result` type alias using the crate's `MilkywayError` type.
pub type Result<T> = std::result::Result<T, MilkywayError>;
