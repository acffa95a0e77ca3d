//! Error types for store operations.

use std::fmt;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    /// The request timed out on every attempt.
    #[error("Request timed out after {attempts} attempt(s)")]
    Timeout { attempts: u32 },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Server responded with HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Invalid response JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// The server answered but refused the write.
    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl StoreError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, StoreError::Timeout { .. })
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            StoreError::Timeout { attempts: 1 }
        } else if let Some(status) = err.status() {
            StoreError::Http {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else {
            StoreError::Network(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// One of the two feeds fetched for a month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feed {
    Bookings,
    Availability,
}

impl fmt::Display for Feed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feed::Bookings => f.write_str("bookings"),
            Feed::Availability => f.write_str("availability"),
        }
    }
}

/// A degraded month load. The calendar still renders; this is the
/// non-blocking alert shown alongside it.
#[derive(Error, Debug)]
pub enum FetchIssue {
    /// One feed failed; the other rendered normally.
    #[error("Could not load {feed}: {error}")]
    Partial { feed: Feed, error: StoreError },

    /// Both feeds failed; the calendar shows no data.
    #[error("Could not load schedule (bookings: {bookings}; availability: {availability})")]
    Unavailable {
        bookings: StoreError,
        availability: StoreError,
    },
}
