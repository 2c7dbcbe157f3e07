//! Error and result types shared across the crate.

use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Edge lengths must be strictly positive and finite.
    #[error("edge length must be a positive finite number, got {length}")]
    InvalidLength { length: f64 },

    /// Structural violation in persisted data: bad format tag, truncated
    /// payload, unsupported version, or a missing required attribute.
    #[error("malformed {format} data: {reason}")]
    Format {
        format: &'static str,
        reason: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    pub(crate) fn format(format: &'static str, reason: impl Into<String>) -> Self {
        Error::Format {
            format,
            reason: reason.into(),
        }
    }
}
