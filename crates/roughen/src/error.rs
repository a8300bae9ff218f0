//! Error type shared by every generation entry point.
//!
//! Failures are split by cause so callers can tell a bad request apart from a
//! missing collaborator:
//! - `InvalidGeometry` = the primitive itself cannot be sketched
//! - `InvalidOption` = an option is outside its domain
//! - `UnavailableCapability` = an external collaborator was not installed
//!
//! Every check runs before the first random value of a call is drawn, so a
//! failed call leaves the generator's random state exactly where it was.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("invalid geometry for {shape}: {reason}")]
    InvalidGeometry { shape: &'static str, reason: String },

    #[error("invalid option `{field}`: {reason}")]
    InvalidOption { field: &'static str, reason: String },

    #[error("capability unavailable: {0}")]
    UnavailableCapability(&'static str),

    #[error("path data error: {0}")]
    PathData(String),

    #[error("glyph outline error: {0}")]
    Outline(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn geometry(shape: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidGeometry { shape, reason: reason.into() }
    }

    pub(crate) fn option(field: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidOption { field, reason: reason.into() }
    }
}
