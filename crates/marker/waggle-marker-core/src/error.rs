//! Load-time errors. Runtime commands never fail; see the driver.

use thiserror::Error;

/// Problems turning SVG path data into a [`crate::Curve`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PathError {
    #[error("invalid SVG path data: {0}")]
    Syntax(String),
    #[error("unsupported path segment '{0}'")]
    Unsupported(&'static str),
    #[error("path has no drawable length")]
    Empty,
}

/// Problems validating an ordered stop list.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StopListError {
    #[error("stop list is empty")]
    Empty,
    #[error("duplicate stop id '{0}'")]
    DuplicateId(String),
    #[error("stop '{id}' declares index {declared} but sits at position {position}")]
    IndexMismatch {
        id: String,
        declared: usize,
        position: usize,
    },
}

/// Umbrella error for loading configuration, curves and stops.
#[derive(Debug, Error)]
pub enum WaggleError {
    #[error(transparent)]
    Path(#[from] PathError),
    #[error(transparent)]
    Stops(#[from] StopListError),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}
