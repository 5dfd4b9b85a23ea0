//! Error types for s2k-io

use std::fmt;

use s2k_deck::ParseError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, IoError>;

/// Element family that can reference a joint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Frame,
    Area,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKind::Frame => f.write_str("frame"),
            ElementKind::Area => f.write_str("area"),
        }
    }
}

#[derive(Error, Debug)]
pub enum IoError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Unresolved reference: {element_kind} {element_id} uses undefined joint '{joint}'")]
    UnresolvedReference {
        element_kind: ElementKind,
        element_id: String,
        joint: String,
    },

    #[error("Invalid id list token '{token}': {reason}")]
    InvalidIdList { token: String, reason: String },

    #[error("Formatting error: {0}")]
    Fmt(#[from] fmt::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<tempfile::PersistError> for IoError {
    fn from(err: tempfile::PersistError) -> Self {
        IoError::Io(err.error)
    }
}
