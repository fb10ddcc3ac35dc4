//! Error type shared by configuration and host bridges

use std::fmt;

/// Errors surfaced at construction time or at the WASM boundary.
///
/// Nothing inside a measurement pass returns an error: unmeasurable blocks
/// and degenerate fillers are absorbed and self-correct on the next pass.
#[derive(Debug)]
pub enum PaginationError {
    /// A configuration value is out of range
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },
    /// A flat geometry buffer handed over by the host is malformed
    MalformedGeometry { reason: String },
    /// Configuration JSON could not be parsed
    Config(serde_json::Error),
}

impl PaginationError {
    pub(crate) fn invalid(field: &'static str, reason: &'static str) -> Self {
        Self::InvalidConfig { field, reason }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedGeometry {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for PaginationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig { field, reason } => {
                write!(f, "invalid pagination config: {} {}", field, reason)
            }
            Self::MalformedGeometry { reason } => write!(f, "malformed geometry: {}", reason),
            Self::Config(err) => write!(f, "failed to parse pagination config: {}", err),
        }
    }
}

impl std::error::Error for PaginationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for PaginationError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err)
    }
}
