//! Error handling with context pattern
//!
//! Each layer adds context to errors as they bubble up.

use std::fmt;

/// Result type alias for MCP operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// Tool arguments did not match the tool's input schema
    InvalidParams {
        tool: String,
        source: serde_json::Error,
    },
    /// Serialization/deserialization error
    Serialization {
        context: String,
        source: serde_json::Error,
    },
    /// Reading requests or writing responses failed
    Io {
        context: String,
        source: std::io::Error,
    },
    /// A request task panicked or was cancelled
    Task { details: String },
}

impl Error {
    /// JSON-RPC error code reported for this error
    pub fn code(&self) -> i32 {
        match self {
            Error::InvalidParams { .. } => crate::mcp::INVALID_PARAMS,
            _ => crate::mcp::EXECUTION_ERROR,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidParams { tool, source } => {
                write!(f, "Invalid arguments for {}: {}", tool, source)
            }
            Error::Serialization { context, source } => {
                write!(f, "Serialization error in {}: {}", context, source)
            }
            Error::Io { context, source } => write!(f, "I/O error while {}: {}", context, source),
            Error::Task { details } => write!(f, "Request task failed: {}", details),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidParams { source, .. } => Some(source),
            Error::Serialization { source, .. } => Some(source),
            Error::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Extension trait for adding context to errors
pub trait ErrorContext<T> {
    fn with_context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ErrorContext<T> for std::result::Result<T, serde_json::Error> {
    fn with_context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Serialization {
            context: context.into(),
            source: e,
        })
    }
}

impl<T> ErrorContext<T> for std::result::Result<T, std::io::Error> {
    fn with_context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Io {
            context: context.into(),
            source: e,
        })
    }
}
