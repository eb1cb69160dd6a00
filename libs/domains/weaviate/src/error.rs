use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeaviateError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Weaviate returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("GraphQL error: {}", .0.join("; "))]
    GraphQl(Vec<String>),

    #[error("Collection not found: {0}")]
    CollectionNotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unexpected response: {0}")]
    Decode(String),
}

pub type WeaviateResult<T> = Result<T, WeaviateError>;

impl WeaviateError {
    /// Whether the failure happened before Weaviate could answer
    pub fn is_connection(&self) -> bool {
        matches!(self, WeaviateError::Connection(_))
    }
}

impl From<reqwest::Error> for WeaviateError {
    fn from(err: reqwest::Error) -> Self {
        let message = error_chain(&err);
        if err.is_decode() {
            WeaviateError::Decode(message)
        } else if let Some(status) = err.status() {
            WeaviateError::Status {
                status: status.as_u16(),
                body: message,
            }
        } else {
            WeaviateError::Connection(message)
        }
    }
}

impl From<serde_json::Error> for WeaviateError {
    fn from(err: serde_json::Error) -> Self {
        WeaviateError::Decode(format!("JSON error: {}", err))
    }
}

/// reqwest's top-level message hides the cause ("error sending request");
/// append the source chain so "connection refused" reaches the caller.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_message = cause.to_string();
        if !message.contains(&cause_message) {
            message.push_str(": ");
            message.push_str(&cause_message);
        }
        source = cause.source();
    }
    message
}
