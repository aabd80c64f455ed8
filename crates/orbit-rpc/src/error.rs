//! RPC error types.

use thiserror::Error;

/// Response `code` the gateway uses for success.
pub const CODE_SUCCESSFUL: &str = "successful";

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("HTTP error calling {method} {url}: {source}")]
    Http {
        method: String,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} from {method} {url}: {body}")]
    HttpStatus {
        method: String,
        url: String,
        status: u16,
        body: String,
    },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("gateway error ({code}) for {context}: {message}")]
    Api {
        code: String,
        message: String,
        context: String,
    },

    #[error("no data in response to {context}")]
    NoData { context: String },

    #[error("invalid response to {context}: {reason}")]
    InvalidResponse { context: String, reason: String },
}

impl RpcError {
    /// True for failures of the transport itself (connect, timeout), as
    /// opposed to the gateway answering with an error.
    pub fn is_transport(&self) -> bool {
        match self {
            RpcError::Http { source, .. } => source.is_connect() || source.is_timeout(),
            _ => false,
        }
    }
}
