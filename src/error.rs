//! Failure taxonomy for dispatched calls.
//!
//! Application-level failures (a 200 response whose `errCode` reports an
//! error) are not represented here: they arrive as a successful raw body.

use std::error::Error as StdError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EcError {
    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to encode request parameters: {0}")]
    Serialization(String),

    #[error("invalid request URL: {0}")]
    InvalidUrl(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("transport error: {0}")]
    Transport(String),
}

impl EcError {
    /// True for failures raised by the wire rather than by request encoding.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Timeout(_) | Self::Connect(_) | Self::Status { .. } | Self::Transport(_)
        )
    }
}

impl From<hyper_util::client::legacy::Error> for EcError {
    fn from(err: hyper_util::client::legacy::Error) -> Self {
        let message = describe(&err);
        if err.is_connect() {
            Self::Connect(message)
        } else {
            Self::Transport(message)
        }
    }
}

impl From<hyper::Error> for EcError {
    fn from(err: hyper::Error) -> Self {
        let message = describe(&err);
        if err.is_timeout() {
            Self::Timeout(message)
        } else {
            Self::Transport(message)
        }
    }
}

impl From<http::Error> for EcError {
    fn from(err: http::Error) -> Self {
        Self::InvalidRequest(describe(&err))
    }
}

impl From<std::io::Error> for EcError {
    fn from(err: std::io::Error) -> Self {
        Self::Transport(describe(&err))
    }
}

impl From<serde_json::Error> for EcError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Render an error together with its source chain.
///
/// hyper keeps the useful part ("Connection refused", "tls handshake eof")
/// in the sources rather than in its own message.
fn describe(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
