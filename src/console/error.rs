//! Console Error Types
//!
//! Two families of errors live here:
//!
//! - `GatewayError` - a request to the API failed (transport, non-2xx status,
//!   or an undecodable 2xx body)
//! - `ConsoleError` - a user intent was rejected before anything was sent
//!   (validation, a busy control, an unknown id, an illegal modal transition)
//!
//! Gateway errors never escape an intent call. They arrive later as
//! completions and are turned into status/error state by the synchronizer.

use thiserror::Error;

use crate::shared::SharedError;

/// Status class of a failed request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// 4xx response
    Client,
    /// 5xx, unexpected status, or malformed body
    Server,
    /// The request never produced a response
    Transport,
}

/// A failed call to the collection API
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// Network unreachable, timeout, or a body that could not be read
    #[error("Network error: {message}")]
    Transport { message: String },

    /// Non-2xx response, or a 2xx the endpoint does not answer with
    #[error("Request failed ({status}): {message}")]
    Server { status: u16, message: String },

    /// A 2xx response whose body does not match the endpoint schema
    #[error("Malformed response: {message}")]
    Malformed { message: String },
}

impl GatewayError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }

    pub fn class(&self) -> FailureClass {
        match self {
            Self::Transport { .. } => FailureClass::Transport,
            Self::Server { status, .. } if (400..500).contains(status) => FailureClass::Client,
            Self::Server { .. } | Self::Malformed { .. } => FailureClass::Server,
        }
    }

    /// HTTP status, when a response was received
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::transport("request timed out")
        } else if err.is_decode() {
            Self::malformed(err.to_string())
        } else {
            Self::transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        Self::malformed(format!("JSON error: {}", err))
    }
}

/// A user intent the console refused to act on
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConsoleError {
    /// Field validation failed; nothing was sent
    #[error(transparent)]
    Validation(#[from] SharedError),

    /// The control that triggers this action already has a request in flight
    #[error("{0} is already in progress")]
    Busy(&'static str),

    /// The id is not present in the loaded collection
    #[error("software '{0}' is not loaded")]
    NotFound(String),

    /// The modal is in a state that does not allow this action
    #[error("cannot {action} while the modal is {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },

    /// `confirm_delete` without a preceding `request_delete`
    #[error("no delete is awaiting confirmation")]
    NoPendingDelete,

    /// Inserting a record whose id is already held
    #[error("software '{0}' is already in the collection")]
    DuplicateId(String),
}
