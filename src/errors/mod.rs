//! # Error Handling
//!
//! Error types for the registry bridge, defined with `thiserror`.
//!
//! The four bridge-operation variants (`Config`, `Registration`,
//! `Unsubscribe`, `RouteInjection`) display only their underlying cause: the
//! HTTP layer frames them as `"subscribe fail, err: {cause}"` /
//! `"unsubscribe fail, err: {cause}"`, so the variant carries the taxonomy
//! and the message stays the collaborator's own wording.

/// Custom result type for bridge operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the registry bridge
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Malformed endpoint or request input
    #[error("{0}")]
    Config(String),

    /// Registry register/unregister call failed
    #[error("{0}")]
    Registration(String),

    /// Registry unsubscribe call failed after a successful unregister
    #[error("{0}")]
    Unsubscribe(String),

    /// Router manager refused a route rule
    #[error("{0}")]
    RouteInjection(String),

    /// Network transport errors (HTTP server)
    #[error("Transport error: {0}")]
    Transport(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a new registration error
    pub fn registration<S: Into<String>>(message: S) -> Self {
        Self::Registration(message.into())
    }

    /// Create a new unsubscribe error
    pub fn unsubscribe<S: Into<String>>(message: S) -> Self {
        Self::Unsubscribe(message.into())
    }

    /// Create a new route injection error
    pub fn route_injection<S: Into<String>>(message: S) -> Self {
        Self::RouteInjection(message.into())
    }

    /// Create a new transport error
    pub fn transport<S: Into<String>>(message: S) -> Self {
        Self::Transport(message.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }
}
