//! Error types for the harvest-connect crate

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConnectError {
    /// Failure of the remote call itself. Carries the transport's message as is.
    #[error("{0}")]
    Transport(String),

    /// The canister answered, but with `success = false` or without the
    /// payload the operation requires. Displays as the bare message.
    #[error("{0}")]
    Rejected(String),

    #[error("Canister payload codec error: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("Candid codec error: {0}")]
    Candid(#[from] candid::Error),

    /// Arguments that do not fit the procedure's Candid signature
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),

    #[error("Session is closed")]
    SessionClosed,
}

impl ConnectError {
    /// True for failures of the remote call itself, as opposed to an
    /// application-level rejection carried inside the envelope.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ConnectError::Transport(_) | ConnectError::SessionClosed
        )
    }
}
