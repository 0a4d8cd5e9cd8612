/*!
 * Error types for HarvestX
 */

use harvest_connect::ConnectError;
use std::fmt;
use std::io;

pub type Result<T> = std::result::Result<T, HarvestError>;

/// Exit code constants for structured process exit
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_FATAL: i32 = 2;
pub const EXIT_UNAVAILABLE: i32 = 3;

#[derive(Debug)]
pub enum HarvestError {
    /// Configuration error
    Config(String),

    /// Marketplace canister error
    Connect(ConnectError),

    /// I/O error
    Io(io::Error),

    /// Generic error with message
    Other(String),
}

impl HarvestError {
    /// Get the process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            HarvestError::Config(_) => EXIT_FATAL,
            HarvestError::Connect(ConnectError::InvalidConfig(_)) => EXIT_FATAL,
            // Replica unreachable
            HarvestError::Connect(e) if e.is_transport() => EXIT_UNAVAILABLE,
            _ => EXIT_FAILURE,
        }
    }
}

impl fmt::Display for HarvestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HarvestError::Config(msg) => {
                write!(f, "Configuration error: {}", msg)
            }
            HarvestError::Connect(err) => {
                write!(f, "Marketplace error: {}", err)
            }
            HarvestError::Io(err) => {
                write!(f, "I/O error: {}", err)
            }
            HarvestError::Other(msg) => {
                write!(f, "{}", msg)
            }
        }
    }
}

impl std::error::Error for HarvestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HarvestError::Connect(err) => Some(err),
            HarvestError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConnectError> for HarvestError {
    fn from(err: ConnectError) -> Self {
        HarvestError::Connect(err)
    }
}

impl From<io::Error> for HarvestError {
    fn from(err: io::Error) -> Self {
        HarvestError::Io(err)
    }
}

impl From<toml::de::Error> for HarvestError {
    fn from(err: toml::de::Error) -> Self {
        HarvestError::Config(format!("TOML parse error: {}", err))
    }
}

impl From<toml::ser::Error> for HarvestError {
    fn from(err: toml::ser::Error) -> Self {
        HarvestError::Config(format!("TOML write error: {}", err))
    }
}
