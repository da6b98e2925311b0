use crate::domain::fault::SerialFault;
use thiserror::Error;

/// TermLink unified error type
#[derive(Error, Debug)]
pub enum TermLinkError {
    #[error("Serial fault: {0}")]
    Fault(#[from] SerialFault),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Discovery error: {message}")]
    Discovery { message: String },

    #[error("Device not connected")]
    NotConnected,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Output error: {0}")]
    Output(String),

    #[error("TUI error: {0}")]
    Tui(String),
}

pub type TermLinkResult<T> = Result<T, TermLinkError>;
