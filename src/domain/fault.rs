use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;

/// Faults reported by a serial link.
///
/// Every fault is either fatal, which tears the session down, or transient,
/// which is logged while the link stays up.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SerialFault {
    #[error("device not found")]
    DeviceNotFound,
    #[error("permission denied on serial port")]
    PermissionDenied,
    #[error("failed to open serial port")]
    OpenFailed,
    #[error("parity error on serial port")]
    Parity,
    #[error("framing error on serial port")]
    Framing,
    #[error("break condition on serial port")]
    BreakCondition,
    #[error("write error on serial port")]
    WriteFailure,
    #[error("read error on serial port")]
    ReadFailure,
    #[error("serial port disappeared")]
    ResourceDisappeared,
    #[error("unsupported operation on serial port")]
    UnsupportedOperation,
    #[error("unknown serial port error")]
    Unknown,
    #[error("timeout on serial port")]
    Timeout,
    #[error("serial port is not open")]
    NotOpen,
}

impl SerialFault {
    pub const ALL: [SerialFault; 13] = [
        SerialFault::DeviceNotFound,
        SerialFault::PermissionDenied,
        SerialFault::OpenFailed,
        SerialFault::Parity,
        SerialFault::Framing,
        SerialFault::BreakCondition,
        SerialFault::WriteFailure,
        SerialFault::ReadFailure,
        SerialFault::ResourceDisappeared,
        SerialFault::UnsupportedOperation,
        SerialFault::Unknown,
        SerialFault::Timeout,
        SerialFault::NotOpen,
    ];

    /// Whether this fault must tear the session down.
    pub fn is_fatal(self) -> bool {
        !matches!(
            self,
            SerialFault::Parity
                | SerialFault::Framing
                | SerialFault::BreakCondition
                | SerialFault::WriteFailure
                | SerialFault::ReadFailure
        )
    }

    /// Classify an error returned while opening a port.
    pub fn from_open_error(err: &serialport::Error) -> Self {
        match err.kind() {
            serialport::ErrorKind::NoDevice => SerialFault::DeviceNotFound,
            serialport::ErrorKind::InvalidInput => SerialFault::UnsupportedOperation,
            serialport::ErrorKind::Io(io::ErrorKind::NotFound) => SerialFault::DeviceNotFound,
            serialport::ErrorKind::Io(io::ErrorKind::PermissionDenied) => {
                SerialFault::PermissionDenied
            }
            serialport::ErrorKind::Io(_) => SerialFault::OpenFailed,
            serialport::ErrorKind::Unknown => SerialFault::Unknown,
        }
    }

    /// Classify an I/O error from a read on an open port.
    pub fn from_read_error(err: &io::Error) -> Self {
        match Self::disappeared_or_denied(err) {
            Some(fault) => fault,
            None => match err.kind() {
                io::ErrorKind::TimedOut => SerialFault::Timeout,
                _ => SerialFault::ReadFailure,
            },
        }
    }

    /// Classify an I/O error from a write on an open port.
    pub fn from_write_error(err: &io::Error) -> Self {
        match Self::disappeared_or_denied(err) {
            Some(fault) => fault,
            None => match err.kind() {
                io::ErrorKind::TimedOut => SerialFault::Timeout,
                _ => SerialFault::WriteFailure,
            },
        }
    }

    fn disappeared_or_denied(err: &io::Error) -> Option<Self> {
        match err.kind() {
            io::ErrorKind::NotFound
            | io::ErrorKind::BrokenPipe
            | io::ErrorKind::UnexpectedEof => Some(SerialFault::ResourceDisappeared),
            io::ErrorKind::NotConnected => Some(SerialFault::NotOpen),
            io::ErrorKind::PermissionDenied => Some(SerialFault::PermissionDenied),
            io::ErrorKind::Unsupported => Some(SerialFault::UnsupportedOperation),
            _ => None,
        }
    }
}
