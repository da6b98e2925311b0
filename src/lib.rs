//! TermLink Library
//!
//! Line-oriented terminal for serial ports and TCP hosts, with passive
//! discovery of network devices that announce themselves over UDP.

pub mod cli;
pub mod tui;
pub mod core;
pub mod domain;
pub mod infrastructure;

pub use domain::error::{TermLinkError, TermLinkResult};
pub use domain::config::TermLinkConfig;
pub use domain::fault::SerialFault;
pub use core::link::{ConnectionManager, ConnectionState, LinkEvent, LinkEventKind, LinkId};
pub use core::selector::{ConnectionRequest, LinkTarget, TargetSelection};
pub use core::line_buffer::LineBuffer;
