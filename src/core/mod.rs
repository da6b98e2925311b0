// Core module - Line buffering, target selection and connection lifecycle
pub mod discovery;
pub mod line_buffer;
pub mod link;
pub mod port_list;
pub mod selector;
pub mod transcript;

pub use discovery::{DiscoveredPeer, PeerDirectory};
pub use line_buffer::LineBuffer;
pub use link::{ConnectionManager, ConnectionState, LinkEvent, LinkEventKind, LinkId};
pub use port_list::PortList;
pub use selector::{ConnectionRequest, LinkTarget, PortChoice, SpeedChoice, TargetSelection, TransportKind};
pub use transcript::{LineSink, Transcript};
