// Link module - Connection lifecycle for serial and TCP transports
pub mod event;
pub mod manager;
pub mod transport;

pub use event::{LinkEvent, LinkEventKind, LinkId, Subscription};
pub use manager::{ConnectionManager, ConnectionState, NOT_CONNECTED};
pub use transport::{SerialBackend, SerialChannel, SerialDevice};
