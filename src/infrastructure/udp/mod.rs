// UDP module - Peer discovery listener
pub mod listener;

pub use listener::{DiscoveryListener, PeerAnnouncement};
