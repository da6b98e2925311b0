//! Bookkeeping for peers that announce themselves over UDP.

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

/// A peer heard on the discovery port
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveredPeer {
    pub address: String,
    pub name: String,
}

impl DiscoveredPeer {
    /// Text shown for this peer in the port list.
    pub fn list_entry(&self) -> String {
        format_peer_entry(&self.address, &self.name)
    }
}

pub fn format_peer_entry(address: &str, name: &str) -> String {
    format!("{}  [{}]", address, name)
}

/// Address to advertised name. The first announcement from an address wins
/// and entries are kept for the lifetime of the process.
#[derive(Debug, Default, Clone)]
pub struct PeerDirectory {
    peers: BTreeMap<String, String>,
}

impl PeerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an announcement. Returns `true` when the address was new.
    pub fn record(&mut self, address: impl Into<String>, name: impl Into<String>) -> bool {
        let address = address.into();
        if self.peers.contains_key(&address) {
            return false;
        }
        info!("Add new remote peer {}", address);
        self.peers.insert(address, name.into());
        true
    }

    pub fn name_of(&self, address: &str) -> Option<&str> {
        self.peers.get(address).map(String::as_str)
    }

    pub fn peers(&self) -> impl Iterator<Item = DiscoveredPeer> + '_ {
        self.peers.iter().map(|(address, name)| DiscoveredPeer {
            address: address.clone(),
            name: name.clone(),
        })
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}
