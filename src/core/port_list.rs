//! Candidate targets shown to the user.

use crate::core::discovery::PeerDirectory;

/// Append-only list of serial ports and discovered peers.
///
/// Refreshing adds entries that are not yet present and never removes
/// entries for devices that went away.
#[derive(Debug, Default, Clone)]
pub struct PortList {
    entries: Vec<String>,
}

impl PortList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge peers and local ports into the list, peers first.
    /// Returns how many entries were added.
    pub fn refresh<S: AsRef<str>>(&mut self, local_ports: &[S], peers: &PeerDirectory) -> usize {
        let before = self.entries.len();

        for peer in peers.peers() {
            self.add_if_missing(peer.list_entry());
        }
        for port in local_ports {
            self.add_if_missing(port.as_ref().to_string());
        }

        self.entries.len() - before
    }

    /// An entry counts as present when an existing entry contains its text.
    pub fn contains(&self, candidate: &str) -> bool {
        self.entries.iter().any(|entry| entry.contains(candidate))
    }

    fn add_if_missing(&mut self, candidate: String) {
        if !candidate.is_empty() && !self.contains(&candidate) {
            self.entries.push(candidate);
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
