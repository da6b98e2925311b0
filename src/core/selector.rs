//! Turns what the user picked into a connection request.

use crate::domain::config::{NetworkConfig, SerialConfig};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Custom addresses must be longer than this to count as network targets.
const MIN_CUSTOM_ADDRESS_CHARS: usize = 3;
/// Serial device names shorter than this are rejected.
const MIN_SERIAL_NAME_CHARS: usize = 2;

/// Transport kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    Serial,
    Tcp,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportKind::Serial => write!(f, "serial"),
            TransportKind::Tcp => write!(f, "tcp"),
        }
    }
}

/// Where a link should go
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LinkTarget {
    Serial { port: String, baud_rate: u32 },
    Tcp { host: String, port: u16 },
}

impl LinkTarget {
    pub fn kind(&self) -> TransportKind {
        match self {
            LinkTarget::Serial { .. } => TransportKind::Serial,
            LinkTarget::Tcp { .. } => TransportKind::Tcp,
        }
    }
}

impl fmt::Display for LinkTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkTarget::Serial { port, baud_rate } => write!(f, "{} @ {} baud", port, baud_rate),
            LinkTarget::Tcp { host, port } => write!(f, "{}:{}", host, port),
        }
    }
}

/// A resolved request to open a link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionRequest {
    pub target: LinkTarget,
    /// Name shown in the status line
    pub label: String,
}

/// Network port selection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PortChoice {
    #[default]
    Telnet,
    Alternate,
    /// Raw text typed by the user
    Custom(String),
}

impl PortChoice {
    pub fn resolve(&self, network: &NetworkConfig) -> u16 {
        match self {
            PortChoice::Telnet => network.telnet_port,
            PortChoice::Alternate => network.alternate_port,
            PortChoice::Custom(raw) => match raw.trim().parse::<u16>() {
                Ok(port) if port != 0 => port,
                _ => {
                    debug!("Custom port '{}' is invalid, using {}", raw, network.telnet_port);
                    network.telnet_port
                }
            },
        }
    }
}

/// Serial speed selection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SpeedChoice {
    #[default]
    Default,
    HighSpeed,
    /// Raw text typed by the user
    Custom(String),
}

impl SpeedChoice {
    pub fn resolve(&self, serial: &SerialConfig) -> u32 {
        match self {
            SpeedChoice::Default => serial.default_baud,
            SpeedChoice::HighSpeed => serial.high_speed_baud,
            SpeedChoice::Custom(raw) => match raw.trim().parse::<u32>() {
                Ok(baud) if baud >= serial.min_baud => baud,
                _ => {
                    debug!("Custom speed '{}' is invalid, using {}", raw, serial.default_baud);
                    serial.default_baud
                }
            },
        }
    }
}

/// Everything the user has picked so far
#[derive(Debug, Clone, Default)]
pub struct TargetSelection {
    pub custom_address: String,
    pub selected_entry: Option<String>,
    pub port_choice: PortChoice,
    pub speed_choice: SpeedChoice,
}

impl TargetSelection {
    /// Build a connection request, or `None` when nothing usable is selected.
    ///
    /// The custom address is trimmed before its length is checked, so
    /// padding alone never turns a short value into a network target.
    pub fn resolve(&self, serial: &SerialConfig, network: &NetworkConfig) -> Option<ConnectionRequest> {
        let address = self.custom_address.trim();
        if address.chars().count() > MIN_CUSTOM_ADDRESS_CHARS {
            let (host, port) = split_host_port(address)
                .unwrap_or_else(|| (address.to_string(), self.port_choice.resolve(network)));
            return Some(ConnectionRequest {
                target: LinkTarget::Tcp { host, port },
                label: address.to_string(),
            });
        }

        let entry = self.selected_entry.as_deref().unwrap_or("");
        if entry.contains('[') {
            let host = entry.split(' ').next().unwrap_or(entry).to_string();
            return Some(ConnectionRequest {
                target: LinkTarget::Tcp {
                    host,
                    port: self.port_choice.resolve(network),
                },
                label: entry.to_string(),
            });
        }

        if entry.chars().count() < MIN_SERIAL_NAME_CHARS {
            debug!("No usable target selected ('{}')", entry);
            return None;
        }

        Some(ConnectionRequest {
            target: LinkTarget::Serial {
                port: entry.to_string(),
                baud_rate: self.speed_choice.resolve(serial),
            },
            label: entry.to_string(),
        })
    }
}

/// Split `host:port` when the suffix is a valid non-zero port.
/// Addresses with several colons are left whole.
fn split_host_port(address: &str) -> Option<(String, u16)> {
    if address.matches(':').count() != 1 {
        return None;
    }
    let (host, port) = address.split_once(':')?;
    match port.parse::<u16>() {
        Ok(port) if port != 0 && !host.is_empty() => Some((host.to_string(), port)),
        _ => None,
    }
}
