use crate::cli::args::OutputFormat;
use crate::core::discovery::DiscoveredPeer;
use crate::core::selector::TransportKind;
use crate::domain::config::TermLinkConfig;
use serde::Serialize;
use std::io;
use tabled::{Table, Tabled};

/// Output writer trait for different formats
pub trait OutputWriter {
    fn write_ports(&self, ports: &[PortEntry]) -> Result<(), OutputError>;
    fn write_peers(&self, peers: &[DiscoveredPeer]) -> Result<(), OutputError>;
    fn write_config(&self, config: &TermLinkConfig) -> Result<(), OutputError>;
    fn write_message(&self, message: &str) -> Result<(), OutputError>;
    fn write_error(&self, error: &str) -> Result<(), OutputError>;
}

/// Output formatting errors
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

impl From<OutputError> for crate::domain::error::TermLinkError {
    fn from(err: OutputError) -> Self {
        Self::Output(err.to_string())
    }
}

/// One row of the port list as printed by `termlink ports`
#[derive(Debug, Clone, Serialize)]
pub struct PortEntry {
    pub entry: String,
    pub transport: TransportKind,
}

impl PortEntry {
    /// Classify a port list entry the way connect would treat it.
    pub fn from_entry(entry: &str) -> Self {
        let transport = if entry.contains('[') {
            TransportKind::Tcp
        } else {
            TransportKind::Serial
        };
        Self {
            entry: entry.to_string(),
            transport,
        }
    }
}

/// Console output writer
pub struct ConsoleWriter {
    format: OutputFormat,
}

impl ConsoleWriter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }
}

impl OutputWriter for ConsoleWriter {
    fn write_ports(&self, ports: &[PortEntry]) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Text => {
                if ports.is_empty() {
                    println!("No ports found");
                }
                for port in ports {
                    println!("{}", port.entry);
                }
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(ports)?);
            }
            OutputFormat::Table => {
                if !ports.is_empty() {
                    let rows: Vec<PortTableRow> = ports.iter().map(PortTableRow::from).collect();
                    println!("{}", Table::new(rows));
                }
            }
            OutputFormat::Csv => {
                println!("entry,transport");
                for port in ports {
                    println!("{},{}", csv_field(&port.entry), port.transport);
                }
            }
        }
        Ok(())
    }

    fn write_peers(&self, peers: &[DiscoveredPeer]) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Text => {
                if peers.is_empty() {
                    println!("No peers announced themselves");
                }
                for peer in peers {
                    println!("{}", peer.list_entry());
                }
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(peers)?);
            }
            OutputFormat::Table => {
                if !peers.is_empty() {
                    let rows: Vec<PeerTableRow> = peers.iter().map(PeerTableRow::from).collect();
                    println!("{}", Table::new(rows));
                }
            }
            OutputFormat::Csv => {
                println!("address,name");
                for peer in peers {
                    println!("{},{}", csv_field(&peer.address), csv_field(&peer.name));
                }
            }
        }
        Ok(())
    }

    fn write_config(&self, config: &TermLinkConfig) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Text => {
                println!("TermLink Configuration:");
                println!("  Log level: {}", config.global.log_level);
                if let Some(log_file) = &config.global.log_file {
                    println!("  Log file: {}", log_file.display());
                }
                println!("  History limit: {}", config.global.history_limit);
                println!("  Serial:");
                println!("    Default baud: {}", config.serial.default_baud);
                println!("    High-speed baud: {}", config.serial.high_speed_baud);
                println!("    Minimum custom baud: {}", config.serial.min_baud);
                println!("    Read timeout: {}ms", config.serial.read_timeout_ms);
                println!("  Network:");
                println!("    Telnet port: {}", config.network.telnet_port);
                println!("    Alternate port: {}", config.network.alternate_port);
                println!("    Connect timeout: {}ms", config.network.connect_timeout_ms);
                println!("  Discovery:");
                println!("    Enabled: {}", config.discovery.enabled);
                println!("    UDP port: {}", config.discovery.port);
                println!("  Port list refresh: {}ms", config.display.refresh_interval_ms);
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(config)?);
            }
            OutputFormat::Table => {
                println!("{}", Table::new(config_rows(config)));
            }
            OutputFormat::Csv => {
                println!("key,value");
                for row in config_rows(config) {
                    println!("{},{}", row.key, csv_field(&row.value));
                }
            }
        }
        Ok(())
    }

    fn write_message(&self, message: &str) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "message": message,
                    "level": "info"
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            _ => {
                println!("{}", message);
            }
        }
        Ok(())
    }

    fn write_error(&self, error: &str) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "error": error,
                    "level": "error"
                });
                eprintln!("{}", serde_json::to_string_pretty(&output)?);
            }
            _ => {
                eprintln!("Error: {}", error);
            }
        }
        Ok(())
    }
}

/// Table row for the port list
#[derive(Tabled)]
struct PortTableRow {
    entry: String,
    transport: String,
}

impl From<&PortEntry> for PortTableRow {
    fn from(port: &PortEntry) -> Self {
        Self {
            entry: port.entry.clone(),
            transport: port.transport.to_string(),
        }
    }
}

/// Table row for discovered peers
#[derive(Tabled)]
struct PeerTableRow {
    address: String,
    name: String,
}

impl From<&DiscoveredPeer> for PeerTableRow {
    fn from(peer: &DiscoveredPeer) -> Self {
        Self {
            address: peer.address.clone(),
            name: peer.name.clone(),
        }
    }
}

/// Table row for a flattened configuration key
#[derive(Tabled)]
struct ConfigTableRow {
    key: &'static str,
    value: String,
}

fn config_rows(config: &TermLinkConfig) -> Vec<ConfigTableRow> {
    let row = |key, value: String| ConfigTableRow { key, value };
    vec![
        row("global.log_level", config.global.log_level.clone()),
        row(
            "global.log_file",
            config
                .global
                .log_file
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_default(),
        ),
        row("global.history_limit", config.global.history_limit.to_string()),
        row("serial.default_baud", config.serial.default_baud.to_string()),
        row("serial.high_speed_baud", config.serial.high_speed_baud.to_string()),
        row("serial.min_baud", config.serial.min_baud.to_string()),
        row("serial.read_timeout_ms", config.serial.read_timeout_ms.to_string()),
        row("network.telnet_port", config.network.telnet_port.to_string()),
        row("network.alternate_port", config.network.alternate_port.to_string()),
        row("network.connect_timeout_ms", config.network.connect_timeout_ms.to_string()),
        row("discovery.enabled", config.discovery.enabled.to_string()),
        row("discovery.port", config.discovery.port.to_string()),
        row("display.refresh_interval_ms", config.display.refresh_interval_ms.to_string()),
    ]
}

/// Quote a CSV field when it carries a separator or quote.
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
