use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// TermLink configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TermLinkConfig {
    /// Global configuration
    #[serde(default)]
    pub global: GlobalConfig,
    /// Serial link presets
    #[serde(default)]
    pub serial: SerialConfig,
    /// Network link presets
    #[serde(default)]
    pub network: NetworkConfig,
    /// Peer discovery settings
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    /// Display settings
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Global configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Default log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Log file used while the terminal UI owns the screen
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
    /// Maximum transcript lines kept in memory (0 = unlimited)
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

/// Serial link presets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerialConfig {
    /// Baud rate used when nothing else is chosen
    #[serde(default = "default_baud")]
    pub default_baud: u32,
    /// High-speed preset
    #[serde(default = "default_high_speed_baud")]
    pub high_speed_baud: u32,
    /// Custom rates below this are rejected
    #[serde(default = "default_min_baud")]
    pub min_baud: u32,
    /// Read timeout of the serial reader in milliseconds
    #[serde(default = "default_read_timeout")]
    pub read_timeout_ms: u64,
}

/// Network link presets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_telnet_port")]
    pub telnet_port: u16,
    #[serde(default = "default_alternate_port")]
    pub alternate_port: u16,
    /// Connect timeout in milliseconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_ms: u64,
}

/// Peer discovery settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    #[serde(default = "default_discovery_enabled")]
    pub enabled: bool,
    /// UDP port announcements arrive on
    #[serde(default = "default_discovery_port")]
    pub port: u16,
}

/// Display settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Port list refresh interval in milliseconds
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_ms: u64,
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_history_limit() -> usize {
    10_000
}

fn default_baud() -> u32 {
    115_200
}

fn default_high_speed_baud() -> u32 {
    1_000_000
}

fn default_min_baud() -> u32 {
    300
}

fn default_read_timeout() -> u64 {
    50
}

fn default_telnet_port() -> u16 {
    23
}

fn default_alternate_port() -> u16 {
    2323
}

fn default_connect_timeout() -> u64 {
    3000
}

fn default_discovery_enabled() -> bool {
    true
}

fn default_discovery_port() -> u16 {
    17222
}

fn default_refresh_interval() -> u64 {
    2000
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_file: None,
            history_limit: default_history_limit(),
        }
    }
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            default_baud: default_baud(),
            high_speed_baud: default_high_speed_baud(),
            min_baud: default_min_baud(),
            read_timeout_ms: default_read_timeout(),
        }
    }
}

impl SerialConfig {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            telnet_port: default_telnet_port(),
            alternate_port: default_alternate_port(),
            connect_timeout_ms: default_connect_timeout(),
        }
    }
}

impl NetworkConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            enabled: default_discovery_enabled(),
            port: default_discovery_port(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: default_refresh_interval(),
        }
    }
}

impl DisplayConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serialization() {
        let config = TermLinkConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let deserialized: TermLinkConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(deserialized.serial.default_baud, 115_200);
        assert_eq!(deserialized.discovery.port, 17222);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: TermLinkConfig = toml::from_str(
            r#"
            [network]
            alternate_port = 4000
            "#,
        )
        .unwrap();

        assert_eq!(config.network.alternate_port, 4000);
        assert_eq!(config.network.telnet_port, 23);
        assert_eq!(config.serial.high_speed_baud, 1_000_000);
        assert_eq!(config.display.refresh_interval(), Duration::from_secs(2));
        assert!(config.discovery.enabled);
    }

    #[test]
    fn test_empty_config() {
        let config: TermLinkConfig = toml::from_str("").unwrap();
        assert_eq!(config.global.log_level, "info");
        assert_eq!(config.global.history_limit, 10_000);
        assert!(config.global.log_file.is_none());
    }
}
