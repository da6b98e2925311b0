use crate::core::selector::{PortChoice, SpeedChoice, TargetSelection};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Command line arguments for TermLink
#[derive(Parser, Debug)]
#[command(
    name = "termlink",
    version = env!("CARGO_PKG_VERSION"),
    about = "Line-oriented serial and TCP terminal",
    long_about = "A line-oriented terminal for serial ports and TCP hosts, with discovery of network devices that announce themselves over UDP."
)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress log output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text", global = true)]
    pub output: OutputFormat,

    /// Command to execute (defaults to the terminal UI)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Interactive terminal UI
    Tui,
    /// List serial ports and discovered peers
    Ports {
        /// Also listen for peer announcements for this many seconds
        #[arg(short, long, default_value = "0")]
        listen: u64,
    },
    /// Listen for peer announcements
    Discover {
        /// How long to listen, in seconds
        #[arg(short, long, default_value = "5")]
        seconds: u64,
    },
    /// Open a line-mode session on stdin/stdout
    Connect(ConnectArgs),
    /// Configuration management commands
    Config(ConfigArgs),
    /// Display version information
    Version,
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output
    Json,
    /// Table output
    Table,
    /// CSV output
    Csv,
}

/// Target selection for a line-mode session
#[derive(ClapArgs, Debug)]
pub struct ConnectArgs {
    /// Port list entry: a serial port name or "<address>  [<name>]"
    pub entry: Option<String>,

    /// Network address; used instead of ENTRY when longer than 3 characters
    #[arg(short, long, default_value = "")]
    pub address: String,

    /// Custom TCP port
    #[arg(short, long, conflicts_with = "alt_port")]
    pub port: Option<String>,

    /// Use the alternate TCP port preset
    #[arg(long)]
    pub alt_port: bool,

    /// Custom baud rate
    #[arg(short, long, conflicts_with = "high_speed")]
    pub baud: Option<String>,

    /// Use the high-speed baud preset
    #[arg(long)]
    pub high_speed: bool,

    /// Keep printing replies for this many milliseconds of quiet after
    /// standard input ends
    #[arg(long, default_value_t = 500)]
    pub linger: u64,
}

impl ConnectArgs {
    pub fn linger(&self) -> Duration {
        Duration::from_millis(self.linger)
    }

    pub fn selection(&self) -> TargetSelection {
        let port_choice = match (&self.port, self.alt_port) {
            (Some(port), _) => PortChoice::Custom(port.clone()),
            (None, true) => PortChoice::Alternate,
            (None, false) => PortChoice::Telnet,
        };
        let speed_choice = match (&self.baud, self.high_speed) {
            (Some(baud), _) => SpeedChoice::Custom(baud.clone()),
            (None, true) => SpeedChoice::HighSpeed,
            (None, false) => SpeedChoice::Default,
        };

        TargetSelection {
            custom_address: self.address.clone(),
            selected_entry: self.entry.clone(),
            port_choice,
            speed_choice,
        }
    }
}

/// Configuration management arguments
#[derive(ClapArgs, Debug)]
pub struct ConfigArgs {
    /// Configuration subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Configuration management subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,
    /// Create default configuration
    Init {
        /// Write the global configuration instead of a project one
        #[arg(short, long)]
        global: bool,
    },
    /// Show which configuration files are used
    Path,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}
