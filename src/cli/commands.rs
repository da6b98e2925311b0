use crate::cli::args::{Args, Command, ConfigCommand, ConnectArgs};
use crate::cli::output::{ConsoleWriter, OutputWriter, PortEntry};
use crate::core::discovery::PeerDirectory;
use crate::core::link::{ConnectionManager, ConnectionState, SerialBackend};
use crate::core::port_list::PortList;
use crate::core::transcript::LineSink;
use crate::domain::config::TermLinkConfig;
use crate::domain::error::{TermLinkError, TermLinkResult};
use crate::infrastructure::config::ConfigManager;
use crate::infrastructure::serial::SystemSerial;
use crate::infrastructure::udp::DiscoveryListener;
use crate::tui::app::App;
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Load the configuration selected by the command line.
pub fn load_config(args: &Args) -> TermLinkResult<(ConfigManager, TermLinkConfig)> {
    let config_manager = ConfigManager::new()?;
    let config = if let Some(config_path) = &args.config {
        config_manager.load_config_from_path(config_path.as_ref())?
    } else {
        config_manager.load_config()?
    };
    Ok((config_manager, config))
}

/// Execute CLI command
pub async fn execute_command(
    args: Args,
    config: TermLinkConfig,
    config_manager: ConfigManager,
) -> TermLinkResult<()> {
    let writer = ConsoleWriter::new(args.output.clone());

    match args.command.unwrap_or(Command::Tui) {
        Command::Tui => {
            let mut app = App::new(config)?;
            app.run().await
        }
        Command::Ports { listen } => execute_ports_command(listen, &writer, &config).await,
        Command::Discover { seconds } => {
            let peers = collect_peers(config.discovery.port, Duration::from_secs(seconds)).await?;
            writer.write_peers(&peers.peers().collect::<Vec<_>>())?;
            Ok(())
        }
        Command::Connect(connect_args) => execute_connect_command(connect_args, &config).await,
        Command::Config(config_args) => {
            execute_config_command(config_args.command, &writer, &config, &config_manager)
        }
        Command::Version => {
            writer.write_message(&format!("termlink {}", env!("CARGO_PKG_VERSION")))?;
            Ok(())
        }
    }
}

async fn execute_ports_command(
    listen: u64,
    writer: &ConsoleWriter,
    config: &TermLinkConfig,
) -> TermLinkResult<()> {
    let peers = if listen > 0 && config.discovery.enabled {
        collect_peers(config.discovery.port, Duration::from_secs(listen)).await?
    } else {
        PeerDirectory::new()
    };

    let local_ports = SystemSerial::new(&config.serial).available_ports();
    let mut list = PortList::new();
    list.refresh(&local_ports, &peers);

    let entries: Vec<PortEntry> = list.entries().iter().map(|e| PortEntry::from_entry(e)).collect();
    writer.write_ports(&entries)?;
    Ok(())
}

/// Listen on the discovery port for `duration` and return everyone heard.
pub async fn collect_peers(port: u16, duration: Duration) -> TermLinkResult<PeerDirectory> {
    let listener = DiscoveryListener::bind(port)?;
    let (tx, mut rx) = mpsc::unbounded_channel();
    let task = listener.spawn(tx);

    let mut peers = PeerDirectory::new();
    let deadline = tokio::time::sleep(duration);
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = &mut deadline => break,
            announcement = rx.recv() => match announcement {
                Some(announcement) => {
                    peers.record(announcement.address, announcement.name);
                }
                None => break,
            },
        }
    }

    task.abort();
    debug!("Discovery finished with {} peers", peers.len());
    Ok(peers)
}

/// Writes completed lines to standard output.
struct StdoutSink;

impl LineSink for StdoutSink {
    fn append_block(&mut self, block: &str) {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        if writeln!(handle, "{}", block).and_then(|_| handle.flush()).is_err() {
            warn!("Standard output closed; dropping {} bytes", block.len());
        }
    }
}

/// Line-mode session: stdin lines go out, received lines come back on stdout.
/// Status changes go to stderr so stdout only carries device text.
async fn execute_connect_command(args: ConnectArgs, config: &TermLinkConfig) -> TermLinkResult<()> {
    let request = args
        .selection()
        .resolve(&config.serial, &config.network)
        .ok_or_else(|| TermLinkError::InvalidInput("No usable port or address given".to_string()))?;

    let (link_tx, mut link_rx) = mpsc::unbounded_channel();
    let mut manager = ConnectionManager::new(
        Box::new(SystemSerial::new(&config.serial)),
        config.network.clone(),
        link_tx,
    );
    manager.connect(request)?;
    eprintln!("{}", manager.status());

    let mut sink = StdoutSink;
    let mut stdin_lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let mut last_status = manager.status().to_string();
    let linger = args.linger();
    let mut drain_deadline: Option<Instant> = None;

    loop {
        // Lines are only read once the link accepts them.
        let ready = stdin_open && manager.state() == ConnectionState::Connected;

        tokio::select! {
            line = stdin_lines.next_line(), if ready => match line {
                Ok(Some(text)) => {
                    if let Err(e) = manager.send_line(&text) {
                        eprintln!("Error: {}", e);
                    }
                }
                Ok(None) => {
                    debug!("Standard input closed; draining for {:?}", linger);
                    stdin_open = false;
                    drain_deadline = Some(Instant::now() + linger);
                }
                Err(e) => return Err(e.into()),
            },
            event = link_rx.recv() => {
                let Some(event) = event else { break };
                manager.handle_event(event, &mut sink);
                if manager.status() != last_status {
                    last_status = manager.status().to_string();
                    eprintln!("{}", last_status);
                }
                if !manager.is_active() {
                    break;
                }
                if drain_deadline.is_some() {
                    drain_deadline = Some(Instant::now() + linger);
                }
            }
            _ = wait_until(drain_deadline) => {
                debug!("No more replies");
                break;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }
    }

    manager.flush_pending(&mut sink);
    manager.disconnect();
    Ok(())
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

fn execute_config_command(
    command: ConfigCommand,
    writer: &ConsoleWriter,
    config: &TermLinkConfig,
    config_manager: &ConfigManager,
) -> TermLinkResult<()> {
    match command {
        ConfigCommand::Show => {
            writer.write_config(config)?;
        }
        ConfigCommand::Init { global } => {
            let path = if global {
                config_manager.init_global_config()?
            } else {
                let current_dir = std::env::current_dir().map_err(|e| TermLinkError::Config {
                    message: format!("Failed to get current directory: {}", e),
                })?;
                config_manager.init_project_config(&current_dir)?
            };
            writer.write_message(&format!("Configuration initialized at '{}'", path.display()))?;
        }
        ConfigCommand::Path => {
            writer.write_message(&format!(
                "Global: {}",
                config_manager.get_global_config_path_ref().display()
            ))?;
            if let Some(project) = config_manager.get_project_config_path() {
                writer.write_message(&format!("Project: {}", project.display()))?;
            }
            match config_manager.active_config_path() {
                Some(active) => writer.write_message(&format!("Active: {}", active.display()))?,
                None => writer.write_message("Active: built-in defaults")?,
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_collect_peers_records_announcements() {
        // Bind on an ephemeral port first to learn a free one.
        let probe = DiscoveryListener::bind(0).unwrap();
        let port = probe.local_addr().unwrap().port();
        drop(probe);

        let collector = tokio::spawn(collect_peers(port, Duration::from_millis(400)));
        tokio::time::sleep(Duration::from_millis(100)).await;

        let sender = tokio::net::UdpSocket::bind("127.0.0.1:0").await.unwrap();
        sender.send_to(b"GVRET\0", ("127.0.0.1", port)).await.unwrap();
        sender.send_to(b"Other", ("127.0.0.1", port)).await.unwrap();

        let peers = collector.await.unwrap().unwrap();
        assert_eq!(peers.len(), 1);
        assert_eq!(peers.name_of("127.0.0.1"), Some("GVRET"));
    }

    #[tokio::test]
    async fn test_collect_peers_with_no_traffic() {
        let peers = collect_peers(0, Duration::from_millis(50)).await.unwrap();
        assert!(peers.is_empty());
    }
}
