use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::{
    core::link::{ConnectionManager, LinkEvent, SerialBackend},
    domain::{
        config::TermLinkConfig,
        error::{TermLinkError, TermLinkResult},
    },
    infrastructure::{
        serial::SystemSerial,
        udp::{DiscoveryListener, PeerAnnouncement},
    },
};
use super::{
    event::{AppEvent, EventHandler},
    state::AppState,
    ui::draw_ui,
};

/// What woke the dispatcher up
enum Wake {
    Link(Option<LinkEvent>),
    Peer(Option<PeerAnnouncement>),
    Refresh,
    Tick,
}

pub struct App {
    state: AppState,
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    events: EventHandler,
    config: TermLinkConfig,
    manager: ConnectionManager,
    link_rx: mpsc::UnboundedReceiver<LinkEvent>,
    peer_rx: Option<mpsc::UnboundedReceiver<PeerAnnouncement>>,
    discovery_task: Option<JoinHandle<()>>,
    should_quit: bool,
    tick_rate: Duration,
}

impl App {
    pub fn new(config: TermLinkConfig) -> TermLinkResult<Self> {
        let (link_tx, link_rx) = mpsc::unbounded_channel();
        let manager = ConnectionManager::new(
            Box::new(SystemSerial::new(&config.serial)),
            config.network.clone(),
            link_tx,
        );

        let (peer_rx, discovery_task) = if config.discovery.enabled {
            match DiscoveryListener::bind(config.discovery.port) {
                Ok(listener) => {
                    let (tx, rx) = mpsc::unbounded_channel();
                    (Some(rx), Some(listener.spawn(tx)))
                }
                Err(e) => {
                    warn!("{}; continuing without peer discovery", e);
                    (None, None)
                }
            }
        } else {
            (None, None)
        };

        // Setup terminal
        enable_raw_mode().map_err(|e| TermLinkError::Tui(e.to_string()))?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
            .map_err(|e| TermLinkError::Tui(e.to_string()))?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend).map_err(|e| TermLinkError::Tui(e.to_string()))?;

        let mut state = AppState::new(config.global.history_limit);
        state.refresh_ports(&manager.available_ports());

        Ok(Self {
            state,
            terminal,
            events: EventHandler::new(),
            config,
            manager,
            link_rx,
            peer_rx,
            discovery_task,
            should_quit: false,
            tick_rate: Duration::from_millis(50),
        })
    }

    pub async fn run(&mut self) -> TermLinkResult<()> {
        let mut refresh = tokio::time::interval(self.config.display.refresh_interval());

        loop {
            self.terminal
                .draw(|f| draw_ui(f, &mut self.state))
                .map_err(|e| TermLinkError::Tui(e.to_string()))?;

            self.drain_terminal_events()?;
            if self.should_quit {
                break;
            }

            let wake = tokio::select! {
                event = self.link_rx.recv() => Wake::Link(event),
                announcement = next_announcement(&mut self.peer_rx) => Wake::Peer(announcement),
                _ = refresh.tick() => Wake::Refresh,
                _ = tokio::time::sleep(self.tick_rate) => Wake::Tick,
            };

            match wake {
                Wake::Link(Some(event)) => {
                    self.manager.handle_event(event, &mut self.state.transcript);
                    self.sync_status();
                }
                Wake::Link(None) => {}
                Wake::Peer(Some(announcement)) => {
                    self.state.peers.record(announcement.address, announcement.name);
                }
                Wake::Peer(None) => {
                    warn!("Discovery listener stopped");
                    self.peer_rx = None;
                }
                Wake::Refresh => self.refresh_ports(),
                Wake::Tick => {}
            }
        }

        self.manager.disconnect();
        Ok(())
    }

    /// Handle every terminal event already queued, without blocking.
    fn drain_terminal_events(&mut self) -> TermLinkResult<()> {
        while event::poll(Duration::ZERO).map_err(|e| TermLinkError::Tui(e.to_string()))? {
            match event::read().map_err(|e| TermLinkError::Tui(e.to_string()))? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if let Some(app_event) = self.events.handle_key_event(key, &mut self.state) {
                        self.execute(app_event);
                    }
                }
                Event::Resize(width, height) => {
                    self.state.terminal_size = (width, height);
                }
                _ => {}
            }
            if self.should_quit {
                break;
            }
        }
        Ok(())
    }

    fn execute(&mut self, event: AppEvent) {
        debug!("Executing {:?}", event);
        match event {
            AppEvent::Quit => self.should_quit = true,
            AppEvent::Connect => {
                match self.state.selection().resolve(&self.config.serial, &self.config.network) {
                    Some(request) => {
                        if let Err(e) = self.manager.connect(request) {
                            self.state.set_status_message(format!("Connect failed: {}", e));
                        } else {
                            self.state.clear_status_message();
                        }
                    }
                    None => {
                        self.state
                            .set_status_message("Select a port or type an address first".to_string());
                    }
                }
                self.sync_status();
            }
            AppEvent::Disconnect => {
                self.manager.disconnect();
                self.sync_status();
            }
            AppEvent::SendLine(text) => {
                if let Err(e) = self.manager.send_line(&text) {
                    self.state.set_status_message(format!("Not sent: {}", e));
                }
                self.sync_status();
            }
            AppEvent::SaveTranscript(path) => match self.state.transcript.save(&path) {
                Ok(written) => {
                    self.state.set_status_message(format!("Saved to {}", written.display()));
                }
                Err(e) => self.state.set_status_message(e.to_string()),
            },
            AppEvent::ClearTranscript => {
                self.state.transcript.clear();
                self.state.scroll_back = 0;
            }
            AppEvent::FlushPending => {
                if !self.manager.flush_pending(&mut self.state.transcript) {
                    self.state.set_status_message("Nothing pending".to_string());
                }
            }
            AppEvent::RefreshPorts => self.refresh_ports(),
        }
    }

    fn refresh_ports(&mut self) {
        let local_ports = self.manager.available_ports();
        let added = self.state.refresh_ports(&local_ports);
        if added > 0 {
            info!("Port list grew by {} entries", added);
        }
    }

    fn sync_status(&mut self) {
        self.state.connection_status = self.manager.status().to_string();
    }
}

async fn next_announcement(
    rx: &mut Option<mpsc::UnboundedReceiver<PeerAnnouncement>>,
) -> Option<PeerAnnouncement> {
    match rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

impl Drop for App {
    fn drop(&mut self) {
        if let Some(task) = self.discovery_task.take() {
            task.abort();
        }
        // Restore terminal
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        );
        let _ = self.terminal.show_cursor();
    }
}
