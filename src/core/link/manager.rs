use crate::core::line_buffer::LineBuffer;
use crate::core::link::event::{LinkEvent, LinkEventKind, LinkId, Subscription};
use crate::core::link::transport::{SerialBackend, SerialDevice};
use crate::core::selector::{ConnectionRequest, LinkTarget, TransportKind};
use crate::core::transcript::LineSink;
use crate::domain::config::NetworkConfig;
use crate::domain::error::{TermLinkError, TermLinkResult};
use crate::domain::fault::SerialFault;
use crate::infrastructure::serial::client::spawn_reader;
use crate::infrastructure::tcp::TcpLink;
use std::fmt;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Status text shown when no link is open.
pub const NOT_CONNECTED: &str = "Not Connected";

/// Connection lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionState::Disconnected => write!(f, "Disconnected"),
            ConnectionState::Connecting => write!(f, "Connecting"),
            ConnectionState::Connected => write!(f, "Connected"),
        }
    }
}

/// The live transport
enum Transport {
    Serial(Box<dyn SerialDevice>),
    Tcp(TcpLink),
}

/// The single open session
struct Session {
    id: LinkId,
    request: ConnectionRequest,
    state: ConnectionState,
    transport: Transport,
    buffer: LineBuffer,
    subscription: Subscription,
}

/// Owns at most one transport and everything attached to it.
///
/// All methods run on the dispatcher. Transport tasks only report back
/// through the event channel handed to [`ConnectionManager::new`].
pub struct ConnectionManager {
    backend: Box<dyn SerialBackend>,
    network: NetworkConfig,
    events: mpsc::UnboundedSender<LinkEvent>,
    session: Option<Session>,
    next_link: u64,
    status: String,
}

impl ConnectionManager {
    pub fn new(
        backend: Box<dyn SerialBackend>,
        network: NetworkConfig,
        events: mpsc::UnboundedSender<LinkEvent>,
    ) -> Self {
        Self {
            backend,
            network,
            events,
            session: None,
            next_link: 0,
            status: NOT_CONNECTED.to_string(),
        }
    }

    /// Open a link, tearing down any existing one first.
    ///
    /// Serial links are connected when this returns `Ok`. TCP links start
    /// in `Connecting` and switch to `Connected` on their `Connected` event.
    pub fn connect(&mut self, request: ConnectionRequest) -> TermLinkResult<()> {
        if self.session.is_some() {
            self.disconnect();
        }

        self.next_link += 1;
        let id = LinkId(self.next_link);
        let mut subscription = Subscription::new(id);

        let (transport, state) = match &request.target {
            LinkTarget::Serial { port, baud_rate } => {
                let channel = self.backend.open(port, *baud_rate).map_err(|fault| {
                    error!("Can't open serial port {}: {}", port, fault);
                    self.status = NOT_CONNECTED.to_string();
                    TermLinkError::Fault(fault)
                })?;
                let released = subscription.release_signal();
                subscription.attach(spawn_reader(
                    id,
                    channel.reader,
                    self.events.clone(),
                    subscription.cancel_flag(),
                    released,
                ));
                (Transport::Serial(channel.device), ConnectionState::Connected)
            }
            LinkTarget::Tcp { host, port } => {
                let (link, task) = TcpLink::spawn(
                    id,
                    host.clone(),
                    *port,
                    self.network.connect_timeout(),
                    self.events.clone(),
                );
                subscription.attach(task);
                (Transport::Tcp(link), ConnectionState::Connecting)
            }
        };

        self.status = match state {
            ConnectionState::Connected => format!("Connected to {}", request.label),
            _ => format!("Connecting to {}", request.label),
        };
        info!("{} ({}, {})", self.status, request.target, id);

        self.session = Some(Session {
            id,
            request,
            state,
            transport,
            buffer: LineBuffer::new(),
            subscription,
        });
        Ok(())
    }

    /// Tear down the current link. Safe to call with nothing open and from
    /// inside fault handling.
    pub fn disconnect(&mut self) {
        self.status = NOT_CONNECTED.to_string();

        let Some(session) = self.session.take() else {
            return;
        };
        let Session {
            id,
            request,
            transport,
            buffer,
            mut subscription,
            ..
        } = session;

        match transport {
            Transport::Serial(mut device) => {
                if device.is_open() {
                    device.close();
                }
                // The reader holds its own handle to the port; the device
                // stays busy until that one is gone too.
                if !subscription.release(self.backend.release_timeout()) {
                    warn!("Serial reader for {} did not stop in time", id);
                }
            }
            Transport::Tcp(link) => {
                drop(link);
                drop(subscription);
            }
        }

        if !buffer.is_empty() {
            debug!("Discarded {} unterminated bytes from {}", buffer.pending().len(), id);
        }
        info!("Disconnected from {} ({})", request.label, id);
    }

    /// Dispatch one transport event. Completed lines go to `sink`.
    pub fn handle_event(&mut self, event: LinkEvent, sink: &mut dyn LineSink) {
        let Some(session) = self.session.as_mut().filter(|s| s.id == event.link) else {
            debug!("Ignoring event from stale {}", event.link);
            return;
        };

        match event.kind {
            LinkEventKind::Connected => {
                session.state = ConnectionState::Connected;
                self.status = format!("Connected to {}", session.request.label);
                info!("{}", self.status);
            }
            LinkEventKind::Data(bytes) => {
                debug!("Got data from {}. Len = {}", session.id, bytes.len());
                if let Some(block) = session.buffer.push(&bytes) {
                    sink.append_block(&block);
                }
            }
            LinkEventKind::SerialFault(fault) => self.handle_serial_fault(fault),
            LinkEventKind::NetworkError(message) => {
                error!("Network link failed: {}", message);
                self.disconnect();
            }
            LinkEventKind::Closed => {
                info!("Remote end closed {}", session.request.label);
                self.disconnect();
            }
        }
    }

    /// React to a serial fault on the current link.
    ///
    /// The device is cleared, then flushed. Fatal faults then close the
    /// device and tear the session down. Transient faults leave it open.
    pub fn handle_serial_fault(&mut self, fault: SerialFault) {
        if let Some(Session {
            transport: Transport::Serial(device),
            ..
        }) = self.session.as_mut()
        {
            if let Err(e) = device.clear_error() {
                debug!("Clearing serial error state failed: {}", e);
            }
            if let Err(e) = device.flush() {
                debug!("Flushing serial output failed: {}", e);
            }
            if fault.is_fatal() {
                device.close();
            }
        }

        if fault.is_fatal() {
            error!("{}; closing the serial link", fault);
            self.disconnect();
        } else {
            warn!("{}", fault);
        }
    }

    /// Send `text` followed by a line feed.
    pub fn send_line(&mut self, text: &str) -> TermLinkResult<()> {
        let mut payload = text.as_bytes().to_vec();
        payload.push(b'\n');

        let Some(session) = self.session.as_mut() else {
            warn!("Not connected; dropping line of {} bytes", payload.len());
            return Err(TermLinkError::NotConnected);
        };
        if session.state != ConnectionState::Connected {
            warn!("{} is not open yet; dropping line", session.request.label);
            return Err(TermLinkError::NotConnected);
        }

        let result = match &mut session.transport {
            Transport::Serial(device) => device
                .write_all(&payload)
                .map_err(|e| SerialFault::from_write_error(&e)),
            Transport::Tcp(link) => {
                return link
                    .send(payload)
                    .map_err(|message| TermLinkError::Network { message });
            }
        };

        match result {
            Ok(()) => {
                debug!("Sent {} bytes to {}", payload.len(), session.request.label);
                Ok(())
            }
            Err(fault) => {
                self.handle_serial_fault(fault);
                Err(TermLinkError::Fault(fault))
            }
        }
    }

    /// Move the retained partial line to `sink`.
    pub fn flush_pending(&mut self, sink: &mut dyn LineSink) -> bool {
        let remainder = self
            .session
            .as_mut()
            .and_then(|session| session.buffer.take_remainder());
        match remainder {
            Some(block) => {
                sink.append_block(&block);
                true
            }
            None => false,
        }
    }

    /// Serial ports the backend can see right now.
    pub fn available_ports(&self) -> Vec<String> {
        self.backend.available_ports()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn state(&self) -> ConnectionState {
        self.session
            .as_ref()
            .map(|session| session.state)
            .unwrap_or(ConnectionState::Disconnected)
    }

    pub fn transport_kind(&self) -> Option<TransportKind> {
        self.session.as_ref().map(|session| session.request.target.kind())
    }

    pub fn current_link(&self) -> Option<LinkId> {
        self.session.as_ref().map(|session| session.id)
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Bytes held back waiting for a line terminator.
    pub fn pending_bytes(&self) -> usize {
        self.session
            .as_ref()
            .map(|session| session.buffer.pending().len())
            .unwrap_or(0)
    }
}

impl Drop for ConnectionManager {
    fn drop(&mut self) {
        self.disconnect();
    }
}
