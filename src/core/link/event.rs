use crate::domain::fault::SerialFault;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc as std_mpsc, Arc};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

/// Identifies one opened transport. Never reused within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkId(pub u64);

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "link#{}", self.0)
    }
}

/// Something that happened on a transport
#[derive(Debug, Clone, PartialEq)]
pub enum LinkEventKind {
    /// Asynchronous open finished
    Connected,
    /// Bytes arrived
    Data(Vec<u8>),
    /// Serial device reported a fault
    SerialFault(SerialFault),
    /// Network connect, read or write failed
    NetworkError(String),
    /// Remote end closed the stream
    Closed,
}

/// Event tagged with the link that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct LinkEvent {
    pub link: LinkId,
    pub kind: LinkEventKind,
}

impl LinkEvent {
    pub fn new(link: LinkId, kind: LinkEventKind) -> Self {
        Self { link, kind }
    }
}

/// Ownership of the tasks feeding events for one link.
///
/// Dropping it raises the cancel flag and aborts the tasks, so no task
/// outlives the transport it reports on. Blocking tasks cannot be aborted;
/// [`Subscription::release`] waits for them to let go of their handles.
pub struct Subscription {
    link: LinkId,
    cancel: Arc<AtomicBool>,
    tasks: Vec<JoinHandle<()>>,
    released: Vec<std_mpsc::Receiver<()>>,
}

impl Subscription {
    pub fn new(link: LinkId) -> Self {
        Self {
            link,
            cancel: Arc::new(AtomicBool::new(false)),
            tasks: Vec::new(),
            released: Vec::new(),
        }
    }

    pub fn link(&self) -> LinkId {
        self.link
    }

    /// Flag that tasks poll to learn they should stop.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    pub fn attach(&mut self, task: JoinHandle<()>) {
        self.tasks.push(task);
    }

    /// Sender a blocking task signals, or drops, once it no longer holds
    /// its transport handle.
    pub fn release_signal(&mut self) -> std_mpsc::Sender<()> {
        let (tx, rx) = std_mpsc::channel();
        self.released.push(rx);
        tx
    }

    /// Cancel every task and block until each release signal fires or
    /// `within` runs out. Returns false on timeout.
    pub fn release(&mut self, within: Duration) -> bool {
        self.cancel.store(true, Ordering::Release);
        for task in self.tasks.drain(..) {
            task.abort();
        }

        let deadline = Instant::now() + within;
        let mut all_released = true;
        for rx in self.released.drain(..) {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if let Err(std_mpsc::RecvTimeoutError::Timeout) = rx.recv_timeout(remaining) {
                all_released = false;
            }
        }
        all_released
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Acquire)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel.store(true, Ordering::Release);
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("link", &self.link)
            .field("tasks", &self.tasks.len())
            .field("pending_releases", &self.released.len())
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
