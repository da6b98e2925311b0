use crate::core::link::{LinkEvent, LinkEventKind, LinkId};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Outbound half of a TCP link.
///
/// The socket itself lives in the link task. Writes are queued here and
/// picked up by the task once the connection is established.
#[derive(Debug)]
pub struct TcpLink {
    tx_sender: mpsc::UnboundedSender<Vec<u8>>,
}

impl TcpLink {
    /// Start connecting to `host:port` in the background.
    ///
    /// The task reports `Connected`, then `Data` for every read, and ends with
    /// `Closed` or `NetworkError`. The returned handle must be owned by the
    /// link's subscription.
    pub fn spawn(
        link: LinkId,
        host: String,
        port: u16,
        connect_timeout: Duration,
        events: mpsc::UnboundedSender<LinkEvent>,
    ) -> (Self, JoinHandle<()>) {
        let (tx_sender, tx_receiver) = mpsc::unbounded_channel::<Vec<u8>>();
        let handle = tokio::spawn(run_link(link, host, port, connect_timeout, events, tx_receiver));
        (Self { tx_sender }, handle)
    }

    /// Queue bytes for the socket.
    pub fn send(&self, data: Vec<u8>) -> Result<(), String> {
        self.tx_sender
            .send(data)
            .map_err(|e| format!("Failed to queue data for TCP link: {}", e))
    }
}

async fn run_link(
    link: LinkId,
    host: String,
    port: u16,
    connect_timeout: Duration,
    events: mpsc::UnboundedSender<LinkEvent>,
    mut tx_receiver: mpsc::UnboundedReceiver<Vec<u8>>,
) {
    let report = |kind: LinkEventKind| {
        let _ = events.send(LinkEvent::new(link, kind));
    };

    let mut stream = match tokio::time::timeout(connect_timeout, TcpStream::connect((host.as_str(), port))).await {
        Ok(Ok(stream)) => stream,
        Ok(Err(e)) => {
            error!("Failed to connect to {}:{}: {}", host, port, e);
            report(LinkEventKind::NetworkError(format!("Failed to connect to {}:{}: {}", host, port, e)));
            return;
        }
        Err(_) => {
            error!("Connection timeout to {}:{}", host, port);
            report(LinkEventKind::NetworkError(format!("Connection timeout to {}:{}", host, port)));
            return;
        }
    };

    if let Err(e) = stream.set_nodelay(true) {
        warn!("Failed to set TCP_NODELAY: {}", e);
    }

    info!("TCP connection established to {}:{}", host, port);
    report(LinkEventKind::Connected);

    let (mut reader, mut writer) = stream.split();
    let mut buffer = vec![0u8; 4096];

    loop {
        tokio::select! {
            read = reader.read(&mut buffer) => match read {
                Ok(0) => {
                    info!("TCP connection closed by peer");
                    report(LinkEventKind::Closed);
                    break;
                }
                Ok(n) => {
                    debug!("Received {} bytes over TCP on {}", n, link);
                    report(LinkEventKind::Data(buffer[..n].to_vec()));
                }
                Err(e) => {
                    error!("Failed to read from TCP stream: {}", e);
                    report(LinkEventKind::NetworkError(format!("Read failed: {}", e)));
                    break;
                }
            },
            outbound = tx_receiver.recv() => match outbound {
                Some(data) => {
                    let written = match writer.write_all(&data).await {
                        Ok(()) => writer.flush().await,
                        Err(e) => Err(e),
                    };
                    match written {
                        Ok(()) => debug!("Sent {} bytes over TCP on {}", data.len(), link),
                        Err(e) => {
                            error!("Failed to write to TCP stream: {}", e);
                            report(LinkEventKind::NetworkError(format!("Write failed: {}", e)));
                            break;
                        }
                    }
                }
                None => {
                    if let Err(e) = writer.shutdown().await {
                        warn!("Failed to shutdown TCP stream: {}", e);
                    }
                    break;
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    async fn next_event(rx: &mut mpsc::UnboundedReceiver<LinkEvent>) -> LinkEvent {
        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for link event")
            .expect("event channel closed")
    }

    #[tokio::test]
    async fn test_connect_send_and_receive() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            socket.write_all(b"banner\r\n").await.unwrap();
            let mut buf = [0u8; 64];
            let n = socket.read(&mut buf).await.unwrap();
            buf[..n].to_vec()
        });

        let (events_tx, mut events_rx) = mpsc::unbounded_channel();
        let (link, handle) = TcpLink::spawn(
            LinkId(1),
            addr.ip().to_string(),
            addr.port(),
            Duration::from_secs(1),
            events_tx,
        );

        assert_eq!(next_event(&mut events_rx).await.kind, LinkEventKind::Connected);
        assert_eq!(
            next_event(&mut events_rx).await.kind,
            LinkEventKind::Data(b"banner\r\n".to_vec())
        );

        link.send(b"ping\n".to_vec()).unwrap();
        assert_eq!(server.await.unwrap(), b"ping\n");

        assert_eq!(next_event(&mut events_rx).await.kind, LinkEventKind::Closed);
        handle.abort();
    }

    #[tokio::test]
    async fn test_refused_connection_reports_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let (events_tx, mut events_rx) = mpsc::unbounded_channel();
        let (_link, _handle) = TcpLink::spawn(
            LinkId(2),
            "127.0.0.1".to_string(),
            port,
            Duration::from_secs(1),
            events_tx,
        );

        let event = next_event(&mut events_rx).await;
        assert_eq!(event.link, LinkId(2));
        assert!(matches!(event.kind, LinkEventKind::NetworkError(_)));
    }
}
