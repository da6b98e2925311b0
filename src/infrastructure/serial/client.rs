use crate::core::link::{LinkEvent, LinkEventKind, LinkId, SerialBackend, SerialChannel, SerialDevice};
use crate::domain::{config::SerialConfig, fault::SerialFault};
use serialport::SerialPort;
use std::io::{self, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc as std_mpsc, Arc};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Back-off after a transient read failure
const READ_RETRY_DELAY: Duration = Duration::from_millis(100);
/// Pause when the port returns no bytes without timing out
const IDLE_DELAY: Duration = Duration::from_millis(10);
/// Scheduling slack on top of the longest wait inside the read loop
const RELEASE_SLACK: Duration = Duration::from_millis(200);

/// Serial backend built on the `serialport` crate.
pub struct SystemSerial {
    read_timeout: Duration,
}

impl SystemSerial {
    pub fn new(config: &SerialConfig) -> Self {
        Self {
            read_timeout: config.read_timeout(),
        }
    }
}

impl SerialBackend for SystemSerial {
    fn available_ports(&self) -> Vec<String> {
        match serialport::available_ports() {
            Ok(ports) => ports.into_iter().map(|port| port.port_name).collect(),
            Err(e) => {
                warn!("Failed to list serial ports: {}", e);
                Vec::new()
            }
        }
    }

    fn open(&self, port: &str, baud_rate: u32) -> Result<SerialChannel, SerialFault> {
        let opened = serialport::new(port, baud_rate)
            .data_bits(serialport::DataBits::Eight)
            .parity(serialport::Parity::None)
            .stop_bits(serialport::StopBits::One)
            .flow_control(serialport::FlowControl::None)
            .timeout(self.read_timeout)
            .open()
            .map_err(|e| {
                error!("Error returned during port opening of {}: {}", port, e);
                SerialFault::from_open_error(&e)
            })?;

        let reader = opened.try_clone().map_err(|e| {
            error!("Failed to clone serial handle for {}: {}", port, e);
            SerialFault::from_open_error(&e)
        })?;

        info!("Serial port {} opened at {} baud", port, baud_rate);

        Ok(SerialChannel {
            device: Box::new(SerialPortDevice { port: Some(opened) }),
            reader: Box::new(reader),
        })
    }

    fn release_timeout(&self) -> Duration {
        self.read_timeout.max(READ_RETRY_DELAY) + RELEASE_SLACK
    }
}

/// Write side of an open `serialport` handle.
pub struct SerialPortDevice {
    port: Option<Box<dyn SerialPort>>,
}

impl SerialPortDevice {
    fn port_mut(&mut self) -> io::Result<&mut Box<dyn SerialPort>> {
        self.port
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "serial port is closed"))
    }
}

impl SerialDevice for SerialPortDevice {
    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        self.port_mut()?.write_all(data)
    }

    fn clear_error(&mut self) -> io::Result<()> {
        // A latched break is the only error state serialport lets us reset.
        self.port_mut()?.clear_break().map_err(io::Error::from)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.port_mut()?.flush()
    }

    fn close(&mut self) {
        if self.port.take().is_some() {
            debug!("Serial port handle closed");
        }
    }

    fn is_open(&self) -> bool {
        self.port.is_some()
    }
}

/// Pump bytes from `reader` into `events` until `cancel` is raised or a
/// fatal fault is reported. `released` fires once `reader` is dropped.
pub fn spawn_reader(
    link: LinkId,
    mut reader: Box<dyn Read + Send>,
    events: mpsc::UnboundedSender<LinkEvent>,
    cancel: Arc<AtomicBool>,
    released: std_mpsc::Sender<()>,
) -> JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        let mut buffer = vec![0u8; 1024];

        while !cancel.load(Ordering::Acquire) {
            match reader.read(&mut buffer) {
                Ok(0) => {
                    std::thread::sleep(IDLE_DELAY);
                }
                Ok(n) => {
                    debug!("Received {} bytes over serial on {}", n, link);
                    let event = LinkEvent::new(link, LinkEventKind::Data(buffer[..n].to_vec()));
                    if events.send(event).is_err() {
                        break;
                    }
                }
                Err(ref e)
                    if e.kind() == io::ErrorKind::TimedOut
                        || e.kind() == io::ErrorKind::WouldBlock
                        || e.kind() == io::ErrorKind::Interrupted =>
                {
                    continue;
                }
                Err(e) => {
                    if cancel.load(Ordering::Acquire) {
                        break;
                    }
                    let fault = SerialFault::from_read_error(&e);
                    debug!("Serial read on {} failed: {} ({:?})", link, e, fault);
                    if events.send(LinkEvent::new(link, LinkEventKind::SerialFault(fault))).is_err()
                        || fault.is_fatal()
                    {
                        break;
                    }
                    std::thread::sleep(READ_RETRY_DELAY);
                }
            }
        }

        drop(reader);
        let _ = released.send(());
        debug!("Serial reader for {} stopped", link);
    })
}
