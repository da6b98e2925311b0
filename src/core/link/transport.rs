use crate::domain::fault::SerialFault;
use std::io;
use std::time::Duration;

/// An open serial device as seen by the connection manager.
///
/// Reading happens on a separate handle owned by the reader task, so this
/// side only writes and recovers from faults.
pub trait SerialDevice: Send {
    /// Write all bytes to the device.
    fn write_all(&mut self, data: &[u8]) -> io::Result<()>;

    /// Reset any latched error condition on the device.
    fn clear_error(&mut self) -> io::Result<()>;

    /// Push pending output to the device.
    fn flush(&mut self) -> io::Result<()>;

    /// Close the device. Later writes fail with `NotConnected`.
    fn close(&mut self);

    fn is_open(&self) -> bool;
}

/// The two halves of an opened serial port.
pub struct SerialChannel {
    pub device: Box<dyn SerialDevice>,
    pub reader: Box<dyn io::Read + Send>,
}

/// Opens serial ports and enumerates the ones present on this machine.
pub trait SerialBackend: Send {
    /// Names of the serial ports currently available.
    fn available_ports(&self) -> Vec<String>;

    /// Open `port` at `baud_rate` with 8 data bits, no parity and no flow control.
    fn open(&self, port: &str, baud_rate: u32) -> Result<SerialChannel, SerialFault>;

    /// Upper bound on how long a reader takes to notice cancellation and
    /// drop its handle.
    fn release_timeout(&self) -> Duration {
        Duration::from_secs(1)
    }
}
