// Serial module - serialport-backed device access
pub mod client;

pub use client::{spawn_reader, SerialPortDevice, SystemSerial};
