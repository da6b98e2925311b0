// TCP module - Outbound TCP links
pub mod client;

pub use client::TcpLink;
