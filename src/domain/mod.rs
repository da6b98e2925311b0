// Domain module - Shared types, errors and configuration
pub mod config;
pub mod error;
pub mod fault;
