// TUI module - Terminal User Interface

pub mod app;
pub mod ui;
pub mod event;
pub mod state;
pub mod widgets;
pub mod input;
