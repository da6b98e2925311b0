// Widgets - one render function per screen region
pub mod help;
pub mod options;
pub mod ports;
pub mod status;
pub mod transcript;

use ratatui::style::{Color, Style};

use crate::tui::state::{ActivePanel, AppState};

/// Border style of a panel, highlighted while it has focus.
pub(crate) fn panel_border(state: &AppState, panel: ActivePanel) -> Style {
    if state.active_panel == panel {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    }
}
