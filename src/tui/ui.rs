use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

use super::{
    state::AppState,
    widgets::{
        help::render_help_popup,
        options::render_options_panel,
        ports::render_ports_panel,
        status::{render_input_line, render_status_bar},
        transcript::render_transcript_panel,
    },
};

pub fn draw_ui(f: &mut Frame, state: &mut AppState) {
    let size = f.size();
    state.terminal_size = (size.width, size.height);

    // Main layout
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Main content
            Constraint::Length(3), // Input line
            Constraint::Length(1), // Status bar
        ])
        .split(size);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(32), Constraint::Percentage(68)])
        .split(chunks[0]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(7)])
        .split(columns[0]);

    render_ports_panel(f, left[0], state);
    render_options_panel(f, left[1], state);
    render_transcript_panel(f, columns[1], state);
    render_input_line(f, chunks[1], state);
    render_status_bar(f, chunks[2], state);

    // Help popup (if active)
    if state.show_help {
        render_help_popup(f, size);
    }
}

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
