use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::core::link::NOT_CONNECTED;
use crate::tui::state::AppState;

pub fn render_status_bar(f: &mut Frame, area: Rect, state: &AppState) {
    let connection_style = if state.connection_status == NOT_CONNECTED {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Green)
    };

    let hint = match &state.status_message {
        Some(message) => Span::styled(message.clone(), Style::default().fg(Color::Yellow)),
        None => Span::styled(
            format!("Panel: {} | Peers: {} | Help: h | Quit: q", state.active_panel, state.peers.len()),
            Style::default().fg(Color::Gray),
        ),
    };

    let status = Paragraph::new(Line::from(vec![
        Span::styled(state.connection_status.clone(), connection_style),
        Span::raw(" | "),
        hint,
    ]));

    f.render_widget(status, area);
}

pub fn render_input_line(f: &mut Frame, area: Rect, state: &AppState) {
    let (title, content, style) = match state.editing {
        Some(field) => (field.title(), state.input.content(), Style::default().fg(Color::Yellow)),
        None => ("Input", "press i to type a line", Style::default().fg(Color::DarkGray)),
    };

    let input = Paragraph::new(content)
        .style(style)
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(input, area);

    if state.editing.is_some() {
        let x = area.x + 1 + state.input.cursor_position() as u16;
        f.set_cursor(x.min(area.right().saturating_sub(2)), area.y + 1);
    }
}
