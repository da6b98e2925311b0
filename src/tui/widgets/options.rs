use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::panel_border;
use crate::core::selector::{PortChoice, SpeedChoice};
use crate::tui::state::{ActivePanel, AppState};

pub fn render_options_panel(f: &mut Frame, area: Rect, state: &AppState) {
    let label = Style::default().add_modifier(Modifier::BOLD);

    let address = if state.custom_address.trim().is_empty() {
        Span::styled("(none)", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(state.custom_address.as_str())
    };

    let content = vec![
        Line::from(vec![Span::styled("Address: ", label), address]),
        Line::from(vec![
            Span::styled("TCP port: ", label),
            Span::raw(port_choice_text(&state.port_choice)),
        ]),
        Line::from(vec![
            Span::styled("Baud: ", label),
            Span::raw(speed_choice_text(&state.speed_choice)),
        ]),
        Line::from(Span::styled(
            "a address  p port  b baud",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let options = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Options")
            .border_style(panel_border(state, ActivePanel::Options)),
    );

    f.render_widget(options, area);
}

fn port_choice_text(choice: &PortChoice) -> String {
    match choice {
        PortChoice::Telnet => "telnet".to_string(),
        PortChoice::Alternate => "alternate".to_string(),
        PortChoice::Custom(raw) => format!("custom '{}'", raw),
    }
}

fn speed_choice_text(choice: &SpeedChoice) -> String {
    match choice {
        SpeedChoice::Default => "default".to_string(),
        SpeedChoice::HighSpeed => "high speed".to_string(),
        SpeedChoice::Custom(raw) => format!("custom '{}'", raw),
    }
}
