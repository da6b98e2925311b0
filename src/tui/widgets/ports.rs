use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use super::panel_border;
use crate::tui::state::{ActivePanel, AppState};

pub fn render_ports_panel(f: &mut Frame, area: Rect, state: &AppState) {
    let items: Vec<ListItem> = state
        .ports
        .entries()
        .iter()
        .map(|entry| {
            // Discovered peers carry their name in brackets.
            let color = if entry.contains('[') { Color::Cyan } else { Color::Green };
            ListItem::new(entry.as_str()).style(Style::default().fg(color))
        })
        .collect();

    let title = format!("Ports ({})", state.ports.len());
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(panel_border(state, ActivePanel::Ports)),
        )
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    list_state.select(state.selected_port);
    f.render_stateful_widget(list, area, &mut list_state);
}
