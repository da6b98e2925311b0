use ratatui::{
    layout::Rect,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::panel_border;
use crate::tui::state::{ActivePanel, AppState};

pub fn render_transcript_panel(f: &mut Frame, area: Rect, state: &AppState) {
    let height = area.height.saturating_sub(2) as usize;
    let total = state.transcript.len();
    let end = total.saturating_sub(state.scroll_back);
    let start = end.saturating_sub(height);

    let text: Vec<ratatui::text::Line> = state
        .transcript
        .lines()
        .skip(start)
        .take(end - start)
        .map(ratatui::text::Line::from)
        .collect();

    let title = if state.scroll_back > 0 {
        format!("Transcript ({} lines, {} back)", total, state.scroll_back)
    } else {
        format!("Transcript ({} lines)", total)
    };

    let transcript = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(panel_border(state, ActivePanel::Transcript)),
    );

    f.render_widget(transcript, area);
}
