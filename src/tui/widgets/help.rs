use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::tui::ui::centered_rect;

pub fn render_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(70, 80, area);

    // Clear the background
    f.render_widget(Clear, popup_area);

    let help_content = vec![
        Line::from("TermLink - Keys"),
        Line::from(""),
        Line::from("General:"),
        Line::from("  q / Ctrl+C  - Quit"),
        Line::from("  h           - Toggle help"),
        Line::from("  Tab         - Next panel"),
        Line::from("  Esc         - Dismiss message / cancel edit"),
        Line::from(""),
        Line::from("Connection:"),
        Line::from("  Up/Down j/k - Select port (or scroll transcript)"),
        Line::from("  a           - Edit network address"),
        Line::from("  p           - Cycle TCP port: telnet, alternate, custom"),
        Line::from("  b           - Cycle baud: default, high speed, custom"),
        Line::from("  Enter       - Connect"),
        Line::from("  x           - Disconnect"),
        Line::from("  r           - Rescan ports"),
        Line::from(""),
        Line::from("Transcript:"),
        Line::from("  i           - Type a line to send"),
        Line::from("  f           - Show the unterminated tail"),
        Line::from("  c           - Clear"),
        Line::from("  s           - Save to file (.txt added without extension)"),
    ];

    let help = Paragraph::new(help_content)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Help")
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .wrap(ratatui::widgets::Wrap { trim: true });

    f.render_widget(help, popup_area);
}
