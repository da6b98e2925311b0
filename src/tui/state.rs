use crate::core::{
    discovery::PeerDirectory,
    link::NOT_CONNECTED,
    port_list::PortList,
    selector::{PortChoice, SpeedChoice, TargetSelection},
    transcript::Transcript,
};

use super::input::InputBuffer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivePanel {
    Ports,
    Options,
    Transcript,
}

impl ActivePanel {
    pub fn next(self) -> Self {
        match self {
            ActivePanel::Ports => ActivePanel::Options,
            ActivePanel::Options => ActivePanel::Transcript,
            ActivePanel::Transcript => ActivePanel::Ports,
        }
    }
}

impl std::fmt::Display for ActivePanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivePanel::Ports => write!(f, "Ports"),
            ActivePanel::Options => write!(f, "Options"),
            ActivePanel::Transcript => write!(f, "Transcript"),
        }
    }
}

/// Text field currently being edited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Address,
    CustomPort,
    CustomBaud,
    SendLine,
    SavePath,
}

impl EditField {
    pub fn title(self) -> &'static str {
        match self {
            EditField::Address => "Network address",
            EditField::CustomPort => "Custom TCP port",
            EditField::CustomBaud => "Custom baud rate",
            EditField::SendLine => "Send",
            EditField::SavePath => "Save transcript to",
        }
    }
}

#[derive(Debug)]
pub struct AppState {
    pub active_panel: ActivePanel,
    pub editing: Option<EditField>,
    pub input: InputBuffer,
    pub ports: PortList,
    pub selected_port: Option<usize>,
    pub custom_address: String,
    pub port_choice: PortChoice,
    pub speed_choice: SpeedChoice,
    pub peers: PeerDirectory,
    pub transcript: Transcript,
    /// Lines scrolled back from the newest transcript line
    pub scroll_back: usize,
    pub connection_status: String,
    pub status_message: Option<String>,
    pub show_help: bool,
    pub terminal_size: (u16, u16),
}

impl AppState {
    pub fn new(history_limit: usize) -> Self {
        Self {
            active_panel: ActivePanel::Ports,
            editing: None,
            input: InputBuffer::new(),
            ports: PortList::new(),
            selected_port: None,
            custom_address: String::new(),
            port_choice: PortChoice::default(),
            speed_choice: SpeedChoice::default(),
            peers: PeerDirectory::new(),
            transcript: Transcript::new(history_limit),
            scroll_back: 0,
            connection_status: NOT_CONNECTED.to_string(),
            status_message: Some("Welcome to TermLink! Press 'h' for help.".to_string()),
            show_help: false,
            terminal_size: (80, 24),
        }
    }

    /// What the selector should resolve right now.
    pub fn selection(&self) -> TargetSelection {
        TargetSelection {
            custom_address: self.custom_address.clone(),
            selected_entry: self.selected_entry().map(str::to_string),
            port_choice: self.port_choice.clone(),
            speed_choice: self.speed_choice.clone(),
        }
    }

    pub fn selected_entry(&self) -> Option<&str> {
        self.selected_port.and_then(|index| self.ports.get(index))
    }

    /// Merge local ports and known peers into the list.
    pub fn refresh_ports<S: AsRef<str>>(&mut self, local_ports: &[S]) -> usize {
        let added = self.ports.refresh(local_ports, &self.peers);
        if self.selected_port.is_none() && !self.ports.is_empty() {
            self.selected_port = Some(0);
        }
        added
    }

    pub fn select_next_port(&mut self) {
        if self.ports.is_empty() {
            return;
        }
        self.selected_port = Some(match self.selected_port {
            Some(index) => (index + 1) % self.ports.len(),
            None => 0,
        });
    }

    pub fn select_previous_port(&mut self) {
        if self.ports.is_empty() {
            return;
        }
        self.selected_port = Some(match self.selected_port {
            Some(0) | None => self.ports.len() - 1,
            Some(index) => index - 1,
        });
    }

    /// Telnet, then alternate, then custom. Returns `true` on entering custom.
    pub fn cycle_port_choice(&mut self) -> bool {
        self.port_choice = match self.port_choice {
            PortChoice::Telnet => PortChoice::Alternate,
            PortChoice::Alternate => PortChoice::Custom(String::new()),
            PortChoice::Custom(_) => PortChoice::Telnet,
        };
        matches!(self.port_choice, PortChoice::Custom(_))
    }

    /// Default, then high-speed, then custom. Returns `true` on entering custom.
    pub fn cycle_speed_choice(&mut self) -> bool {
        self.speed_choice = match self.speed_choice {
            SpeedChoice::Default => SpeedChoice::HighSpeed,
            SpeedChoice::HighSpeed => SpeedChoice::Custom(String::new()),
            SpeedChoice::Custom(_) => SpeedChoice::Default,
        };
        matches!(self.speed_choice, SpeedChoice::Custom(_))
    }

    /// Start editing `field`, pre-filled with its current value.
    pub fn begin_edit(&mut self, field: EditField) {
        let current = match (field, &self.port_choice, &self.speed_choice) {
            (EditField::Address, _, _) => self.custom_address.clone(),
            (EditField::CustomPort, PortChoice::Custom(raw), _) => raw.clone(),
            (EditField::CustomBaud, _, SpeedChoice::Custom(raw)) => raw.clone(),
            _ => String::new(),
        };
        self.input.set(&current);
        self.editing = Some(field);
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
        self.input.clear();
    }

    /// Finish editing. Selector fields are stored here; the text of the
    /// other fields is handed back to the caller.
    pub fn finish_edit(&mut self) -> Option<(EditField, String)> {
        let field = self.editing.take()?;
        let text = self.input.take();
        match field {
            EditField::Address => self.custom_address = text.clone(),
            EditField::CustomPort => self.port_choice = PortChoice::Custom(text.clone()),
            EditField::CustomBaud => self.speed_choice = SpeedChoice::Custom(text.clone()),
            EditField::SendLine | EditField::SavePath => {}
        }
        Some((field, text))
    }

    pub fn scroll_up(&mut self) {
        if self.scroll_back + 1 < self.transcript.len() {
            self.scroll_back += 1;
        }
    }

    pub fn scroll_down(&mut self) {
        self.scroll_back = self.scroll_back.saturating_sub(1);
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some(message);
    }

    pub fn clear_status_message(&mut self) {
        self.status_message = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::selector::LinkTarget;
    use crate::domain::config::{NetworkConfig, SerialConfig};

    #[test]
    fn test_refresh_selects_first_entry() {
        let mut state = AppState::new(100);
        state.peers.record("10.0.0.7", "GVRET");
        assert_eq!(state.refresh_ports(&["/dev/ttyUSB0"]), 2);

        assert_eq!(state.selected_entry(), Some("10.0.0.7  [GVRET]"));
        state.select_next_port();
        assert_eq!(state.selected_entry(), Some("/dev/ttyUSB0"));
        state.select_next_port();
        assert_eq!(state.selected_port, Some(0));
        state.select_previous_port();
        assert_eq!(state.selected_port, Some(1));
    }

    #[test]
    fn test_edited_fields_feed_the_selection() {
        let mut state = AppState::new(100);
        state.begin_edit(EditField::Address);
        state.input.set("192.168.1.50");
        assert_eq!(state.finish_edit().map(|(field, _)| field), Some(EditField::Address));

        assert!(!state.cycle_port_choice());
        assert!(state.cycle_port_choice());
        state.begin_edit(EditField::CustomPort);
        state.input.set("8023");
        state.finish_edit();

        let request = state
            .selection()
            .resolve(&SerialConfig::default(), &NetworkConfig::default())
            .unwrap();
        assert_eq!(
            request.target,
            LinkTarget::Tcp {
                host: "192.168.1.50".to_string(),
                port: 8023
            }
        );
    }

    #[test]
    fn test_cancel_edit_keeps_previous_value() {
        let mut state = AppState::new(100);
        state.custom_address = "10.1.1.1".to_string();
        state.begin_edit(EditField::Address);
        assert_eq!(state.input.content(), "10.1.1.1");
        state.input.set("garbage");
        state.cancel_edit();

        assert_eq!(state.custom_address, "10.1.1.1");
        assert!(state.editing.is_none());
        assert!(state.finish_edit().is_none());
    }

    #[test]
    fn test_speed_cycle_wraps() {
        let mut state = AppState::new(100);
        assert!(!state.cycle_speed_choice());
        assert_eq!(state.speed_choice, SpeedChoice::HighSpeed);
        assert!(state.cycle_speed_choice());
        assert!(!state.cycle_speed_choice());
        assert_eq!(state.speed_choice, SpeedChoice::Default);
    }
}
