//! Control and status state of the chat widget

/// Which request the widget is waiting on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Send,
    Load,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

/// The transient status line ("Sending...", "Loading messages...")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: StatusKind::Info,
        }
    }
}

/// Ephemeral UI state. Only the request lifecycle mutates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiState {
    pub input_enabled: bool,
    pub send_enabled: bool,
    pub input_focused: bool,
    status: Option<StatusMessage>,
    in_flight: Option<RequestKind>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            input_enabled: true,
            send_enabled: true,
            input_focused: true,
            status: None,
            in_flight: None,
        }
    }
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    /// Replace whatever status is showing.
    pub fn show_status(&mut self, status: StatusMessage) {
        self.status = Some(status);
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    pub fn in_flight(&self) -> Option<RequestKind> {
        self.in_flight
    }

    pub fn is_idle(&self) -> bool {
        self.in_flight.is_none()
    }

    /// Idle -> InFlight. A send locks both controls, a load only the send control.
    pub fn begin(&mut self, kind: RequestKind, status: StatusMessage) {
        self.send_enabled = false;
        if kind == RequestKind::Send {
            self.input_enabled = false;
        }
        self.in_flight = Some(kind);
        self.show_status(status);
    }

    /// InFlight -> Idle. Runs on success and failure alike.
    pub fn release(&mut self, kind: RequestKind) {
        self.send_enabled = true;
        if kind == RequestKind::Send {
            self.input_enabled = true;
            self.input_focused = true;
        }
        if self.in_flight == Some(kind) {
            self.in_flight = None;
        }
    }
}
