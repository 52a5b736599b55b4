use crate::backend::ChatBackend;
use crate::config::UiConfig;
use crate::error::ChatResult;
use crate::message::WireMessage;
use crate::ui::chat::commands::{SlashCommand, help_lines, parse_slash_command};
use crate::ui::chat::composer::{Composer, ComposerResult};
use crate::ui::chat::history::{EntryKind, MessageDisplay};
use crate::ui::chat::state::{RequestKind, StatusKind, StatusMessage, UiState};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

pub const SENDING: &str = "Sending...";
pub const LOADING: &str = "Loading messages...";

const PAGE: usize = 5;

/// A request the widget has committed to and is now waiting on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingRequest {
    /// `POST /chat` with the trimmed message
    Send(String),
    /// `GET /messages`
    Load,
}

/// Actions that can be requested by the widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetAction {
    None,
    Request(PendingRequest),
    Quit,
}

/// The chat widget: message display, composer and transient status.
///
/// Each operation runs in two phases. `submit_message` / `load_messages` move
/// the widget to in-flight and hand back the request to run; the matching
/// `finish_*` applies the outcome and always returns the widget to idle.
#[derive(Debug, Clone)]
pub struct ChatWidget {
    display: MessageDisplay,
    composer: Composer,
    state: UiState,
    restore_input_on_failure: bool,
}

impl ChatWidget {
    pub fn new(ui: &UiConfig) -> Self {
        Self {
            display: MessageDisplay::new(ui.title.clone(), ui.max_entries),
            composer: Composer::new(ui.placeholder.clone()),
            state: UiState::new(),
            restore_input_on_failure: ui.restore_input_on_failure,
        }
    }

    /// Start sending `text`. No-op (returns `None`) when the trimmed text is
    /// empty or a request is already holding the send control.
    ///
    /// The input is cleared right away, before the outcome is known.
    pub fn submit_message(&mut self, text: &str) -> Option<PendingRequest> {
        if !self.state.send_enabled {
            tracing::debug!("send ignored while a request is in flight");
            return None;
        }

        let message = text.trim();
        if message.is_empty() {
            return None;
        }

        self.state.begin(RequestKind::Send, StatusMessage::info(SENDING));
        self.composer.clear();
        self.sync_composer();
        tracing::info!(len = message.len(), "sending message");

        Some(PendingRequest::Send(message.to_string()))
    }

    /// Apply the outcome of a send started by [`ChatWidget::submit_message`].
    pub fn finish_send(&mut self, message: String, result: ChatResult<()>) {
        self.state.clear_status();

        match result {
            Ok(()) => {
                self.append(format!("You: {message}"), EntryKind::Normal);
            }
            Err(err) => {
                tracing::error!(
                    error = %err,
                    status = ?err.status(),
                    "error sending message to backend"
                );
                self.append(
                    format!("Error sending message: {}. Please try again.", err.reason()),
                    EntryKind::Error,
                );
                if self.restore_input_on_failure && self.composer.value().is_empty() {
                    self.composer.set_value(message);
                }
            }
        }

        self.state.release(RequestKind::Send);
        self.sync_composer();
    }

    /// Start fetching the message list.
    pub fn load_messages(&mut self) -> PendingRequest {
        self.state.begin(RequestKind::Load, StatusMessage::info(LOADING));
        self.sync_composer();
        tracing::info!("loading messages");
        PendingRequest::Load
    }

    /// Apply the outcome of a load started by [`ChatWidget::load_messages`].
    ///
    /// Success replaces the whole display; failure keeps it and appends an
    /// error entry.
    pub fn finish_load(&mut self, result: ChatResult<Vec<WireMessage>>) {
        self.state.clear_status();

        match result {
            Ok(messages) => {
                tracing::info!(count = messages.len(), "messages loaded");
                self.display.clear();
                for message in &messages {
                    self.append(message.display_line(), EntryKind::Normal);
                }
            }
            Err(err) => {
                tracing::error!(error = %err, status = ?err.status(), "error fetching messages");
                self.append(
                    format!("Error fetching messages: {}. Please try refreshing.", err.reason()),
                    EntryKind::Error,
                );
            }
        }

        self.state.release(RequestKind::Load);
        self.sync_composer();
    }

    /// Full send cycle against `backend`. Returns `None` when nothing was sent.
    pub async fn run_submit(
        &mut self,
        backend: &dyn ChatBackend,
        text: &str,
    ) -> Option<ChatResult<()>> {
        let PendingRequest::Send(message) = self.submit_message(text)? else {
            return None;
        };
        let result = backend.send_message(&message).await;
        self.finish_send(message, result.clone());
        Some(result)
    }

    /// Full load cycle against `backend`. Returns the number of messages shown.
    pub async fn run_load(&mut self, backend: &dyn ChatBackend) -> ChatResult<usize> {
        self.load_messages();
        let result = backend.fetch_messages().await;
        let outcome = result.as_ref().map(Vec::len).map_err(|err| err.clone());
        self.finish_load(result);
        outcome
    }

    /// Feed a key press through the composer
    pub fn handle_key(&mut self, key: KeyEvent) -> WidgetAction {
        match key.code {
            KeyCode::PageUp => {
                self.display.scroll_up(PAGE);
                return WidgetAction::None;
            }
            KeyCode::PageDown => {
                self.display.scroll_down(PAGE);
                return WidgetAction::None;
            }
            _ => {}
        }

        match self.composer.handle_key(key) {
            ComposerResult::Submitted(raw) => self.handle_submit(&raw),
            ComposerResult::None => WidgetAction::None,
        }
    }

    pub fn handle_paste(&mut self, text: &str) {
        self.composer.insert_str(text);
    }

    fn handle_submit(&mut self, raw: &str) -> WidgetAction {
        let Some(command) = parse_slash_command(raw) else {
            return match self.submit_message(raw) {
                Some(request) => WidgetAction::Request(request),
                None => WidgetAction::None,
            };
        };

        if !self.state.send_enabled && !command.available_while_busy() {
            return WidgetAction::None;
        }
        self.composer.clear();

        match command {
            SlashCommand::Reload => WidgetAction::Request(self.load_messages()),
            SlashCommand::Clear => {
                self.display.clear();
                WidgetAction::None
            }
            SlashCommand::Help => {
                for line in help_lines() {
                    self.append(line, EntryKind::Info);
                }
                WidgetAction::None
            }
            SlashCommand::Quit => WidgetAction::Quit,
        }
    }

    /// Appending always takes the transient status down first.
    fn append(&mut self, text: String, kind: EntryKind) {
        self.state.clear_status();
        self.display.push(text, kind);
    }

    fn sync_composer(&mut self) {
        self.composer.set_enabled(self.state.input_enabled);
        self.composer.set_focus(self.state.input_focused);
    }

    pub fn display(&self) -> &MessageDisplay {
        &self.display
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    pub fn input_value(&self) -> &str {
        self.composer.value()
    }
}

impl Widget for &ChatWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // Messages
                Constraint::Length(1), // Status
                Constraint::Length(3), // Composer
            ])
            .split(area);

        self.display.render(chunks[0], buf);

        if let Some(status) = self.state.status() {
            let style = match status.kind {
                StatusKind::Info => Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
                StatusKind::Error => Style::default().fg(Color::Red),
            };
            let line = Line::from(vec![Span::raw(" "), Span::styled(status.text.as_str(), style)]);
            buf.set_line(chunks[1].x, chunks[1].y, &line, chunks[1].width);
        }

        self.composer.render(chunks[2], buf);
    }
}
