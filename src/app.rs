use crate::backend::ChatBackend;
use crate::config::Config;
use crate::events::{AppEvent, InputSubscription, TuiEvent};
use crate::ui::chat::{ChatWidget, PendingRequest, WidgetAction};
use anyhow::{Context, Result};
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Raw-mode alternate screen, restored on drop
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)
            .context("Failed to enter alternate screen")?;
        let terminal =
            Terminal::new(CrosstermBackend::new(stdout)).context("Failed to create terminal")?;
        Ok(Self { terminal })
    }

    fn draw(&mut self, widget: &ChatWidget) -> Result<()> {
        self.terminal
            .draw(|frame| frame.render_widget(widget, frame.size()))
            .context("Failed to draw frame")?;
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            DisableBracketedPaste,
            LeaveAlternateScreen
        );
        let _ = self.terminal.show_cursor();
    }
}

/// Hosts a [`ChatWidget`] in the terminal and runs its requests
pub struct App {
    widget: ChatWidget,
    backend: Arc<dyn ChatBackend>,
    tx: mpsc::UnboundedSender<AppEvent>,
    rx: mpsc::UnboundedReceiver<AppEvent>,
    should_quit: bool,
}

impl App {
    pub fn new(config: &Config, backend: Arc<dyn ChatBackend>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            widget: ChatWidget::new(&config.ui),
            backend,
            tx,
            rx,
            should_quit: false,
        }
    }

    /// Run until the user quits. Loads the message list on start.
    pub async fn run(mut self) -> Result<()> {
        let mut terminal = TerminalGuard::enter()?;
        let input = InputSubscription::spawn(self.tx.clone());

        let request = self.widget.load_messages();
        self.dispatch(request);

        while !self.should_quit {
            terminal.draw(&self.widget)?;

            let Some(event) = self.rx.recv().await else {
                break;
            };
            self.handle_event(event);

            if input.is_finished() {
                tracing::warn!("terminal input closed, exiting");
                break;
            }
        }

        tracing::info!("chat widget closed");
        Ok(())
    }

    /// Run `request` on a background task; its completion comes back as an
    /// [`AppEvent`] and is always delivered.
    fn dispatch(&self, request: PendingRequest) {
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let event = match request {
                PendingRequest::Send(message) => {
                    let result = backend.send_message(&message).await;
                    AppEvent::SendFinished { message, result }
                }
                PendingRequest::Load => AppEvent::LoadFinished(backend.fetch_messages().await),
            };
            if tx.send(event).is_err() {
                tracing::debug!("event loop gone before request completed");
            }
        });
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Tui(TuiEvent::Key(key)) => self.handle_key(key),
            AppEvent::Tui(TuiEvent::Paste(text)) => self.widget.handle_paste(&text),
            AppEvent::Tui(TuiEvent::Resize(..)) => {}
            AppEvent::SendFinished { message, result } => self.widget.finish_send(message, result),
            AppEvent::LoadFinished(result) => self.widget.finish_load(result),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let ctrl_c =
            key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl_c || key.code == KeyCode::Esc {
            self.should_quit = true;
            return;
        }

        match self.widget.handle_key(key) {
            WidgetAction::None => {}
            WidgetAction::Request(request) => self.dispatch(request),
            WidgetAction::Quit => self.should_quit = true,
        }
    }

    /// Wait for the next event without handling it
    pub async fn next_event(&mut self) -> Option<AppEvent> {
        self.rx.recv().await
    }

    pub fn widget(&self) -> &ChatWidget {
        &self.widget
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }
}
