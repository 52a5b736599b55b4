use crate::error::ChatResult;
use crate::message::WireMessage;
use crossterm::event::{Event, EventStream, KeyEvent, KeyEventKind};
use futures::{Stream, StreamExt};
use std::io;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Everything the main loop reacts to
#[derive(Debug)]
pub enum AppEvent {
    /// Terminal input
    Tui(TuiEvent),

    /// `POST /chat` completed
    SendFinished {
        message: String,
        result: ChatResult<()>,
    },

    /// `GET /messages` completed
    LoadFinished(ChatResult<Vec<WireMessage>>),
}

/// TUI-specific events (keyboard, paste, resize)
#[derive(Debug, Clone)]
pub enum TuiEvent {
    /// Key press event
    Key(KeyEvent),

    /// Paste event
    Paste(String),

    /// Terminal resize
    Resize(u16, u16),
}

impl TuiEvent {
    fn from_crossterm(event: Event) -> Option<Self> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => Some(TuiEvent::Key(key)),
            Event::Paste(text) => Some(TuiEvent::Paste(text)),
            Event::Resize(width, height) => Some(TuiEvent::Resize(width, height)),
            _ => None,
        }
    }
}

/// Terminal input reader feeding [`AppEvent::Tui`] into the main loop.
///
/// Dropping the subscription stops the reader.
#[derive(Debug)]
pub struct InputSubscription {
    handle: JoinHandle<()>,
}

impl InputSubscription {
    /// Start reading the terminal.
    pub fn spawn(tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self::from_stream(EventStream::new(), tx)
    }

    /// Forward `events` until the stream ends, fails, or the receiver is gone.
    pub fn from_stream<S>(events: S, tx: mpsc::UnboundedSender<AppEvent>) -> Self
    where
        S: Stream<Item = io::Result<Event>> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut events = Box::pin(events);
            while let Some(event) = events.next().await {
                match event {
                    Ok(event) => {
                        let Some(event) = TuiEvent::from_crossterm(event) else {
                            continue;
                        };
                        if tx.send(AppEvent::Tui(event)).is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        tracing::error!(error = %err, "terminal input failed");
                        break;
                    }
                }
            }
            tracing::debug!("input reader stopped");
        });

        Self { handle }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for InputSubscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
