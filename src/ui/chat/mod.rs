//! Chat widget components

pub mod commands;
pub mod composer;
pub mod history;
pub mod manager;
pub mod state;

pub use commands::{SlashCommand, help_lines, parse_slash_command};
pub use composer::{Composer, ComposerResult};
pub use history::{DisplayEntry, EntryKind, MessageDisplay};
pub use manager::{ChatWidget, PendingRequest, WidgetAction};
pub use state::{RequestKind, StatusKind, StatusMessage, UiState};
