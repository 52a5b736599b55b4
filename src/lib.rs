//! Terminal chat widget for a two-endpoint message backend.
//!
//! The widget renders the message list, posts new messages to `POST /chat`
//! and fetches the list from `GET /messages`. See [`ui::chat::ChatWidget`] for
//! the request lifecycle and [`backend::ChatBackend`] for the HTTP seam.

pub mod app;
pub mod backend;
pub mod commands;
pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod message;
pub mod ui;

pub use backend::{ChatBackend, HttpBackend};
pub use config::Config;
pub use error::{ChatError, ChatResult};
pub use message::{Message, WireMessage};
pub use ui::chat::ChatWidget;
