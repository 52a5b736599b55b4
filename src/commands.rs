use crate::backend::{ChatBackend, HttpBackend};
use crate::config::Config;
use crate::ui::chat::{ChatWidget, EntryKind, MessageDisplay};
use anyhow::{Context, Result, bail};
use std::io::{self, Write};
use std::path::Path;

fn backend(config: &Config) -> Result<HttpBackend> {
    HttpBackend::new(&config.server)
        .with_context(|| format!("Invalid backend URL '{}'", config.server.base_url))
}

fn print_display(display: &MessageDisplay, out: &mut impl Write) -> Result<()> {
    for entry in display.entries() {
        match entry.kind {
            EntryKind::Error => writeln!(out, "❌ {}", entry.text)?,
            EntryKind::Normal | EntryKind::Info => writeln!(out, "{}", entry.text)?,
        }
    }
    Ok(())
}

/// Run one send cycle without the TUI. Returns whether the send succeeded.
pub async fn send_message(config: &Config, message: &str) -> Result<bool> {
    let backend = backend(config)?;
    send_with(&backend, config, message, &mut io::stdout()).await
}

pub async fn send_with(
    backend: &dyn ChatBackend,
    config: &Config,
    message: &str,
    out: &mut impl Write,
) -> Result<bool> {
    let mut widget = ChatWidget::new(&config.ui);
    let Some(result) = widget.run_submit(backend, message).await else {
        bail!("Message is empty");
    };
    print_display(widget.display(), out)?;
    Ok(result.is_ok())
}

/// Run one load cycle without the TUI. Returns whether the load succeeded.
pub async fn list_messages(config: &Config) -> Result<bool> {
    let backend = backend(config)?;
    list_with(&backend, config, &mut io::stdout()).await
}

pub async fn list_with(
    backend: &dyn ChatBackend,
    config: &Config,
    out: &mut impl Write,
) -> Result<bool> {
    let mut widget = ChatWidget::new(&config.ui);
    let result = widget.run_load(backend).await;
    if matches!(result, Ok(0)) {
        writeln!(out, "📭 No messages yet.")?;
    }
    print_display(widget.display(), out)?;
    Ok(result.is_ok())
}

/// Write the default configuration to `path`, refusing to overwrite.
pub fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        bail!("Config file {} already exists", path.display());
    }
    Config::default().save(path)?;
    println!("✨ Wrote default config to {}", path.display());
    Ok(())
}
