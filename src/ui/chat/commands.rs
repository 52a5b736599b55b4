use std::str::FromStr;

use strum::{AsRefStr, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Commands that can be invoked by starting a message with a leading slash.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter, AsRefStr, IntoStaticStr,
)]
#[strum(serialize_all = "kebab-case")]
pub enum SlashCommand {
    /// Fetch the message list again
    Reload,
    /// Clear the local display
    Clear,
    /// Show help
    Help,
    /// Exit the application
    Quit,
}

impl SlashCommand {
    /// User-visible description shown in help.
    pub fn description(self) -> &'static str {
        match self {
            SlashCommand::Reload => "fetch the message list again",
            SlashCommand::Clear => "clear the display (messages stay on the server)",
            SlashCommand::Help => "show available commands",
            SlashCommand::Quit => "exit the application",
        }
    }

    /// Command string without the leading '/'.
    pub fn command(self) -> &'static str {
        self.into()
    }

    /// Whether this command runs while a request is in flight.
    pub fn available_while_busy(self) -> bool {
        matches!(self, SlashCommand::Quit)
    }
}

/// Parse a slash command from user input. Unknown commands yield `None` and
/// are sent as ordinary messages.
pub fn parse_slash_command(input: &str) -> Option<SlashCommand> {
    let head = input.trim().strip_prefix('/')?.split_whitespace().next()?;

    SlashCommand::from_str(head).ok().or_else(|| match head.to_lowercase().as_str() {
        "r" | "refresh" => Some(SlashCommand::Reload),
        "q" | "exit" => Some(SlashCommand::Quit),
        "h" | "?" => Some(SlashCommand::Help),
        _ => None,
    })
}

/// Help lines for all available commands
pub fn help_lines() -> Vec<String> {
    let mut lines = vec!["Available commands:".to_string()];
    for command in SlashCommand::iter() {
        lines.push(format!("/{} - {}", command.command(), command.description()));
    }
    lines.push(
        "Aliases: /r for /reload, /q for /quit. PageUp/PageDown scroll, Esc quits.".to_string(),
    );
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_aliases() {
        assert_eq!(parse_slash_command("/reload"), Some(SlashCommand::Reload));
        assert_eq!(parse_slash_command("  /r "), Some(SlashCommand::Reload));
        assert_eq!(parse_slash_command("/quit now"), Some(SlashCommand::Quit));
        assert_eq!(parse_slash_command("/q"), Some(SlashCommand::Quit));
        assert_eq!(parse_slash_command("/clear"), Some(SlashCommand::Clear));
    }

    #[test]
    fn non_commands_are_not_parsed() {
        assert_eq!(parse_slash_command("hello"), None);
        assert_eq!(parse_slash_command("/shrug"), None);
        assert_eq!(parse_slash_command("/"), None);
    }

    #[test]
    fn help_lists_every_command() {
        let help = help_lines().join("\n");
        for command in SlashCommand::iter() {
            assert!(help.contains(&format!("/{}", command.command())));
        }
    }
}
