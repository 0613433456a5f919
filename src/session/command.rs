//! Input classification and slash-command parsing.

use strum::EnumString;

/// Prefix marking a line as a command.
pub const COMMAND_PREFIX: char = '/';

/// Session commands, matched case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum SessionCommand {
    #[strum(serialize = "exit")]
    Exit,
    /// Start over with an empty transcript and a fresh thread.
    #[strum(serialize = "clear", serialize = "new")]
    Reset,
    #[strum(serialize = "history")]
    ShowHistory,
    #[strum(serialize = "help")]
    ShowHelp,
    #[strum(serialize = "save")]
    Save,
    #[strum(serialize = "memory")]
    ShowMemory,
    #[strum(serialize = "profile")]
    ShowProfile,
    #[strum(default)]
    Unknown(String),
}

impl SessionCommand {
    /// Parse a command name (the text after the prefix).
    pub fn parse(name: &str) -> Self {
        name.parse()
            .unwrap_or_else(|_| Self::Unknown(name.to_string()))
    }
}

/// One classified line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Empty,
    Command(SessionCommand),
    Chat(String),
}

/// Classify a raw input line.
pub fn parse_input(line: &str) -> Input {
    let line = line.trim();
    if line.is_empty() {
        return Input::Empty;
    }
    match line.strip_prefix(COMMAND_PREFIX) {
        // The whole remainder is the name, so `/exit now` is unknown.
        Some(rest) => Input::Command(SessionCommand::parse(rest)),
        None => Input::Chat(line.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_are_empty() {
        assert_eq!(parse_input(""), Input::Empty);
        assert_eq!(parse_input("   \t"), Input::Empty);
    }

    #[test]
    fn commands_are_case_insensitive() {
        assert_eq!(parse_input("/EXIT"), Input::Command(SessionCommand::Exit));
        assert_eq!(parse_input("/Help"), Input::Command(SessionCommand::ShowHelp));
        assert_eq!(parse_input("  /history  "), Input::Command(SessionCommand::ShowHistory));
    }

    #[test]
    fn clear_and_new_both_reset() {
        assert_eq!(parse_input("/clear"), Input::Command(SessionCommand::Reset));
        assert_eq!(parse_input("/NEW"), Input::Command(SessionCommand::Reset));
    }

    #[test]
    fn every_known_command_parses() {
        for (raw, expected) in [
            ("save", SessionCommand::Save),
            ("memory", SessionCommand::ShowMemory),
            ("profile", SessionCommand::ShowProfile),
        ] {
            assert_eq!(SessionCommand::parse(raw), expected);
        }
    }

    #[test]
    fn unknown_command_keeps_raw_name() {
        assert_eq!(
            parse_input("/unknown"),
            Input::Command(SessionCommand::Unknown("unknown".into()))
        );
        assert_eq!(
            parse_input("/"),
            Input::Command(SessionCommand::Unknown(String::new()))
        );
    }

    #[test]
    fn trailing_words_make_command_unknown() {
        assert_eq!(
            parse_input("/exit now"),
            Input::Command(SessionCommand::Unknown("exit now".into()))
        );
        assert_eq!(
            parse_input("/ help"),
            Input::Command(SessionCommand::Unknown(" help".into()))
        );
    }

    #[test]
    fn other_text_is_chat() {
        assert_eq!(
            parse_input("  What is Azure Bicep? "),
            Input::Chat("What is Azure Bicep?".into())
        );
    }
}
