//! Ordered record of the turns in a session.

use std::fmt;

/// Maximum characters of a turn shown by the history view.
pub const PREVIEW_CHARS: usize = 200;

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnRole {
    User,
    Agent,
}

impl TurnRole {
    pub fn label(&self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Agent => "AGENT",
        }
    }
}

impl fmt::Display for TurnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: TurnRole,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            text: text.into(),
        }
    }

    pub fn agent(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Agent,
            text: text.into(),
        }
    }
}

/// Append-only list of turns; the last turn can be rolled back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Remove the most recent turn, returning it.
    pub fn rollback_last(&mut self) -> Option<Turn> {
        self.turns.pop()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn iter(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

/// Truncate `text` to `max_chars` characters, appending `...` when cut.
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rollback_removes_only_last_turn() {
        let mut transcript = Transcript::new();
        transcript.push(Turn::user("a"));
        transcript.push(Turn::agent("b"));
        transcript.push(Turn::user("c"));

        assert_eq!(transcript.rollback_last(), Some(Turn::user("c")));
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.turns()[1].role, TurnRole::Agent);
    }

    #[test]
    fn preview_keeps_short_text() {
        let text = "x".repeat(PREVIEW_CHARS);
        assert_eq!(preview(&text, PREVIEW_CHARS), text);
    }

    #[test]
    fn preview_truncates_long_text() {
        let text = "y".repeat(PREVIEW_CHARS + 1);
        let shown = preview(&text, PREVIEW_CHARS);
        assert_eq!(shown.len(), PREVIEW_CHARS + 3);
        assert!(shown.ends_with("..."));
    }

    #[test]
    fn preview_counts_characters_not_bytes() {
        let text = "é".repeat(201);
        let shown = preview(&text, 200);
        assert_eq!(shown.chars().count(), 203);
        assert_eq!(preview("Café", 200), "Café");
    }
}
