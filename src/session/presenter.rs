//! Output surface for the session loop.

use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};

/// Kind of message, mapped to a color by console presenters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Error,
    Muted,
    Heading,
    Accent,
    User,
    Agent,
}

/// Where the session writes what the user sees.
pub trait Presenter {
    /// Show one message.
    fn notify(&mut self, level: Level, text: &str);

    /// Show the input prompt.
    fn prompt(&mut self) {}

    /// Clear the screen.
    fn clear(&mut self) {}
}

/// Colored terminal output on stdout.
#[derive(Debug, Default)]
pub struct ConsolePresenter;

impl ConsolePresenter {
    pub fn new() -> Self {
        Self
    }

    fn color(level: Level) -> Color {
        match level {
            Level::Info => Color::White,
            Level::Success => Color::Green,
            Level::Error => Color::Red,
            Level::Muted => Color::DarkGrey,
            Level::Heading => Color::Cyan,
            Level::Accent => Color::Yellow,
            Level::User => Color::Blue,
            Level::Agent => Color::Green,
        }
    }
}

impl Presenter for ConsolePresenter {
    fn notify(&mut self, level: Level, text: &str) {
        let mut out = io::stdout().lock();
        let written = queue!(
            out,
            SetForegroundColor(Self::color(level)),
            Print(text),
            ResetColor,
            Print("\n")
        );
        if written.is_ok() {
            out.flush().ok();
        }
    }

    fn prompt(&mut self) {
        let mut out = io::stdout().lock();
        let written = queue!(
            out,
            Print("\n"),
            SetForegroundColor(Self::color(Level::User)),
            Print("You: "),
            ResetColor
        );
        if written.is_ok() {
            out.flush().ok();
        }
    }

    fn clear(&mut self) {
        let mut out = io::stdout().lock();
        if queue!(out, Clear(ClearType::All), MoveTo(0, 0)).is_ok() {
            out.flush().ok();
        }
    }
}

/// Records everything shown, for inspection in tests.
#[derive(Debug, Default, Clone)]
pub struct BufferPresenter {
    entries: Vec<(Level, String)>,
    clears: usize,
}

impl BufferPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[(Level, String)] {
        &self.entries
    }

    /// Number of times the screen was cleared.
    pub fn clears(&self) -> usize {
        self.clears
    }

    /// Entries shown at `level`.
    pub fn at_level(&self, level: Level) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, text)| text.as_str())
            .collect()
    }

    /// Whether any entry contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.entries.iter().any(|(_, text)| text.contains(needle))
    }

    /// Forget everything recorded so far.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.clears = 0;
    }
}

impl Presenter for BufferPresenter {
    fn notify(&mut self, level: Level, text: &str) {
        self.entries.push((level, text.to_string()));
    }

    fn clear(&mut self) {
        self.clears += 1;
    }
}

/// Banner shown at startup and after a reset.
pub fn welcome_banner() -> String {
    let rule = "=".repeat(60);
    format!(
        "{rule}\n  Learn Copilot - Microsoft Learn MCP chat\n  Type /help for commands, /exit to quit\n{rule}"
    )
}
