//! Interactive session loop.
//!
//! A [`Session`] owns the transcript, the agent thread and the turn counter,
//! and turns each input line into either a command or a chat turn. All output
//! goes through a [`Presenter`], so the loop runs the same against a terminal
//! or a test buffer.

pub mod command;
pub mod presenter;
pub mod transcript;
pub mod writer;

use std::borrow::Cow;
use std::time::Instant;

use chrono::Local;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};

use crate::agent::{AgentThread, ConversationalAgent};
use crate::error::AppError;
use crate::memory::MemoryStore;

pub use command::{parse_input, Input, SessionCommand};
pub use presenter::{welcome_banner, BufferPresenter, ConsolePresenter, Level, Presenter};
pub use transcript::{preview, Transcript, Turn, TurnRole, PREVIEW_CHARS};
pub use writer::TranscriptWriter;

const RULE_WIDTH: usize = 60;

const HELP_ENTRIES: [(&str, &str); 8] = [
    ("/help", "Show this help message"),
    ("/clear", "Clear conversation and start fresh"),
    ("/new", "Same as /clear"),
    ("/history", "Show conversation history"),
    ("/memory", "Show all stored memories"),
    ("/profile", "Show user profile information"),
    ("/save", "Save conversation to file"),
    ("/exit", "Exit the application"),
];

/// Whether the loop keeps reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

/// Per-conversation state, replaced wholesale on reset.
#[derive(Debug)]
pub struct SessionState {
    /// Successful chat turns since the last reset.
    pub turn_count: usize,
    pub thread: AgentThread,
}

pub struct Session<A, P> {
    agent: A,
    presenter: P,
    memory: Option<MemoryStore>,
    writer: TranscriptWriter,
    transcript: Transcript,
    state: SessionState,
}

impl<A, P> Session<A, P>
where
    A: ConversationalAgent,
    P: Presenter,
{
    /// `memory` is `None` when the memory store is disabled.
    pub fn new(
        agent: A,
        presenter: P,
        memory: Option<MemoryStore>,
        writer: TranscriptWriter,
    ) -> Self {
        let thread = agent.new_thread();
        Self {
            agent,
            presenter,
            memory,
            writer,
            transcript: Transcript::new(),
            state: SessionState {
                turn_count: 0,
                thread,
            },
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn turn_count(&self) -> usize {
        self.state.turn_count
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn agent(&self) -> &A {
        &self.agent
    }

    /// Read lines until `/exit` or end of input.
    pub async fn run<R>(&mut self, mut reader: R) -> Result<(), AppError>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut buf = Vec::new();
        loop {
            self.presenter.prompt();
            buf.clear();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                debug!("input closed");
                return Ok(());
            }
            // Bytes that are not UTF-8 are replaced rather than ending the session.
            let line = String::from_utf8_lossy(&buf);
            if matches!(line, Cow::Owned(_)) {
                warn!("input line was not valid UTF-8");
            }
            if self.handle_line(&line).await == LoopControl::Exit {
                return Ok(());
            }
        }
    }

    /// Process one input line.
    pub async fn handle_line(&mut self, line: &str) -> LoopControl {
        match parse_input(line) {
            Input::Empty => LoopControl::Continue,
            Input::Command(command) => self.dispatch(command).await,
            Input::Chat(text) => {
                self.chat_turn(&text).await;
                LoopControl::Continue
            }
        }
    }

    async fn dispatch(&mut self, command: SessionCommand) -> LoopControl {
        match command {
            SessionCommand::Exit => {
                self.presenter
                    .notify(Level::Info, "Goodbye! Thanks for chatting.");
                return LoopControl::Exit;
            }
            SessionCommand::Reset => self.reset(),
            SessionCommand::ShowHistory => self.show_history(),
            SessionCommand::ShowHelp => self.show_help(),
            SessionCommand::Save => self.save().await,
            SessionCommand::ShowMemory => self.show_memory(),
            SessionCommand::ShowProfile => self.show_profile(),
            SessionCommand::Unknown(raw) => {
                self.presenter.notify(
                    Level::Error,
                    &format!("Unknown command: /{raw} (type /help to see available commands)"),
                );
            }
        }
        LoopControl::Continue
    }

    async fn chat_turn(&mut self, text: &str) {
        self.transcript.push(Turn::user(text));
        self.presenter.notify(Level::Muted, "Agent is thinking...");

        let started = Instant::now();
        let outcome = self.agent.run(text, &mut self.state.thread).await;
        let elapsed_ms = started.elapsed().as_millis();

        match outcome {
            Ok(response) => {
                self.transcript.push(Turn::agent(response.text.clone()));
                self.state.turn_count += 1;
                debug!(
                    elapsed_ms = elapsed_ms as u64,
                    tool_calls = response.tool_calls,
                    tokens = response.usage.total_tokens,
                    "turn completed"
                );

                self.presenter.notify(Level::Agent, "Agent:");
                self.presenter.notify(Level::Info, &response.text);
                self.presenter.notify(
                    Level::Muted,
                    &format!(
                        "Response time: {elapsed_ms}ms | Turns: {} | Messages: {}",
                        self.state.turn_count,
                        self.transcript.len()
                    ),
                );
            }
            Err(e) => {
                self.transcript.rollback_last();
                warn!(error = %e, elapsed_ms = elapsed_ms as u64, "turn failed");
                self.presenter.notify(Level::Error, &format!("Error: {e}"));
            }
        }
    }

    fn reset(&mut self) {
        self.transcript.clear();
        self.state = SessionState {
            turn_count: 0,
            thread: self.agent.new_thread(),
        };
        self.presenter.clear();
        self.presenter.notify(Level::Heading, &welcome_banner());
        self.presenter.notify(
            Level::Success,
            "Started a new conversation with a fresh thread",
        );
    }

    fn rule(&mut self) {
        self.presenter.notify(Level::Muted, &"-".repeat(RULE_WIDTH));
    }

    fn show_history(&mut self) {
        if self.transcript.is_empty() {
            self.presenter
                .notify(Level::Info, "No conversation history yet. Start chatting!");
            return;
        }

        self.presenter.notify(Level::Heading, "Conversation History:");
        self.rule();
        for (i, turn) in self.transcript.turns().iter().enumerate() {
            let level = match turn.role {
                TurnRole::User => Level::User,
                TurnRole::Agent => Level::Agent,
            };
            self.presenter
                .notify(level, &format!("[{}] {}:", i + 1, turn.role));
            self.presenter
                .notify(Level::Info, &preview(&turn.text, PREVIEW_CHARS));
        }
        self.rule();
    }

    fn show_help(&mut self) {
        self.presenter.notify(Level::Heading, "Available Commands:");
        self.rule();
        for (name, description) in HELP_ENTRIES {
            self.presenter
                .notify(Level::Info, &format!("  {name:<10} - {description}"));
        }
        self.rule();
    }

    async fn save(&mut self) {
        if self.transcript.is_empty() {
            self.presenter.notify(Level::Info, "No conversation to save yet.");
            return;
        }

        match self.writer.save(&self.transcript, Local::now()).await {
            Ok(path) => self.presenter.notify(
                Level::Success,
                &format!("Conversation saved to: {}", path.display()),
            ),
            Err(e) => {
                warn!(error = %e, "saving transcript failed");
                self.presenter
                    .notify(Level::Error, &format!("Failed to save conversation: {e}"));
            }
        }
    }

    fn show_memory(&mut self) {
        let Some(memory) = self.memory.as_ref() else {
            self.presenter
                .notify(Level::Info, "Memory store is disabled for this session.");
            return;
        };
        let context = memory.render_context();

        self.presenter.notify(Level::Heading, "Memory Store Contents:");
        self.rule();
        if !context.is_empty() {
            self.presenter.notify(Level::Info, &context);
        }
        self.rule();
    }

    fn show_profile(&mut self) {
        let Some(memory) = self.memory.as_ref() else {
            self.presenter
                .notify(Level::Info, "Memory store is disabled for this session.");
            return;
        };
        let lines: Vec<String> = memory
            .profile()
            .into_iter()
            .map(|(label, value)| format!("  {:<11} {}", format!("{label}:"), value.unwrap_or("-")))
            .collect();

        self.presenter.notify(Level::Heading, "User Profile:");
        self.rule();
        for line in lines {
            self.presenter.notify(Level::Info, &line);
        }
        self.rule();
    }
}
