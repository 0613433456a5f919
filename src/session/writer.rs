//! Transcript files.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::info;

use crate::error::AppError;

use super::transcript::Transcript;

const FILE_PREFIX: &str = "conversation_";
const RULE_WIDTH: usize = 70;

/// Writes transcripts as timestamped text files under one directory.
#[derive(Debug, Clone)]
pub struct TranscriptWriter {
    dir: PathBuf,
}

impl TranscriptWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `conversation_<yyyyMMdd_HHmmss>.txt`
    pub fn file_name(at: DateTime<Local>) -> String {
        format!("{FILE_PREFIX}{}.txt", at.format("%Y%m%d_%H%M%S"))
    }

    /// Write `transcript` to a new file and return its path.
    pub async fn save(
        &self,
        transcript: &Transcript,
        at: DateTime<Local>,
    ) -> Result<PathBuf, AppError> {
        let path = self.dir.join(Self::file_name(at));
        tokio::fs::write(&path, render(transcript, at)).await?;
        info!(path = %path.display(), turns = transcript.len(), "transcript saved");
        Ok(path)
    }
}

/// Render the file contents for `transcript` saved at `at`.
pub fn render(transcript: &Transcript, at: DateTime<Local>) -> String {
    let heavy = "=".repeat(RULE_WIDTH);
    let light = "-".repeat(RULE_WIDTH);

    let mut out = String::new();
    out.push_str(&heavy);
    out.push('\n');
    out.push_str("Learn Copilot - Conversation Log\n");
    out.push_str(&format!("Date: {}\n", at.format("%Y-%m-%d %H:%M:%S")));
    out.push_str(&format!("Messages: {}\n", transcript.len()));
    out.push_str(&heavy);
    out.push_str("\n\n");

    for turn in transcript.iter() {
        out.push_str(&format!("[{}]\n", turn.role.label()));
        out.push_str(&turn.text);
        out.push_str("\n\n");
        out.push_str(&light);
        out.push_str("\n\n");
    }
    out
}
