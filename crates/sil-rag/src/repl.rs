//! Interactive command loop support: command parsing and answer rendering

use crate::types::Answer;

/// One line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// Leave the loop
    Quit,
    /// Append citations to answers
    SourcesOn,
    /// Stop appending citations
    SourcesOff,
    /// Blank line
    Empty,
    /// A question for the pipeline
    Ask(String),
}

impl ReplCommand {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        match trimmed.to_lowercase().as_str() {
            "" => Self::Empty,
            "q" | "quit" | "exit" => Self::Quit,
            "sources on" | "/sources on" | "/show sources on" => Self::SourcesOn,
            "sources off" | "/sources off" | "/show sources off" => Self::SourcesOff,
            _ => Self::Ask(trimmed.to_string()),
        }
    }
}

/// Per-session display state
#[derive(Debug, Clone, Default)]
pub struct ReplSession {
    show_sources: bool,
}

impl ReplSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show_sources(&self) -> bool {
        self.show_sources
    }

    /// Apply a toggle command; returns the confirmation to print, if any
    pub fn apply(&mut self, command: &ReplCommand) -> Option<&'static str> {
        match command {
            ReplCommand::SourcesOn => {
                self.show_sources = true;
                Some("Citations ON.")
            }
            ReplCommand::SourcesOff => {
                self.show_sources = false;
                Some("Citations OFF.")
            }
            _ => None,
        }
    }

    /// Answer text, followed by a `Sources:` block when enabled and available
    pub fn render(&self, answer: &Answer) -> String {
        let mut out = answer.answer.trim_end().to_string();
        if self.show_sources && !answer.sources.is_empty() {
            out.push_str("\n\nSources:\n");
            out.push_str(&answer.sources.join("\n"));
        }
        out
    }
}
