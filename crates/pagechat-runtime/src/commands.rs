//! Slash commands handled locally, never sent to the model.

use crate::language::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Clear,
    Help,
    Status,
}

impl Command {
    /// Recognize a command in raw user input.
    ///
    /// Returns the command and the language implied by the alias used.
    pub fn parse(input: &str) -> Option<(Command, Language)> {
        match input.trim().to_lowercase().as_str() {
            "/clear" => Some((Self::Clear, Language::En)),
            "/pulisci" => Some((Self::Clear, Language::It)),
            "/help" => Some((Self::Help, Language::En)),
            "/aiuto" => Some((Self::Help, Language::It)),
            "/status" => Some((Self::Status, Language::En)),
            "/stato" => Some((Self::Status, Language::It)),
            _ => None,
        }
    }
}
