//! Configuration errors raised while building transition tables and machines.

use thiserror::Error;

/// Errors that can occur when building transition tables and state machines.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("Illegal event name \"{0}\"; can't overwrite property")]
    IllegalEventName(String),

    #[error("Event names must not be empty")]
    EmptyEventName,

    #[error("Event \"{event}\" has no source states")]
    EmptySourceSet { event: String },

    #[error("Event \"{0}\" is declared more than once")]
    DuplicateEvent(String),

    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    #[error("Invalid machine configuration: {0}")]
    Parse(String),

    #[error("{} configuration errors: {}", .0.len(), join(.0))]
    Multiple(Vec<ConfigError>),
}

impl ConfigError {
    /// Flatten into the individual errors.
    pub fn errors(&self) -> Vec<&ConfigError> {
        match self {
            Self::Multiple(errors) => errors.iter().flat_map(|e| e.errors()).collect(),
            other => vec![other],
        }
    }
}

fn join(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
