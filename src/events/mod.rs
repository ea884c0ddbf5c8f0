//! Listener payloads and the publish/subscribe registry.
//!
//! Every transition broadcasts a [`TransitionEvent`] twice: first on
//! [`Channel::Transition`], then on the channel named after the event.

mod registry;

pub use registry::{Channel, ListenerId, ListenerRegistry, TRANSITION_CHANNEL};

use crate::core::State;
use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Payload handed to every listener of a transition attempt.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionEvent<S: State, A> {
    /// Name of the event being fired.
    pub event: String,
    pub from: S,
    pub to: S,
    /// Arguments passed by the caller of the transition.
    pub args: A,
    pub started_at: DateTime<Utc>,
}

impl<S: State, A> TransitionEvent<S, A> {
    /// Time since the transition attempt started.
    pub fn elapsed(&self) -> Duration {
        Utc::now()
            .signed_duration_since(self.started_at)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }
}

/// Message error for listeners that have no error type of their own.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ListenerError {
    message: String,
}

impl ListenerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<&str> for ListenerError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for ListenerError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

/// Stored form of a listener: the returned future is boxed so that listeners
/// written as different closures share one type.
pub type Listener<S, A, R, E> =
    Arc<dyn Fn(TransitionEvent<S, A>) -> BoxFuture<'static, Result<R, E>> + Send + Sync>;
