//! Builder for constructing state machines.

use crate::builder::config::MachineConfig;
use crate::builder::error::ConfigError;
use crate::builder::table::TransitionTableBuilder;
use crate::core::State;
use crate::events::ListenerError;
use crate::machine::StateMachine;
use std::marker::PhantomData;

/// Builder for constructing state machines with a fluent API.
pub struct StateMachineBuilder<S: State, A = (), R = (), E = ListenerError> {
    initial: Option<S>,
    table: TransitionTableBuilder<S>,
    _phantom: PhantomData<fn() -> (A, R, E)>,
}

impl<S, A, R, E> StateMachineBuilder<S, A, R, E>
where
    S: State + 'static,
    A: Clone + Send + Sync + 'static,
    R: Send + 'static,
    E: Send + 'static,
{
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            initial: None,
            table: TransitionTableBuilder::new(),
            _phantom: PhantomData,
        }
    }

    /// Start from a declarative configuration.
    pub fn from_config(config: MachineConfig<S>) -> Self {
        Self {
            table: config.table_builder(),
            initial: config.initial,
            _phantom: PhantomData,
        }
    }

    /// Set the initial state (required).
    pub fn initial(mut self, state: impl Into<S>) -> Self {
        self.initial = Some(state.into());
        self
    }

    /// Declare an event. See [`TransitionTableBuilder::event`].
    pub fn event<I, T>(mut self, name: impl Into<String>, from: I, to: impl Into<S>) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<S>,
    {
        self.table = self.table.event(name, from, to);
        self
    }

    /// Replace the declared events with a prepared table builder.
    pub fn table(mut self, table: TransitionTableBuilder<S>) -> Self {
        self.table = table;
        self
    }

    /// Build the state machine.
    ///
    /// Table problems are reported before a missing initial state, so a bad
    /// event name is named even in an incomplete configuration.
    pub fn build(self) -> Result<StateMachine<S, A, R, E>, ConfigError> {
        let table = self.table.build()?;
        let initial = self.initial.ok_or(ConfigError::MissingInitialState)?;

        Ok(StateMachine::new(initial, table))
    }
}

impl<S, A, R, E> Default for StateMachineBuilder<S, A, R, E>
where
    S: State + 'static,
    A: Clone + Send + Sync + 'static,
    R: Send + 'static,
    E: Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
