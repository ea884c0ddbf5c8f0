//! Per-event operations.

use crate::core::{State, TransitionDefinition};
use crate::machine::engine::StateMachine;
use crate::machine::error::TransitionError;
use std::future::Future;

/// Callable operation for one declared event, bound to its name, source set
/// and destination when the machine was built.
///
/// Obtained from [`StateMachine::operation`] or [`StateMachine::operations`].
pub struct EventOperation<'m, S: State, A, R, E> {
    machine: &'m StateMachine<S, A, R, E>,
    name: &'m str,
    definition: &'m TransitionDefinition<S>,
}

impl<'m, S, A, R, E> EventOperation<'m, S, A, R, E>
where
    S: State + 'static,
    A: Clone + Send + Sync + 'static,
    R: Send + 'static,
    E: Send + 'static,
{
    pub(crate) fn new(
        machine: &'m StateMachine<S, A, R, E>,
        name: &'m str,
        definition: &'m TransitionDefinition<S>,
    ) -> Self {
        Self {
            machine,
            name,
            definition,
        }
    }

    pub fn name(&self) -> &'m str {
        self.name
    }

    pub fn from(&self) -> &'m [S] {
        self.definition.from()
    }

    pub fn to(&self) -> &'m S {
        self.definition.to()
    }

    /// Whether the machine's current state allows this event.
    pub fn can(&self) -> bool {
        self.machine.can(self.name)
    }

    /// Attempt the transition. Resolves with the event listeners' results.
    ///
    /// Same protocol as [`StateMachine::fire`].
    pub fn fire(
        &self,
        args: A,
    ) -> impl Future<Output = Result<Vec<R>, TransitionError<E>>> + Send + 'm {
        self.machine.run_transition(self.name, self.definition, args)
    }
}

impl<S: State, A, R, E> Clone for EventOperation<'_, S, A, R, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: State, A, R, E> Copy for EventOperation<'_, S, A, R, E> {}
