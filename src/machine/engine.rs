//! State machine that dispatches transitions through listener rounds.

use crate::builder::{ConfigError, MachineConfig, StateMachineBuilder};
use crate::core::{State, TransitionDefinition, TransitionTable};
use crate::events::{
    Channel, Listener, ListenerError, ListenerId, ListenerRegistry, TransitionEvent,
};
use crate::graph::{self, DotOptions};
use crate::machine::error::{StateTransitionError, TransitionError};
use crate::machine::operation::EventOperation;
use chrono::Utc;
use futures::future::{try_join_all, BoxFuture, TryJoinAll};
use futures::FutureExt;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use tracing::{debug, warn};

/// Finite state machine whose transitions are asynchronous, listener-mediated
/// operations.
///
/// Type parameters:
/// - `S`: state token
/// - `A`: arguments passed by the caller of a transition to every listener
/// - `R`: value each listener resolves with
/// - `E`: error a listener rejects with
///
/// Firing an event checks the current state against the event's source set,
/// broadcasts to [`Channel::Transition`] listeners, then to the listeners of
/// the event itself, and commits the destination state only when every
/// listener of both rounds succeeded. The result is the list of event
/// listener results in registration order.
///
/// Transitions are not serialized. Two attempts started before either commits
/// both check `can` against the same state and the last one to finish decides
/// the final state.
///
/// # Example
///
/// ```
/// use switchyard::builder::StateMachineBuilder;
/// use switchyard::machine::StateMachine;
/// use switchyard::ListenerError;
///
/// # futures::executor::block_on(async {
/// let machine: StateMachine<String, (), &'static str> = StateMachineBuilder::new()
///     .initial("pending")
///     .event("approve", ["pending"], "approved")
///     .event("reject", ["pending", "approved"], "rejected")
///     .build()
///     .unwrap();
///
/// machine.on("approve", |event| async move {
///     assert_eq!(event.from, "pending");
///     Ok::<_, ListenerError>("notified")
/// });
///
/// let results = machine.fire("approve", ()).await.unwrap();
/// assert_eq!(results, vec!["notified"]);
/// assert!(machine.is("approved"));
/// # });
/// ```
pub struct StateMachine<S: State, A = (), R = (), E = ListenerError> {
    current: RwLock<S>,
    table: TransitionTable<S>,
    listeners: Mutex<ListenerRegistry<Listener<S, A, R, E>>>,
}

impl<S, A, R, E> StateMachine<S, A, R, E>
where
    S: State + 'static,
    A: Clone + Send + Sync + 'static,
    R: Send + 'static,
    E: Send + 'static,
{
    /// Create a machine in `initial` over an already validated table.
    pub fn new(initial: S, table: TransitionTable<S>) -> Self {
        Self {
            current: RwLock::new(initial),
            table,
            listeners: Mutex::new(ListenerRegistry::new()),
        }
    }

    /// Start a fluent builder.
    pub fn builder() -> StateMachineBuilder<S, A, R, E> {
        StateMachineBuilder::new()
    }

    /// Build a machine from a declarative configuration.
    pub fn from_config(config: MachineConfig<S>) -> Result<Self, ConfigError> {
        StateMachineBuilder::from_config(config).build()
    }

    /// Build a machine from a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Self::from_config(MachineConfig::from_json(json)?)
    }

    /// Current state.
    pub fn state(&self) -> S {
        self.current.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Whether `candidate` is the current state.
    pub fn is<Q>(&self, candidate: &Q) -> bool
    where
        S: PartialEq<Q>,
        Q: ?Sized,
    {
        *self.current.read().unwrap_or_else(PoisonError::into_inner) == *candidate
    }

    /// Whether `event` may fire from the current state.
    ///
    /// Undeclared events are never accessible.
    pub fn can(&self, event: &str) -> bool {
        self.table
            .get(event)
            .is_some_and(|definition| definition.allows(&self.state()))
    }

    pub fn table(&self) -> &TransitionTable<S> {
        &self.table
    }

    /// Operation bound to `event`, if declared.
    pub fn operation(&self, event: &str) -> Option<EventOperation<'_, S, A, R, E>> {
        self.table
            .entry(event)
            .map(|(name, definition)| EventOperation::new(self, name, definition))
    }

    /// All operations in declaration order.
    pub fn operations(&self) -> impl Iterator<Item = EventOperation<'_, S, A, R, E>> {
        self.table
            .iter()
            .map(move |(name, definition)| EventOperation::new(self, name, definition))
    }

    /// Fire `event` with `args`.
    ///
    /// The source-state check and the start of the generic round happen
    /// when `fire` is called; the returned future drives the rest.
    ///
    /// Resolves with the results of the event's own listeners, in the order
    /// they were registered. Rejects without changing state when the event is
    /// unknown, when the current state is not one of its sources, or when any
    /// listener of either round rejects.
    pub fn fire(
        &self,
        event: &str,
        args: A,
    ) -> impl Future<Output = Result<Vec<R>, TransitionError<E>>> + Send + '_ {
        let started = match self.table.entry(event) {
            Some((name, definition)) => self.begin(name, definition, args),
            None => Err(TransitionError::UnknownEvent(event.to_string())),
        };

        self.drive(started)
    }

    pub(crate) fn run_transition<'m>(
        &'m self,
        event: &'m str,
        definition: &TransitionDefinition<S>,
        args: A,
    ) -> impl Future<Output = Result<Vec<R>, TransitionError<E>>> + Send + 'm {
        self.drive(self.begin(event, definition, args))
    }

    fn drive<'m>(
        &'m self,
        started: Result<PendingTransition<'m, S, A, R, E>, TransitionError<E>>,
    ) -> impl Future<Output = Result<Vec<R>, TransitionError<E>>> + Send + 'm {
        async move {
            match started {
                Ok(pending) => self.finish(pending).await,
                Err(err) => Err(err),
            }
        }
    }

    /// Check the source set against the current state and start the generic
    /// round.
    fn begin<'m>(
        &self,
        event: &'m str,
        definition: &TransitionDefinition<S>,
        args: A,
    ) -> Result<PendingTransition<'m, S, A, R, E>, TransitionError<E>> {
        let from = self.state();

        if !definition.allows(&from) {
            debug!(event, from = from.name(), "transition not allowed from current state");
            return Err(StateTransitionError {
                from: from.name().to_string(),
                event: event.to_string(),
            }
            .into());
        }

        let to = definition.to().clone();
        debug!(event, from = from.name(), to = to.name(), "transition started");

        let payload = TransitionEvent {
            event: event.to_string(),
            from,
            to,
            args,
            started_at: Utc::now(),
        };
        let generic_round = self.start_round(&Channel::Transition, &payload);

        Ok(PendingTransition {
            event,
            payload,
            generic_round,
        })
    }

    /// Await the generic round, run the event round, then commit.
    async fn finish(
        &self,
        pending: PendingTransition<'_, S, A, R, E>,
    ) -> Result<Vec<R>, TransitionError<E>> {
        let PendingTransition {
            event,
            payload,
            generic_round,
        } = pending;

        generic_round
            .await
            .map_err(|err| rejected(&Channel::Transition, &payload, err))?;

        let channel = Channel::event(event);
        let results = self
            .start_round(&channel, &payload)
            .await
            .map_err(|err| rejected(&channel, &payload, err))?;

        *self.current.write().unwrap_or_else(PoisonError::into_inner) = payload.to.clone();

        debug!(
            event,
            from = payload.from.name(),
            to = payload.to.name(),
            elapsed_ms = payload.elapsed().as_millis() as u64,
            "transition committed"
        );

        Ok(results)
    }

    /// Invoke every listener of `channel` now; the returned join resolves
    /// with their results in registration order or with the first rejection.
    fn start_round(&self, channel: &Channel, payload: &TransitionEvent<S, A>) -> Round<R, E> {
        let listeners = self.registry().take_for_broadcast(channel);
        try_join_all(
            listeners
                .iter()
                .map(|listener| listener(payload.clone()))
                .collect::<Vec<_>>(),
        )
    }

    /// Register a listener for `event`.
    ///
    /// The name `"transition"` registers on the generic channel, like
    /// [`on_transition`](Self::on_transition).
    pub fn on<F, Fut>(&self, event: impl Into<String>, listener: F) -> ListenerId
    where
        F: Fn(TransitionEvent<S, A>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, E>> + Send + 'static,
    {
        self.subscribe(Channel::named(event), listener, false)
    }

    /// Register a listener for `event` that is removed after its first call.
    pub fn once<F, Fut>(&self, event: impl Into<String>, listener: F) -> ListenerId
    where
        F: Fn(TransitionEvent<S, A>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, E>> + Send + 'static,
    {
        self.subscribe(Channel::named(event), listener, true)
    }

    /// Register a listener notified of every transition, before the event's
    /// own listeners. Its results are not returned to the caller.
    pub fn on_transition<F, Fut>(&self, listener: F) -> ListenerId
    where
        F: Fn(TransitionEvent<S, A>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, E>> + Send + 'static,
    {
        self.subscribe(Channel::Transition, listener, false)
    }

    pub fn once_transition<F, Fut>(&self, listener: F) -> ListenerId
    where
        F: Fn(TransitionEvent<S, A>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, E>> + Send + 'static,
    {
        self.subscribe(Channel::Transition, listener, true)
    }

    /// Register a listener on any channel.
    pub fn subscribe<F, Fut>(&self, channel: Channel, listener: F, once: bool) -> ListenerId
    where
        F: Fn(TransitionEvent<S, A>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, E>> + Send + 'static,
    {
        if let Channel::Event(name) = &channel {
            if !self.table.contains(name) {
                debug!(event = name.as_str(), "listener registered for undeclared event");
            }
        }

        let listener: Listener<S, A, R, E> = Arc::new(move |event: TransitionEvent<S, A>| listener(event).boxed());
        self.registry().add(channel, listener, once)
    }

    /// Remove a listener. Returns false if it was already removed.
    pub fn off(&self, id: ListenerId) -> bool {
        self.registry().remove(id)
    }

    pub fn listener_count(&self, channel: &Channel) -> usize {
        self.registry().count(channel)
    }

    /// Remove the listeners of `channel`, or of every channel when `None`.
    pub fn remove_all_listeners(&self, channel: Option<&Channel>) {
        self.registry().clear(channel)
    }

    /// Render the transition table as a Graphviz digraph.
    ///
    /// Returns `None` when no events are declared.
    pub fn to_dot(&self, options: &DotOptions) -> Option<String> {
        graph::to_dot(&self.table, options)
    }

    fn registry(&self) -> MutexGuard<'_, ListenerRegistry<Listener<S, A, R, E>>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Join over one broadcast round.
type Round<R, E> = TryJoinAll<BoxFuture<'static, Result<R, E>>>;

/// A transition that passed its source-state check and whose generic round
/// has started.
struct PendingTransition<'m, S: State, A, R, E> {
    event: &'m str,
    payload: TransitionEvent<S, A>,
    generic_round: Round<R, E>,
}

fn rejected<S: State, A, E>(
    channel: &Channel,
    payload: &TransitionEvent<S, A>,
    err: E,
) -> TransitionError<E> {
    warn!(
        event = payload.event.as_str(),
        channel = %channel,
        from = payload.from.name(),
        to = payload.to.name(),
        "listener rejected transition"
    );
    TransitionError::Listener(err)
}

impl<S: State, A, R, E> fmt::Debug for StateMachine<S, A, R, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field(
                "state",
                &*self.current.read().unwrap_or_else(PoisonError::into_inner),
            )
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}
