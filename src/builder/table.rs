//! Builder for transition tables.
//!
//! Validation uses Stillwater's `Validation` so that every problem in a table
//! is reported at once instead of one per build attempt.

use crate::builder::error::ConfigError;
use crate::core::{State, TransitionDefinition, TransitionTable};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Names that belong to the engine's own surface and cannot name an event.
pub const RESERVED_EVENT_NAMES: &[&str] = &[
    "is",
    "can",
    "state",
    "fire",
    "transition",
    "on",
    "once",
    "on_transition",
    "once_transition",
    "off",
    "listener_count",
    "remove_all_listeners",
    "operation",
    "operations",
    "table",
    "to_dot",
    "emit",
    "listeners",
    "remove_listener",
];

/// Check whether `name` is reserved by the engine.
pub fn is_reserved(name: &str) -> bool {
    RESERVED_EVENT_NAMES.contains(&name)
}

type Check = Validation<(), NonEmptyVec<ConfigError>>;

/// Builder for [`TransitionTable`]s with a fluent API.
///
/// # Example
///
/// ```
/// use switchyard::builder::TransitionTableBuilder;
///
/// let table = TransitionTableBuilder::<String>::new()
///     .event("approve", ["pending"], "approved")
///     .event("reject", ["pending", "approved"], "rejected")
///     .build()
///     .unwrap();
///
/// assert_eq!(table.len(), 2);
/// assert_eq!(table.get("reject").unwrap().from().len(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct TransitionTableBuilder<S: State> {
    events: Vec<(String, Vec<S>, S)>,
}

impl<S: State> TransitionTableBuilder<S> {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Declare an event firing from any of `from` and leading to `to`.
    ///
    /// A single source state is written as a one-element array.
    pub fn event<I, T>(mut self, name: impl Into<String>, from: I, to: impl Into<S>) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<S>,
    {
        self.events.push((
            name.into(),
            from.into_iter().map(Into::into).collect(),
            to.into(),
        ));
        self
    }

    /// Validate every declared event, accumulating ALL problems.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<ConfigError>> {
        let mut checks: Vec<Check> = Vec::new();

        for (index, (name, from, _)) in self.events.iter().enumerate() {
            checks.push(check_name(name));

            if from.is_empty() {
                checks.push(Validation::fail(ConfigError::EmptySourceSet {
                    event: name.clone(),
                }));
            }

            let declared_earlier = self.events[..index].iter().any(|(other, _, _)| other == name);
            if declared_earlier {
                checks.push(Validation::fail(ConfigError::DuplicateEvent(name.clone())));
            }
        }

        Validation::all_vec(checks).map(|_| ())
    }

    /// Build the table.
    ///
    /// One problem is returned as itself, several as [`ConfigError::Multiple`].
    pub fn build(self) -> Result<TransitionTable<S>, ConfigError> {
        if let Validation::Failure(errors) = self.validate() {
            let mut errors: Vec<ConfigError> = errors.iter().cloned().collect();
            return Err(if errors.len() == 1 {
                errors.remove(0)
            } else {
                ConfigError::Multiple(errors)
            });
        }

        let entries = self
            .events
            .into_iter()
            .map(|(name, from, to)| (name, TransitionDefinition::new(from, to)))
            .collect();

        Ok(TransitionTable::from_entries(entries))
    }
}

impl<S: State> Default for TransitionTableBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}

fn check_name(name: &str) -> Check {
    if name.is_empty() {
        Validation::fail(ConfigError::EmptyEventName)
    } else if is_reserved(name) {
        Validation::fail(ConfigError::IllegalEventName(name.to_string()))
    } else {
        Validation::success(())
    }
}
