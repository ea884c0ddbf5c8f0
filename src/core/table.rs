//! Immutable transition table.
//!
//! A table maps event names to the set of states an event may fire from and
//! the single state it leads to. Tables are produced by
//! [`TransitionTableBuilder`](crate::builder::TransitionTableBuilder) and never
//! change afterwards.

use super::state::State;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Allowed source states and destination of one event.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(bound = "")]
pub struct TransitionDefinition<S: State> {
    from: Vec<S>,
    to: S,
}

impl<S: State> TransitionDefinition<S> {
    /// Sources are deduplicated, first appearance wins.
    pub(crate) fn new(from: Vec<S>, to: S) -> Self {
        let mut unique: Vec<S> = Vec::with_capacity(from.len());
        for state in from {
            if !unique.contains(&state) {
                unique.push(state);
            }
        }
        Self { from: unique, to }
    }

    /// States this event may fire from.
    pub fn from(&self) -> &[S] {
        &self.from
    }

    /// State this event leads to.
    pub fn to(&self) -> &S {
        &self.to
    }

    /// Check whether the event may fire while the machine is in `state` (pure).
    pub fn allows(&self, state: &S) -> bool {
        self.from.contains(state)
    }
}

/// Ordered, immutable mapping of event name to [`TransitionDefinition`].
///
/// Declaration order is kept: it decides edge order in graph output and the
/// order of [`operations`](crate::machine::StateMachine::operations).
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionTable<S: State> {
    events: Vec<(String, TransitionDefinition<S>)>,
}

impl<S: State> TransitionTable<S> {
    pub(crate) fn from_entries(events: Vec<(String, TransitionDefinition<S>)>) -> Self {
        Self { events }
    }

    /// Table with no events. Every `can` check against it is false.
    pub fn empty() -> Self {
        Self { events: Vec::new() }
    }

    pub fn get(&self, event: &str) -> Option<&TransitionDefinition<S>> {
        self.entry(event).map(|(_, definition)| definition)
    }

    /// Name and definition of `event`, with the name borrowed from the table.
    pub(crate) fn entry(&self, event: &str) -> Option<(&str, &TransitionDefinition<S>)> {
        self.events
            .iter()
            .find(|(name, _)| name == event)
            .map(|(name, definition)| (name.as_str(), definition))
    }

    pub fn contains(&self, event: &str) -> bool {
        self.get(event).is_some()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Iterate events in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TransitionDefinition<S>)> {
        self.events
            .iter()
            .map(|(name, definition)| (name.as_str(), definition))
    }

    pub fn event_names(&self) -> impl Iterator<Item = &str> {
        self.events.iter().map(|(name, _)| name.as_str())
    }

    /// Every state mentioned by the table, in first-appearance order.
    ///
    /// For each event the sources come before the destination.
    pub fn states(&self) -> Vec<&S> {
        let mut states: Vec<&S> = Vec::new();
        for (_, definition) in &self.events {
            for state in definition.from.iter().chain(std::iter::once(&definition.to)) {
                if !states.contains(&state) {
                    states.push(state);
                }
            }
        }
        states
    }

    /// Destinations that never appear as a source of any event.
    ///
    /// Order follows the first event leading to each state.
    pub fn accepting_states(&self) -> Vec<&S> {
        let mut accepting: Vec<&S> = Vec::new();
        for (_, definition) in &self.events {
            let to = &definition.to;
            let is_source = self.events.iter().any(|(_, d)| d.allows(to));
            if !is_source && !accepting.contains(&to) {
                accepting.push(to);
            }
        }
        accepting
    }
}

impl<S: State> Default for TransitionTable<S> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<S: State> Serialize for TransitionTable<S> {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        let mut map = serializer.serialize_map(Some(self.events.len()))?;
        for (name, definition) in &self.events {
            map.serialize_entry(name, definition)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(from: &[&str], to: &str) -> TransitionDefinition<String> {
        TransitionDefinition::new(
            from.iter().map(|s| s.to_string()).collect(),
            to.to_string(),
        )
    }

    fn traffic_light(with_calm: bool) -> TransitionTable<String> {
        let mut events = vec![
            ("warn".to_string(), def(&["green"], "yellow")),
            ("panic".to_string(), def(&["yellow"], "red")),
        ];
        if with_calm {
            events.push(("calm".to_string(), def(&["red"], "yellow")));
        }
        events.push(("clear".to_string(), def(&["yellow"], "green")));
        TransitionTable::from_entries(events)
    }

    #[test]
    fn definition_deduplicates_sources() {
        let definition = def(&["a", "b", "a"], "c");
        assert_eq!(definition.from(), &["a".to_string(), "b".to_string()]);
        assert!(definition.allows(&"b".to_string()));
        assert!(!definition.allows(&"c".to_string()));
    }

    #[test]
    fn lookup_by_event_name() {
        let table = traffic_light(true);
        assert_eq!(table.len(), 4);
        assert!(table.contains("calm"));
        assert!(!table.contains("explode"));
        assert_eq!(table.get("panic").unwrap().to(), "red");
    }

    #[test]
    fn iteration_keeps_declaration_order() {
        let table = traffic_light(true);
        let names: Vec<&str> = table.event_names().collect();
        assert_eq!(names, vec!["warn", "panic", "calm", "clear"]);
    }

    #[test]
    fn states_are_collected_in_first_appearance_order() {
        let table = traffic_light(true);
        let states: Vec<&str> = table.states().into_iter().map(|s| s.as_str()).collect();
        assert_eq!(states, vec!["green", "yellow", "red"]);
    }

    #[test]
    fn cyclic_table_has_no_accepting_states() {
        assert!(traffic_light(true).accepting_states().is_empty());
    }

    #[test]
    fn sink_state_is_accepting() {
        let table = traffic_light(false);
        let accepting: Vec<&str> = table
            .accepting_states()
            .into_iter()
            .map(|s| s.as_str())
            .collect();
        assert_eq!(accepting, vec!["red"]);
    }

    #[test]
    fn empty_table_reports_nothing() {
        let table: TransitionTable<String> = TransitionTable::empty();
        assert!(table.is_empty());
        assert!(table.states().is_empty());
        assert!(table.accepting_states().is_empty());
    }

    #[test]
    fn table_serializes_as_ordered_map() {
        let table = TransitionTable::from_entries(vec![
            ("approve".to_string(), def(&["pending"], "approved")),
            ("reject".to_string(), def(&["pending", "approved"], "rejected")),
        ]);
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(
            json,
            r#"{"approve":{"from":["pending"],"to":"approved"},"reject":{"from":["pending","approved"],"to":"rejected"}}"#
        );
    }
}
