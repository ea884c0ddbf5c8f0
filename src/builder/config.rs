//! Declarative machine configuration.
//!
//! A configuration has two recognized options: `initial`, the starting state,
//! and `events`, a map of event name to `{ from, to }` where `from` is either
//! a single state or a list of states.
//!
//! ```
//! use switchyard::builder::MachineConfig;
//!
//! let config: MachineConfig<String> = MachineConfig::from_json(r#"{
//!     "initial": "pending",
//!     "events": {
//!         "approve": { "from": "pending", "to": "approved" },
//!         "reject": { "from": ["pending", "approved"], "to": "rejected" }
//!     }
//! }"#).unwrap();
//!
//! assert_eq!(config.initial.as_deref(), Some("pending"));
//! assert_eq!(config.events.len(), 2);
//! ```

use crate::builder::error::ConfigError;
use crate::builder::table::TransitionTableBuilder;
use crate::core::{State, TransitionTable};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::marker::PhantomData;

/// Source states of a configured event: one state or a list of them.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged, bound = "")]
pub enum SourceStates<S: State> {
    One(S),
    Many(Vec<S>),
}

impl<S: State> SourceStates<S> {
    /// Normalize into a list.
    pub fn into_vec(self) -> Vec<S> {
        match self {
            Self::One(state) => vec![state],
            Self::Many(states) => states,
        }
    }
}

/// One configured event.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(bound = "")]
pub struct EventConfig<S: State> {
    pub from: SourceStates<S>,
    pub to: S,
}

/// Machine configuration: initial state plus events in declaration order.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(bound = "")]
pub struct MachineConfig<S: State> {
    #[serde(default)]
    pub initial: Option<S>,
    #[serde(default = "Vec::new", deserialize_with = "ordered_events")]
    pub events: Vec<(String, EventConfig<S>)>,
}

impl<S: State> MachineConfig<S> {
    /// Parse a configuration from JSON text.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Parse a configuration from an already decoded JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        serde_json::from_value(value).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Builder pre-populated with the configured events.
    pub fn table_builder(&self) -> TransitionTableBuilder<S> {
        self.events
            .iter()
            .fold(TransitionTableBuilder::new(), |builder, (name, event)| {
                builder.event(
                    name.clone(),
                    event.from.clone().into_vec(),
                    event.to.clone(),
                )
            })
    }

    /// Validate and build the transition table.
    pub fn table(&self) -> Result<TransitionTable<S>, ConfigError> {
        self.table_builder().build()
    }
}

/// Deserialize a JSON object into a list, keeping document order.
fn ordered_events<'de, S, D>(deserializer: D) -> Result<Vec<(String, EventConfig<S>)>, D::Error>
where
    S: State,
    D: Deserializer<'de>,
{
    struct EventsVisitor<S>(PhantomData<S>);

    impl<'de, S: State> Visitor<'de> for EventsVisitor<S> {
        type Value = Vec<(String, EventConfig<S>)>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a map of event name to { from, to }")
        }

        fn visit_map<M: MapAccess<'de>>(self, mut map: M) -> Result<Self::Value, M::Error> {
            let mut events = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((name, event)) = map.next_entry::<String, EventConfig<S>>()? {
                events.push((name, event));
            }
            Ok(events)
        }
    }

    deserializer.deserialize_map(EventsVisitor(PhantomData))
}
