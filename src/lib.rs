//! Switchyard: an async, event-mediated finite state machine
//!
//! Every transition in a Switchyard machine is an asynchronous operation.
//! Firing an event first notifies the generic transition listeners, then the
//! listeners of that event, waits for all of them, and only then commits the
//! new state. Listener results come back in registration order; any listener
//! rejection cancels the transition and leaves the state untouched.
//!
//! # Core Concepts
//!
//! - **State**: any type implementing the `State` trait (`String` included)
//! - **Transition table**: event name to allowed source states and destination
//! - **Listeners**: async callbacks on the generic transition channel or on a
//!   single event, optionally fired only once
//! - **Graph export**: Graphviz rendering of the table for diagnostics
//!
//! # Example
//!
//! ```rust
//! use switchyard::{ListenerError, StateMachine};
//!
//! # futures::executor::block_on(async {
//! let machine: StateMachine<String> = StateMachine::from_json(r#"{
//!     "initial": "pending",
//!     "events": {
//!         "approve": { "from": "pending", "to": "approved" },
//!         "reject": { "from": ["pending", "approved"], "to": "rejected" },
//!         "pend": { "from": ["approved", "rejected"], "to": "pending" }
//!     }
//! }"#).unwrap();
//!
//! machine.on_transition(|event| async move {
//!     println!("{} -> {} via {}", event.from, event.to, event.event);
//!     Ok::<(), ListenerError>(())
//! });
//!
//! machine.fire("approve", ()).await.unwrap();
//! assert!(machine.is("approved"));
//!
//! let err = machine.fire("approve", ()).await.unwrap_err();
//! assert_eq!(err.to_string(), "Cannot transition from approved via approve");
//! # });
//! ```

pub mod builder;
pub mod core;
pub mod events;
pub mod graph;
pub mod machine;

// Re-export commonly used types
pub use crate::builder::{ConfigError, MachineConfig, StateMachineBuilder, TransitionTableBuilder};
pub use crate::core::{State, TransitionDefinition, TransitionTable};
pub use crate::events::{Channel, ListenerError, ListenerId, TransitionEvent};
pub use crate::graph::{DotElement, DotOptions};
pub use crate::machine::{EventOperation, StateMachine, StateTransitionError, TransitionError};
