//! Builder API for transition tables and state machines.
//!
//! Tables can be declared with fluent builders or loaded from a declarative
//! configuration. Either way they are validated before any machine exists:
//! a table that fails validation never produces an engine.

pub mod config;
pub mod error;
pub mod machine;
pub mod macros;
pub mod table;

pub use config::{EventConfig, MachineConfig, SourceStates};
pub use error::ConfigError;
pub use machine::StateMachineBuilder;
pub use table::{is_reserved, TransitionTableBuilder, RESERVED_EVENT_NAMES};
