//! The transition engine.
//!
//! A [`StateMachine`] owns its current state, an immutable transition table
//! and a listener registry. Every transition runs the same protocol:
//!
//! 1. check the current state against the event's source set
//! 2. broadcast to the generic transition listeners and wait for all of them
//! 3. broadcast to the event's listeners and wait for all of them
//! 4. commit the destination state and return the event listener results
//!
//! A failure at any step leaves the state untouched.

mod engine;
mod error;
mod operation;

pub use engine::StateMachine;
pub use error::{StateTransitionError, TransitionError};
pub use operation::EventOperation;
