//! Core state machine types.
//!
//! This module contains the pure data the engine works on:
//! - State tokens via the `State` trait
//! - The immutable transition table and its derived queries
//!
//! Nothing in this module performs I/O or dispatches listeners.

mod state;
mod table;

pub use state::State;
pub use table::{TransitionDefinition, TransitionTable};
