//! Diagnostic graph export.
//!
//! The export depends only on the transition table, never on a machine's
//! current state.

mod dot;

pub use dot::{to_dot, DotElement, DotOptions, Replacer};
