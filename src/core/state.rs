//! Core State trait for state machine states.
//!
//! States are opaque, comparable tokens. The engine never enumerates them up
//! front: any value of a `State` type is a legal state, and the set of states
//! a machine knows about is whatever appears in its transition table.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for state machine states.
///
/// # Required Traits
///
/// - `Clone`: the engine hands copies of states to listeners
/// - `PartialEq`: states must be comparable for `is` and `can`
/// - `Debug`: states must be debuggable for diagnostics
/// - `Serialize` + `Deserialize`: states must load from configuration
///
/// `String` implements `State`, which gives an open state set where any token
/// is valid. Closed sets are usually declared with [`state_enum!`](crate::state_enum).
///
/// # Example
///
/// ```rust
/// use switchyard::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum Light {
///     Green,
///     Yellow,
///     Red,
/// }
///
/// impl State for Light {
///     fn name(&self) -> &str {
///         match self {
///             Self::Green => "green",
///             Self::Yellow => "yellow",
///             Self::Red => "red",
///         }
///     }
/// }
///
/// assert_eq!(Light::Yellow.name(), "yellow");
/// assert_eq!("pending".to_string().name(), "pending");
/// ```
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Name used in error messages, logs and graph output.
    fn name(&self) -> &str;
}

impl State for String {
    fn name(&self) -> &str {
        self.as_str()
    }
}
