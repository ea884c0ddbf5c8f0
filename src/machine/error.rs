//! Errors returned by transition attempts.

use thiserror::Error;

/// The machine is not in any of the event's source states.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Cannot transition from {from} via {event}")]
pub struct StateTransitionError {
    pub from: String,
    pub event: String,
}

/// Why a transition attempt was rejected.
///
/// `E` is the error type of the machine's listeners. A listener rejection is
/// carried as-is, and displays exactly like the listener's own error.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransitionError<E> {
    /// The current state is not in the event's source set.
    #[error(transparent)]
    Inaccessible(#[from] StateTransitionError),

    /// No event with this name was declared.
    #[error("Unknown event \"{0}\"")]
    UnknownEvent(String),

    /// A `transition` or event listener rejected.
    #[error("{0}")]
    Listener(E),
}

impl<E> TransitionError<E> {
    pub fn is_inaccessible(&self) -> bool {
        matches!(self, Self::Inaccessible(_))
    }

    pub fn listener_error(&self) -> Option<&E> {
        match self {
            Self::Listener(err) => Some(err),
            _ => None,
        }
    }

    pub fn into_listener_error(self) -> Option<E> {
        match self {
            Self::Listener(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ListenerError;

    #[test]
    fn inaccessible_message_names_state_and_event() {
        let err: TransitionError<ListenerError> = StateTransitionError {
            from: "pending".to_string(),
            event: "pend".to_string(),
        }
        .into();

        assert!(err.is_inaccessible());
        assert_eq!(err.to_string(), "Cannot transition from pending via pend");
    }

    #[test]
    fn listener_errors_display_verbatim() {
        let err = TransitionError::Listener(ListenerError::new("audit log unavailable"));
        assert_eq!(err.to_string(), "audit log unavailable");
        assert_eq!(
            err.into_listener_error(),
            Some(ListenerError::new("audit log unavailable"))
        );
    }

    #[test]
    fn unknown_event_message() {
        let err: TransitionError<ListenerError> = TransitionError::UnknownEvent("launch".to_string());
        assert_eq!(err.to_string(), "Unknown event \"launch\"");
        assert!(err.listener_error().is_none());
    }

    #[test]
    fn any_displayable_listener_error_makes_a_std_error() {
        let err: Box<dyn std::error::Error> =
            Box::new(TransitionError::<&str>::Listener("quota exceeded"));
        assert_eq!(err.to_string(), "quota exceeded");

        let err: Box<dyn std::error::Error> = Box::new(TransitionError::<&str>::UnknownEvent(
            "launch".to_string(),
        ));
        assert!(err.source().is_none());
    }
}
