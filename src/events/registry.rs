//! Listener registry keyed by channel.

use std::collections::HashMap;
use std::fmt;

/// Where a listener is attached.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Generic channel notified before the event-specific one on every transition.
    Transition,
    /// Channel of a single named event.
    Event(String),
}

/// Name under which the generic channel is addressed by string.
pub const TRANSITION_CHANNEL: &str = "transition";

impl Channel {
    pub fn event(name: impl Into<String>) -> Self {
        Self::Event(name.into())
    }

    /// Channel addressed by `name`: `"transition"` is the generic channel,
    /// anything else is the event of that name.
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        if name == TRANSITION_CHANNEL {
            Self::Transition
        } else {
            Self::Event(name)
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transition => f.write_str(TRANSITION_CHANNEL),
            Self::Event(name) => f.write_str(name),
        }
    }
}

/// Handle returned on registration, used to remove the listener again.
///
/// Ids grow with registration order across all channels of one registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

#[derive(Clone)]
struct Entry<L> {
    id: ListenerId,
    once: bool,
    listener: L,
}

/// Ordered listener lists per channel.
///
/// `L` is the stored callback; the engine stores `Arc`ed closures so that a
/// broadcast can release the registry before awaiting anything.
pub struct ListenerRegistry<L> {
    next_id: u64,
    channels: HashMap<Channel, Vec<Entry<L>>>,
}

impl<L: Clone> ListenerRegistry<L> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            channels: HashMap::new(),
        }
    }

    /// Append a listener to `channel`.
    pub fn add(&mut self, channel: Channel, listener: L, once: bool) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.channels.entry(channel).or_default().push(Entry { id, once, listener });
        id
    }

    /// Remove one listener. Returns false if it was already gone.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        for entries in self.channels.values_mut() {
            if let Some(position) = entries.iter().position(|e| e.id == id) {
                entries.remove(position);
                return true;
            }
        }
        false
    }

    /// Remove every listener on `channel`, or on all channels when `None`.
    pub fn clear(&mut self, channel: Option<&Channel>) {
        match channel {
            Some(channel) => {
                self.channels.remove(channel);
            }
            None => self.channels.clear(),
        }
    }

    pub fn count(&self, channel: &Channel) -> usize {
        self.channels.get(channel).map_or(0, Vec::len)
    }

    /// Snapshot the listeners of `channel` in registration order for one
    /// broadcast, dropping once-flagged entries from the registry.
    pub fn take_for_broadcast(&mut self, channel: &Channel) -> Vec<L> {
        let Some(entries) = self.channels.get_mut(channel) else {
            return Vec::new();
        };

        let snapshot = entries.iter().map(|e| e.listener.clone()).collect();
        entries.retain(|e| !e.once);
        snapshot
    }
}

impl<L: Clone> Default for ListenerRegistry<L> {
    fn default() -> Self {
        Self::new()
    }
}
