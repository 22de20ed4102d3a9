//! Change notifications emitted after successful mutations.
//!
//! The event store and the tag registry each own a `ChangeFeed`. Front ends
//! subscribe to it to know when the month grid, the day list or the tag
//! selectors need to be redrawn.

use std::fmt;

/// What changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    EventCreated(String),
    EventUpdated(String),
    EventDeleted(String),
    TagsChanged,
}

type Listener = Box<dyn FnMut(&Change)>;

#[derive(Default)]
pub struct ChangeFeed {
    listeners: Vec<Listener>,
}

impl ChangeFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&Change) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn emit(&mut self, change: Change) {
        for listener in &mut self.listeners {
            listener(&change);
        }
    }
}

impl fmt::Debug for ChangeFeed {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ChangeFeed")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
