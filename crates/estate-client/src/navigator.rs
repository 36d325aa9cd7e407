//! Hard-navigation seam.

use std::sync::{PoisonError, RwLock};

use tokio::sync::mpsc;
use tracing::debug;

/// A hard navigation requested by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    /// Target path plus query.
    pub target: String,
}

/// Where the runtime is and how it leaves.
pub trait Navigator: Send + Sync + std::fmt::Debug + 'static {
    /// Current location as path plus query.
    fn current_location(&self) -> String;

    /// Leaves the current location for `target`, discarding in-memory state.
    fn navigate(&self, target: &str);
}

/// [`Navigator`] that reports navigations over a channel.
///
/// The embedding application drains the receiver and performs the actual
/// page load.
#[derive(Debug)]
pub struct ChannelNavigator {
    location: RwLock<String>,
    events: mpsc::UnboundedSender<Navigation>,
}

impl ChannelNavigator {
    /// Creates a navigator positioned at `location`.
    pub fn new(location: impl Into<String>) -> (Self, mpsc::UnboundedReceiver<Navigation>) {
        let (events, rx) = mpsc::unbounded_channel();
        let navigator = Self {
            location: RwLock::new(location.into()),
            events,
        };
        (navigator, rx)
    }

    /// Records an in-app location change.
    pub fn set_location(&self, location: impl Into<String>) {
        *self.location.write().unwrap_or_else(PoisonError::into_inner) = location.into();
    }
}

impl Navigator for ChannelNavigator {
    fn current_location(&self) -> String {
        self.location
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn navigate(&self, target: &str) {
        self.set_location(target);
        if self
            .events
            .send(Navigation {
                target: target.to_string(),
            })
            .is_err()
        {
            debug!(target, "Navigation receiver dropped");
        }
    }
}
