//! Widget refresh signal.
//!
//! After every successful write to the shared store the mutating code calls
//! [`RefreshSignal::notify`] so the widget dashboard re-reads the store and
//! re-renders. Delivery is best effort: having nobody listening is normal, and a
//! listener that falls behind only needs the newest state anyway. The dashboard also
//! re-renders on its own timer, so a lost signal only delays an update.

use tokio::sync::broadcast;
use tracing::{debug, trace};
use uuid::Uuid;

/// Why the store changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshReason {
    /// A habit was created
    HabitCreated {
        /// New habit id
        habit_id: Uuid,
    },
    /// A habit's attributes were edited
    HabitUpdated {
        /// Edited habit id
        habit_id: Uuid,
    },
    /// A habit and all of its completions were removed
    HabitDeleted {
        /// Removed habit id
        habit_id: Uuid,
    },
    /// A completion was added for, or all completions removed from, one day
    CompletionToggled {
        /// Habit whose progress changed
        habit_id: Uuid,
    },
    /// Several habits were created at once (onboarding, sample data)
    HabitsSeeded {
        /// Number of habits created
        count: usize,
    },
    /// Every habit and completion was removed
    DataReset,
}

/// Broadcast handle shared by all writers and the widget dashboard.
#[derive(Debug, Clone)]
pub struct RefreshSignal {
    sender: broadcast::Sender<RefreshReason>,
}

impl RefreshSignal {
    /// Create a new signal with default capacity
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    /// Create a new signal with the given channel capacity
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Fire-and-forget notification that the store changed.
    ///
    /// Must only be called after the write has been committed.
    pub fn notify(&self, reason: RefreshReason) {
        match self.sender.send(reason) {
            Ok(receivers) => debug!(receivers, "Widget refresh requested"),
            Err(broadcast::error::SendError(reason)) => {
                trace!(?reason, "Widget refresh requested with no listener");
            }
        }
    }

    /// Subscribe to refresh requests
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<RefreshReason> {
        self.sender.subscribe()
    }

    /// Number of active listeners
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for RefreshSignal {
    fn default() -> Self {
        Self::new()
    }
}
