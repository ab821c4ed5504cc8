//! Notifications
//!
//! Fire-and-forget messages emitted after a cart change the shopper should
//! hear about.

use std::{cell::RefCell, fmt, rc::Rc};

use tracing::info;

/// A user-facing cart notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// A product was added to the cart for the first time.
    Added {
        /// Product name
        name: String,
    },

    /// A product already in the cart had its quantity changed by an add.
    QuantityUpdated {
        /// Product name
        name: String,
    },

    /// A product was removed from the cart.
    Removed {
        /// Product name
        name: String,
    },
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notification::Added { name } => write!(f, "{name} added to cart"),
            Notification::QuantityUpdated { name } => write!(f, "Updated {name} quantity"),
            Notification::Removed { name } => write!(f, "{name} removed from cart"),
        }
    }
}

/// Receives cart notifications.
pub trait Notifier {
    /// Deliver a notification. Delivery cannot fail from the cart's point of view.
    fn notify(&self, notification: Notification);
}

/// Logs each notification at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        info!(target: "shophub::notifications", "{notification}");
    }
}

/// Discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _notification: Notification) {}
}

/// Keeps every notification in memory.
///
/// Clones share the same buffer, so a handle kept by the caller sees what the
/// store emitted.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    received: Rc<RefCell<Vec<Notification>>>,
}

impl RecordingNotifier {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications received so far, oldest first.
    pub fn notifications(&self) -> Vec<Notification> {
        self.received.borrow().clone()
    }

    /// Rendered messages received so far, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.received.borrow().iter().map(ToString::to_string).collect()
    }

    /// Remove and return everything received so far.
    pub fn drain(&self) -> Vec<Notification> {
        self.received.borrow_mut().drain(..).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.received.borrow_mut().push(notification);
    }
}
