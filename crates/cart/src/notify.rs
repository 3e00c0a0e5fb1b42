//! User-facing failure notifications.
//!
//! A notifier is fire-and-forget: the cart never waits on it and never looks
//! at a result.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;

/// Shows an error message to the shopper.
pub trait Notifier: Send + Sync {
    /// Display `message`.
    fn notify(&self, message: &str);
}

impl<T: Notifier + ?Sized> Notifier for Arc<T> {
    fn notify(&self, message: &str) {
        (**self).notify(message);
    }
}

/// Emits notifications as `warn` events on the `rocket_cart::notify` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str) {
        tracing::warn!(target: "rocket_cart::notify", "{message}");
    }
}

/// Forwards notifications to a channel, e.g. a UI task rendering toasts.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    sender: UnboundedSender<String>,
}

impl ChannelNotifier {
    /// Notifier sending into `sender`.
    #[must_use]
    pub const fn new(sender: UnboundedSender<String>) -> Self {
        Self { sender }
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, message: &str) {
        // A closed receiver means nobody is rendering; drop the message.
        let _ = self.sender.send(message.to_string());
    }
}
