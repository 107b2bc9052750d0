//! Cart change notifications

use tokio::sync::broadcast;

/// Number of unread notifications a slow subscriber may lag behind before it starts missing them.
pub(crate) const EVENT_CAPACITY: usize = 16;

/// Advisory signal sent after every cart write. Subscribers re-read the cart on receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartEvent {
    /// Lines were added, changed or removed.
    Updated,

    /// The whole cart was deleted.
    Cleared,
}

pub(crate) fn channel() -> broadcast::Sender<CartEvent> {
    let (sender, _receiver) = broadcast::channel(EVENT_CAPACITY);

    sender
}

/// Send an event; having no subscribers is normal and not reported.
pub(crate) fn notify(sender: &broadcast::Sender<CartEvent>, event: CartEvent) {
    _ = sender.send(event);
}
