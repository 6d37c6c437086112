//! Fan-out of chat frames to every connected socket.

use tokio::sync::broadcast;

/// Frames buffered per subscriber before a slow socket starts skipping.
const CHAT_FEED_CAPACITY: usize = 256;

/// Rebroadcasts every inbound chat frame to all current subscribers,
/// including the sender. Nothing is stored.
#[derive(Debug, Clone)]
pub struct ChatHub {
    sender: broadcast::Sender<String>,
}

impl Default for ChatHub {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatHub {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHAT_FEED_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.sender.subscribe()
    }

    /// Publish a frame; returns how many subscribers will see it.
    pub fn publish(&self, text: String) -> usize {
        self.sender.send(text).unwrap_or(0)
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
