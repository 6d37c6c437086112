use serde::{Deserialize, Serialize};

/// Lifecycle of the single chat connection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatState {
    #[default]
    Disconnected,
    Connecting,
    Open,
    Closed,
}

impl ChatState {
    pub fn is_open(self) -> bool {
        self == Self::Open
    }

    pub fn is_closed(self) -> bool {
        self == Self::Closed
    }
}

/// Received chat payloads in arrival order. Append-only; duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    messages: Vec<String>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, payload: String) {
        self.messages.push(payload);
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Entries keyed by position, the only stable key a message has.
    pub fn entries(&self) -> impl Iterator<Item = (usize, &str)> {
        self.messages.iter().map(String::as_str).enumerate()
    }
}

/// Everything the chat view renders: connection state, transcript and the
/// text currently typed into the input box.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSnapshot {
    pub state: ChatState,
    pub transcript: Transcript,
    pub input: String,
}

impl ChatSnapshot {
    /// `Disconnected -> Connecting`. Any other start state is left alone.
    pub fn begin_connect(&mut self) -> bool {
        if self.state != ChatState::Disconnected {
            return false;
        }
        self.state = ChatState::Connecting;
        true
    }

    /// `Connecting -> Open`.
    pub fn mark_open(&mut self) -> bool {
        if self.state != ChatState::Connecting {
            return false;
        }
        self.state = ChatState::Open;
        true
    }

    /// Append an inbound payload. Ignored unless the session is open.
    pub fn receive(&mut self, payload: String) -> bool {
        if !self.state.is_open() {
            return false;
        }
        self.transcript.push(payload);
        true
    }

    /// Move to `Closed` from any state. Returns false if already closed.
    pub fn mark_closed(&mut self) -> bool {
        if self.state.is_closed() {
            return false;
        }
        self.state = ChatState::Closed;
        true
    }

    /// The frame to put on the wire for `text`, if sending is allowed at all.
    ///
    /// The frame carries the text as typed; trimming only decides whether it
    /// is blank.
    pub fn outbound_frame(&self, text: &str) -> Option<String> {
        if !self.state.is_open() || text.trim().is_empty() {
            return None;
        }
        Some(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_follows_connect_open_close() {
        let mut snapshot = ChatSnapshot::default();
        assert_eq!(snapshot.state, ChatState::Disconnected);
        assert!(!snapshot.mark_open());

        assert!(snapshot.begin_connect());
        assert!(!snapshot.begin_connect());
        assert!(snapshot.mark_open());
        assert_eq!(snapshot.state, ChatState::Open);

        assert!(snapshot.mark_closed());
        assert!(!snapshot.mark_closed());
        assert!(!snapshot.begin_connect());
        assert_eq!(snapshot.state, ChatState::Closed);
    }

    #[test]
    fn connecting_session_can_close_without_opening() {
        let mut snapshot = ChatSnapshot::default();
        snapshot.begin_connect();
        assert!(snapshot.mark_closed());
        assert!(!snapshot.mark_open());
    }

    #[test]
    fn receive_keeps_order_and_duplicates() {
        let mut snapshot = ChatSnapshot::default();
        assert!(!snapshot.receive("too early".to_string()));

        snapshot.begin_connect();
        snapshot.mark_open();
        for payload in ["hi", "hi", "anyone here?"] {
            assert!(snapshot.receive(payload.to_string()));
        }
        let entries: Vec<_> = snapshot.transcript.entries().collect();
        assert_eq!(entries, vec![(0, "hi"), (1, "hi"), (2, "anyone here?")]);

        snapshot.mark_closed();
        assert!(!snapshot.receive("late".to_string()));
        assert_eq!(snapshot.transcript.len(), 3);
    }

    #[test]
    fn outbound_frame_requires_open_session_and_text() {
        let mut snapshot = ChatSnapshot::default();
        assert_eq!(snapshot.outbound_frame("hello"), None);

        snapshot.begin_connect();
        assert_eq!(snapshot.outbound_frame("hello"), None);

        snapshot.mark_open();
        assert_eq!(snapshot.outbound_frame(""), None);
        assert_eq!(snapshot.outbound_frame(" \t\n "), None);
        assert_eq!(snapshot.outbound_frame("  hello "), Some("  hello ".to_string()));

        snapshot.mark_closed();
        assert_eq!(snapshot.outbound_frame("hello"), None);
    }
}
