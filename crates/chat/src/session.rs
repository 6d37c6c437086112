//! Chat session: owns the connection for the lifetime of the chat view.

use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use log::{debug, info, warn};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use storefront_core::chat::{ChatSnapshot, ChatState};

use crate::error::ChatError;

/// Commands from the view to the connection task.
#[derive(Debug)]
enum Outbound {
    Text(String),
    Close,
}

/// One live chat connection plus the transcript it has received.
///
/// The connection is opened by [`ChatSession::connect`] and released by
/// [`ChatSession::close`] or by dropping the session, whichever comes first.
/// Only the session's own task reads from or writes to the socket.
pub struct ChatSession {
    state: Arc<watch::Sender<ChatSnapshot>>,
    outbound: mpsc::UnboundedSender<Outbound>,
    task: Option<JoinHandle<()>>,
}

impl ChatSession {
    /// Start connecting to `url`. Returns immediately in `Connecting`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn connect(url: impl Into<String>) -> Self {
        let url = url.into();
        let mut snapshot = ChatSnapshot::default();
        snapshot.begin_connect();

        let (state, _) = watch::channel(snapshot);
        let state = Arc::new(state);
        let (outbound, commands) = mpsc::unbounded_channel();

        debug!("[Chat] Connecting to {}", url);
        let task = tokio::spawn(run_session(url, Arc::clone(&state), commands));

        Self {
            state,
            outbound,
            task: Some(task),
        }
    }

    /// Receiver that observes every state, transcript and input change.
    pub fn subscribe(&self) -> watch::Receiver<ChatSnapshot> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> ChatSnapshot {
        self.state.borrow().clone()
    }

    pub fn state(&self) -> ChatState {
        self.state.borrow().state
    }

    /// Send `text` as one frame.
    ///
    /// No-op (returns false) unless the session is open and `text` has
    /// non-whitespace content. There is no acknowledgment or local echo.
    pub fn send(&self, text: &str) -> bool {
        let Some(frame) = self.state.borrow().outbound_frame(text) else {
            return false;
        };
        if self.outbound.send(Outbound::Text(frame)).is_err() {
            warn!("[Chat] Dropping message, connection task has stopped");
            return false;
        }
        true
    }

    /// Replace the text in the input buffer.
    pub fn set_input(&self, text: impl Into<String>) {
        let text = text.into();
        self.state.send_if_modified(|snapshot| {
            if snapshot.input == text {
                return false;
            }
            snapshot.input = text;
            true
        });
    }

    /// Send the input buffer, clearing it only if the send went through.
    pub fn submit(&self) -> bool {
        let input = self.state.borrow().input.clone();
        if !self.send(&input) {
            return false;
        }
        self.state.send_modify(|snapshot| snapshot.input.clear());
        true
    }

    /// Wait until the snapshot satisfies `predicate` and return it.
    pub async fn wait_for<F>(&self, mut predicate: F) -> ChatSnapshot
    where
        F: FnMut(&ChatSnapshot) -> bool,
    {
        let mut receiver = self.state.subscribe();
        let matched = receiver
            .wait_for(|snapshot| predicate(snapshot))
            .await
            .map(|snapshot| snapshot.clone());
        matched.unwrap_or_else(|_| self.snapshot())
    }

    /// Wait for the connection attempt to resolve to `Open` or `Closed`.
    pub async fn wait_until_settled(&self) -> ChatState {
        self.wait_for(|snapshot| snapshot.state != ChatState::Connecting)
            .await
            .state
    }

    /// Close the connection and wait for the session task to finish.
    pub async fn close(mut self) -> Result<(), ChatError> {
        self.state.send_if_modified(ChatSnapshot::mark_closed);
        let _ = self.outbound.send(Outbound::Close);
        if let Some(task) = self.task.take() {
            task.await?;
        }
        Ok(())
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        if self.task.is_none() {
            return;
        }
        // The task sees the close request (or the dropped sender) and sends
        // a close frame before exiting.
        self.state.send_if_modified(ChatSnapshot::mark_closed);
        let _ = self.outbound.send(Outbound::Close);
    }
}

async fn run_session(
    url: String,
    state: Arc<watch::Sender<ChatSnapshot>>,
    mut commands: mpsc::UnboundedReceiver<Outbound>,
) {
    if let Err(err) = drive_connection(&url, &state, &mut commands).await {
        warn!("[Chat] {}", err);
    }
    mark_disconnected(&state, &url);
}

fn mark_disconnected(state: &watch::Sender<ChatSnapshot>, url: &str) {
    if state.send_if_modified(ChatSnapshot::mark_closed) {
        info!("[Chat] Disconnected from {}", url);
    }
}

async fn drive_connection(
    url: &str,
    state: &watch::Sender<ChatSnapshot>,
    commands: &mut mpsc::UnboundedReceiver<Outbound>,
) -> Result<(), ChatError> {
    let mut stream = tokio::select! {
        result = connect_async(url) => result.map_err(ChatError::Connect)?.0,
        _ = commands.recv() => {
            debug!("[Chat] Closed before the connection was established");
            return Ok(());
        }
    };

    if !state.send_if_modified(ChatSnapshot::mark_open) {
        debug!("[Chat] Session closed while connecting");
        let _ = stream.close(None).await;
        return Ok(());
    }
    info!("[Chat] Connected to {}", url);

    let (mut write, mut read) = stream.split();
    let result = loop {
        tokio::select! {
            frame = read.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    state.send_if_modified(|snapshot| snapshot.receive(text));
                }
                Some(Ok(Message::Close(_))) | None => {
                    debug!("[Chat] Peer closed the connection");
                    break Ok(());
                }
                // binary, ping and pong frames carry no chat payload
                Some(Ok(_)) => {}
                Some(Err(err)) => break Err(ChatError::Socket(err)),
            },
            command = commands.recv() => match command {
                Some(Outbound::Text(text)) => {
                    if let Err(err) = write.send(Message::Text(text)).await {
                        break Err(ChatError::Socket(err));
                    }
                }
                Some(Outbound::Close) | None => break Ok(()),
            },
        }
    };

    // stop accepting sends before the close handshake runs
    mark_disconnected(state, url);
    let _ = write.close().await;
    result
}
