//! Test doubles: an in-memory REST backend and a fake STOMP broker.

use crate::domain::frame::{self, Command, Frame};
use crate::domain::{HeartBeat, NotificationError};
use crate::ports::NotificationBackend;
use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use shared_types::notification::{NotificationEvent, NotificationStatus};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tc_03_gateway_client::GatewayError;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;

// =============================================================================
// REST backend
// =============================================================================

/// Scripted notification backend.
#[derive(Default)]
pub struct InMemoryBackend {
    items: Mutex<Vec<NotificationEvent>>,
    failing: AtomicBool,
    list_calls: AtomicUsize,
    mark_all_calls: AtomicUsize,
}

impl InMemoryBackend {
    pub fn with_items(items: Vec<NotificationEvent>) -> Self {
        Self {
            items: Mutex::new(items),
            ..Self::default()
        }
    }

    /// Make every call fail with a 503 until switched back.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn mark_all_calls(&self) -> usize {
        self.mark_all_calls.load(Ordering::SeqCst)
    }

    pub fn items(&self) -> Vec<NotificationEvent> {
        self.items.lock().clone()
    }

    fn check(&self) -> Result<(), NotificationError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(GatewayError::Status {
                status: 503,
                body: "notification service unavailable".into(),
            }
            .into());
        }
        Ok(())
    }
}

#[async_trait]
impl NotificationBackend for InMemoryBackend {
    async fn list_mine(&self) -> Result<Vec<NotificationEvent>, NotificationError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self.items())
    }

    async fn list_unread(&self) -> Result<Vec<NotificationEvent>, NotificationError> {
        self.check()?;
        Ok(self.items().into_iter().filter(|n| n.is_unread()).collect())
    }

    async fn unread_count(&self) -> Result<u64, NotificationError> {
        self.check()?;
        Ok(self.items.lock().iter().filter(|n| n.is_unread()).count() as u64)
    }

    async fn mark_read(&self, id: i64) -> Result<NotificationEvent, NotificationError> {
        self.check()?;
        let mut items = self.items.lock();
        let item = items
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| GatewayError::Status {
                status: 404,
                body: format!("Notification {id} not found"),
            })?;
        item.status = NotificationStatus::Read;
        item.read_at = Some("2025-03-04T10:00:00".into());
        Ok(item.clone())
    }

    async fn mark_all_read(&self) -> Result<(), NotificationError> {
        self.mark_all_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        for n in self.items.lock().iter_mut().filter(|n| n.is_unread()) {
            n.status = NotificationStatus::Read;
            n.read_at = Some("2025-03-04T10:00:00".into());
        }
        Ok(())
    }
}

// =============================================================================
// STOMP broker
// =============================================================================

#[derive(Debug, Clone)]
enum BrokerCommand {
    Push(String),
    /// MESSAGE frame spread over two WebSocket messages.
    PushSplit(String),
    DropAll,
}

#[derive(Debug, Clone)]
enum Greeting {
    Accept(HeartBeat),
    Reject(String),
}

#[derive(Default)]
struct BrokerLog {
    received: Mutex<Vec<Frame>>,
    connections: AtomicUsize,
}

/// Minimal STOMP 1.2 broker on an ephemeral localhost port.
///
/// Answers CONNECT with CONNECTED (or ERROR when rejecting), records every
/// client frame, and fans [`push_raw`](Self::push_raw) bodies out as MESSAGE
/// frames to subscribed connections. It never sends heart-beats.
pub struct FakeBroker {
    url: String,
    log: Arc<BrokerLog>,
    commands: broadcast::Sender<BrokerCommand>,
    task: JoinHandle<()>,
}

impl FakeBroker {
    /// Accept every CONNECT, advertising `heartbeat` in CONNECTED.
    pub async fn start(heartbeat: HeartBeat) -> Self {
        Self::spawn(Greeting::Accept(heartbeat)).await
    }

    /// Answer every CONNECT with an ERROR frame carrying `message`.
    pub async fn rejecting(message: &str) -> Self {
        Self::spawn(Greeting::Reject(message.to_string())).await
    }

    #[allow(clippy::unwrap_used)]
    async fn spawn(greeting: Greeting) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let log = Arc::new(BrokerLog::default());
        let (commands, _) = broadcast::channel(64);

        let task = tokio::spawn({
            let log = log.clone();
            let commands = commands.clone();
            async move {
                while let Ok((stream, _)) = listener.accept().await {
                    log.connections.fetch_add(1, Ordering::SeqCst);
                    tokio::spawn(serve(
                        stream,
                        greeting.clone(),
                        log.clone(),
                        commands.subscribe(),
                    ));
                }
            }
        });

        Self {
            url: format!("ws://{addr}/ws"),
            log,
            commands,
            task,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// WebSocket connections accepted so far.
    pub fn connections(&self) -> usize {
        self.log.connections.load(Ordering::SeqCst)
    }

    /// Client frames of one command, oldest first.
    pub fn received_of(&self, command: Command) -> Vec<Frame> {
        self.log
            .received
            .lock()
            .iter()
            .filter(|f| f.command == command)
            .cloned()
            .collect()
    }

    /// Deliver `body` to every subscribed connection.
    pub fn push_raw(&self, body: &str) {
        let _ = self.commands.send(BrokerCommand::Push(body.to_string()));
    }

    /// Deliver `body` with the MESSAGE frame cut in two WebSocket messages.
    pub fn push_split(&self, body: &str) {
        let _ = self.commands.send(BrokerCommand::PushSplit(body.to_string()));
    }

    /// Deliver `event` as JSON to every subscribed connection.
    #[allow(clippy::unwrap_used)]
    pub fn push(&self, event: &NotificationEvent) {
        self.push_raw(&serde_json::to_string(event).unwrap());
    }

    /// Close every open connection.
    pub fn drop_connections(&self) {
        let _ = self.commands.send(BrokerCommand::DropAll);
    }

    /// Wait until at least `count` SUBSCRIBE frames arrived and return the
    /// latest.
    ///
    /// # Panics
    ///
    /// Panics after five seconds.
    pub async fn wait_for_subscriptions(&self, count: usize) -> Frame {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        loop {
            let subscriptions = self.received_of(Command::Subscribe);
            if subscriptions.len() >= count {
                if let Some(latest) = subscriptions.into_iter().last() {
                    return latest;
                }
            }
            assert!(
                tokio::time::Instant::now() < deadline,
                "no SUBSCRIBE #{count} within 5s"
            );
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    pub async fn wait_for_subscription(&self) -> Frame {
        self.wait_for_subscriptions(1).await
    }
}

impl Drop for FakeBroker {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn serve(
    stream: TcpStream,
    greeting: Greeting,
    log: Arc<BrokerLog>,
    mut commands: broadcast::Receiver<BrokerCommand>,
) {
    let Ok(ws) = tokio_tungstenite::accept_async(stream).await else {
        return;
    };
    let (mut write, mut read) = ws.split();
    let mut subscription: Option<(String, String)> = None;
    let mut next_message_id = 0u64;

    loop {
        tokio::select! {
            msg = read.next() => {
                let text = match msg {
                    Some(Ok(Message::Text(text))) => text.as_str().to_owned(),
                    Some(Ok(Message::Close(_))) | None | Some(Err(_)) => return,
                    Some(Ok(_)) => continue,
                };
                let Ok(decoded) = frame::decode(&text) else {
                    return;
                };
                for frame in decoded.frames {
                    let reply = match (&frame.command, &greeting) {
                        (Command::Connect | Command::Stomp, Greeting::Accept(hb)) => Some(
                            Frame::new(Command::Connected)
                                .header("version", "1.2")
                                .header("heart-beat", hb.header_value()),
                        ),
                        (Command::Connect | Command::Stomp, Greeting::Reject(message)) => Some(
                            Frame::new(Command::Error)
                                .header("message", message.as_str())
                                .body(message.as_str()),
                        ),
                        (Command::Subscribe, _) => {
                            subscription = frame
                                .get("id")
                                .zip(frame.get("destination"))
                                .map(|(id, dest)| (id.to_string(), dest.to_string()));
                            None
                        }
                        _ => None,
                    };
                    let command = frame.command;
                    log.received.lock().push(frame);

                    if let Some(reply) = reply {
                        if write.send(Message::Text(reply.encode().into())).await.is_err() {
                            return;
                        }
                    }
                    if command == Command::Disconnect {
                        let _ = write.close().await;
                        return;
                    }
                }
            }
            cmd = commands.recv() => match cmd {
                Ok(cmd @ (BrokerCommand::Push(_) | BrokerCommand::PushSplit(_))) => {
                    let Some((id, destination)) = subscription.as_ref() else {
                        continue;
                    };
                    let (split, body) = match cmd {
                        BrokerCommand::PushSplit(body) => (true, body),
                        BrokerCommand::Push(body) => (false, body),
                        BrokerCommand::DropAll => continue,
                    };
                    next_message_id += 1;
                    let encoded = Frame::new(Command::Message)
                        .header("subscription", id.as_str())
                        .header("destination", destination.as_str())
                        .header("message-id", next_message_id.to_string())
                        .header("content-type", "application/json")
                        .body(body)
                        .encode();

                    let mut cut = if split { encoded.len() / 2 } else { encoded.len() };
                    while !encoded.is_char_boundary(cut) {
                        cut -= 1;
                    }
                    let (head, tail) = encoded.split_at(cut);
                    for part in [head, tail].into_iter().filter(|p| !p.is_empty()) {
                        if write.send(Message::Text(part.to_string().into())).await.is_err() {
                            return;
                        }
                    }
                }
                Ok(BrokerCommand::DropAll) | Err(broadcast::error::RecvError::Closed) => {
                    let _ = write.close().await;
                    return;
                }
                Err(broadcast::error::RecvError::Lagged(_)) => {}
            },
        }
    }
}
