//! STOMP-over-WebSocket client with reconnection.
//!
//! One spawned task owns the socket. It sends CONNECT (with the current
//! bearer token), subscribes once CONNECTED arrives, forwards MESSAGE bodies,
//! keeps heart-beats flowing, and reconnects after a fixed delay whenever the
//! connection ends for any reason other than [`StompClient::stop`].

use crate::domain::frame::{self, Command, Frame};
use crate::domain::{HeartBeat, NotificationError};
use futures_util::{SinkExt, StreamExt};
use shared_types::ports::TokenSource;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

/// Subscription id used for the single notification subscription.
const SUBSCRIPTION_ID: &str = "sub-0";

#[derive(Debug, Clone)]
pub struct StompConfig {
    /// WebSocket endpoint, e.g. `ws://localhost:8084/ws/websocket`.
    pub url: String,
    /// Value of the CONNECT `host` header.
    pub host: String,
    /// Pause before reconnecting. Zero disables reconnection.
    pub reconnect_delay: Duration,
    /// Heart-beats we offer in CONNECT.
    pub heartbeat: HeartBeat,
}

impl StompConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            host: "/".to_string(),
            reconnect_delay: Duration::from_millis(5000),
            heartbeat: HeartBeat::new(4000, 4000),
        }
    }
}

/// What the connection task reports.
#[derive(Debug, Clone, PartialEq)]
pub enum StompEvent {
    /// CONNECTED received and the subscription sent.
    Connected { heartbeat: HeartBeat },
    /// A MESSAGE on the subscription.
    Message { destination: String, body: String },
    /// ERROR frame, socket failure, or heart-beat timeout.
    Error(String),
    /// The connection ended; a reconnect may follow.
    Disconnected { reason: String },
}

enum Exit {
    Shutdown,
    Closed,
}

pub struct StompClient {
    config: StompConfig,
    tokens: Arc<dyn TokenSource>,
    shutdown_tx: Option<mpsc::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl StompClient {
    pub fn new(config: StompConfig, tokens: Arc<dyn TokenSource>) -> Self {
        Self {
            config,
            tokens,
            shutdown_tx: None,
            task: None,
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Spawn the connection loop, subscribed to `destination`.
    pub fn start(&mut self, destination: String, event_tx: mpsc::Sender<StompEvent>) {
        if self.is_running() {
            debug!("STOMP client already running");
            return;
        }

        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);
        self.shutdown_tx = Some(shutdown_tx);
        self.task = Some(tokio::spawn(connection_loop(
            self.config.clone(),
            self.tokens.clone(),
            destination,
            event_tx,
            shutdown_rx,
        )));
    }

    /// Send DISCONNECT, close the socket, and wait for the task to end.
    pub async fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(()).await;
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!(error = %e, "STOMP task ended abnormally");
            }
        }
    }
}

impl Drop for StompClient {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn connection_loop(
    config: StompConfig,
    tokens: Arc<dyn TokenSource>,
    destination: String,
    event_tx: mpsc::Sender<StompEvent>,
    mut shutdown_rx: mpsc::Receiver<()>,
) {
    loop {
        let reason = match run_connection(&config, &tokens, &destination, &event_tx, &mut shutdown_rx).await {
            Ok(Exit::Shutdown) => {
                let _ = event_tx
                    .send(StompEvent::Disconnected {
                        reason: "client disconnect".into(),
                    })
                    .await;
                break;
            }
            Ok(Exit::Closed) => NotificationError::Closed.to_string(),
            Err(e) => {
                error!(error = %e, url = %config.url, "STOMP connection failed");
                let _ = event_tx.send(StompEvent::Error(e.to_string())).await;
                e.to_string()
            }
        };

        let _ = event_tx
            .send(StompEvent::Disconnected {
                reason: reason.clone(),
            })
            .await;

        if config.reconnect_delay.is_zero() {
            info!(reason = %reason, "STOMP connection ended; reconnection disabled");
            break;
        }

        debug!(delay_ms = config.reconnect_delay.as_millis() as u64, "Reconnecting");
        tokio::select! {
            _ = tokio::time::sleep(config.reconnect_delay) => {}
            _ = shutdown_rx.recv() => break,
        }
    }
}

async fn tick(interval: &mut Option<Interval>) {
    match interval {
        Some(i) => {
            i.tick().await;
        }
        None => std::future::pending().await,
    }
}

fn interval_every(period: Duration) -> Interval {
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

async fn run_connection(
    config: &StompConfig,
    tokens: &Arc<dyn TokenSource>,
    destination: &str,
    event_tx: &mpsc::Sender<StompEvent>,
    shutdown_rx: &mut mpsc::Receiver<()>,
) -> Result<Exit, NotificationError> {
    let (ws_stream, _) = connect_async(config.url.as_str()).await?;
    let (mut write, mut read) = ws_stream.split();

    let mut connect = Frame::new(Command::Connect)
        .header("accept-version", "1.2")
        .header("host", config.host.as_str())
        .header("heart-beat", config.heartbeat.header_value());
    let token = tokens.current_token();
    if !token.is_empty() {
        connect = connect.header("Authorization", format!("Bearer {token}"));
    }
    write.send(Message::Text(connect.encode().into())).await?;

    let mut heartbeat_out: Option<Interval> = None;
    let mut watchdog: Option<Interval> = None;
    let mut dead_after: Option<Duration> = None;
    let mut last_received = Instant::now();
    let mut pending = String::new();

    loop {
        tokio::select! {
            msg = read.next() => {
                let text = match msg {
                    Some(Ok(Message::Text(text))) => text.as_str().to_owned(),
                    Some(Ok(Message::Binary(data))) => String::from_utf8_lossy(&data).into_owned(),
                    Some(Ok(Message::Ping(data))) => {
                        last_received = Instant::now();
                        write.send(Message::Pong(data)).await?;
                        continue;
                    }
                    Some(Ok(Message::Close(_))) | None => return Ok(Exit::Closed),
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => return Err(e.into()),
                };
                last_received = Instant::now();

                pending.push_str(&text);
                let decoded = frame::drain(&mut pending)?;
                for frame in decoded.frames {
                    match frame.command {
                        Command::Connected => {
                            let server = frame.get("heart-beat").map(HeartBeat::parse).transpose()?;
                            let agreed = config.heartbeat.negotiate(server);
                            heartbeat_out = agreed.send_every().map(interval_every);
                            dead_after = agreed.dead_after();
                            watchdog = agreed
                                .dead_after()
                                .map(|_| interval_every(Duration::from_millis(agreed.incoming_ms)));

                            let subscribe = Frame::new(Command::Subscribe)
                                .header("id", SUBSCRIPTION_ID)
                                .header("destination", destination)
                                .header("ack", "auto");
                            write.send(Message::Text(subscribe.encode().into())).await?;

                            info!(destination, ?agreed, "STOMP connected");
                            let _ = event_tx.send(StompEvent::Connected { heartbeat: agreed }).await;
                        }
                        Command::Message => {
                            let destination = frame.get("destination").unwrap_or_default().to_string();
                            let _ = event_tx
                                .send(StompEvent::Message { destination, body: frame.body })
                                .await;
                        }
                        Command::Error => {
                            let message = frame
                                .get("message")
                                .map(str::to_string)
                                .unwrap_or_else(|| frame.body.clone());
                            return Err(NotificationError::Rejected(message));
                        }
                        other => debug!(command = %other, "Ignoring frame"),
                    }
                }
            }
            _ = tick(&mut heartbeat_out) => {
                write.send(Message::Text(String::from("\n").into())).await?;
            }
            _ = tick(&mut watchdog) => {
                if let Some(limit) = dead_after {
                    if last_received.elapsed() > limit {
                        warn!(silence_ms = last_received.elapsed().as_millis() as u64, "Heart-beat missed");
                        return Err(NotificationError::HeartbeatTimeout(limit));
                    }
                }
            }
            _ = shutdown_rx.recv() => {
                let disconnect = Frame::new(Command::Disconnect);
                let _ = write.send(Message::Text(disconnect.encode().into())).await;
                let _ = write.close().await;
                return Ok(Exit::Shutdown);
            }
        }
    }
}
