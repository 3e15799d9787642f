use std::time::Duration;
use tc_03_gateway_client::GatewayError;
use thiserror::Error;

/// Wire-level STOMP failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StompError {
    #[error("Frame is missing its NUL terminator")]
    Truncated,

    #[error("Frame is missing the blank line after its headers")]
    MissingHeaderTerminator,

    #[error("Unknown STOMP command: {0}")]
    UnknownCommand(String),

    #[error("Malformed header line: {0}")]
    MalformedHeader(String),

    #[error("Invalid header escape sequence: {0}")]
    InvalidEscape(String),

    #[error("Invalid heart-beat header: {0}")]
    InvalidHeartBeat(String),
}

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error(transparent)]
    Stomp(#[from] StompError),

    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// The broker answered with an ERROR frame.
    #[error("Broker rejected the session: {0}")]
    Rejected(String),

    #[error("No frame received for {0:?}")]
    HeartbeatTimeout(Duration),

    #[error("Connection closed by broker")]
    Closed,

    #[error("A user id is required to subscribe")]
    MissingUserId,

    #[error("Invalid notification payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("Notification service call failed: {0}")]
    Backend(#[from] GatewayError),
}

impl From<tokio_tungstenite::tungstenite::Error> for NotificationError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::WebSocket(e.to_string())
    }
}
