//! Ports layer: the notification API and the REST backend it drives.

pub mod inbound;
pub mod outbound;

pub use inbound::NotificationChannelApi;
pub use outbound::NotificationBackend;
