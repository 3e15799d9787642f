pub mod errors;
pub mod frame;
pub mod heartbeat;
pub mod store;

pub use errors::{NotificationError, StompError};
pub use frame::{Command, Decoded, Frame};
pub use heartbeat::HeartBeat;
pub use store::NotificationStore;
