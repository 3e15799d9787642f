//! Ports layer: the session API and its driven dependencies.

pub mod inbound;
pub mod outbound;

pub use inbound::{BootOutcome, SessionApi};
pub use outbound::{IdentityProvider, SystemTimeSource, TimeSource, TokenStore};
