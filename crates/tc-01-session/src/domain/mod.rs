//! Domain layer: session state, token claims, errors.

pub mod errors;
pub mod jwt;
pub mod session;

pub use errors::SessionError;
pub use jwt::{decode_claims, AccessClaims, RealmAccess};
pub use session::Session;
