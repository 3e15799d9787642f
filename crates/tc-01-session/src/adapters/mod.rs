//! Adapters layer: Keycloak over HTTP, token persistence.

pub mod keycloak;
pub mod token_store;

pub use keycloak::{KeycloakConfig, KeycloakProvider};
pub use token_store::{FileTokenStore, MemoryTokenStore};
