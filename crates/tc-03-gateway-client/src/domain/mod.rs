pub mod config;
pub mod error;

pub use config::{GatewayClientConfig, DEFAULT_GATEWAY_URL};
pub use error::GatewayError;
