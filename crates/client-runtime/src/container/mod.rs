//! # Client Container
//!
//! Configuration plus the container that owns every component instance.
//! Components are constructed explicitly and shared by `Arc`; nothing is
//! looked up at runtime.

pub mod config;
pub mod services;

pub use config::{
    BootConfig, ClientConfig, ConfigError, GatewayConfig, IdentityConfig, NotificationConfig,
    StorageConfig,
};
pub use services::{ClientContainer, ContainerError};
