//! Request pipeline for gateway calls.
//!
//! Layer order: Request → Tracing → Auth → Transport

pub mod auth;
pub mod tracing;

pub use auth::{AuthConfig, AuthLayer, AuthService};
pub use self::tracing::{TracingLayer, TracingService};
