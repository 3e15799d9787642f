//! # Shared Types Crate
//!
//! This crate contains every type that crosses a crate boundary in the
//! Trustify client: backend DTOs, the role and route vocabulary, and the
//! small port traits the session, guard, and gateway crates meet at.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: Wire shapes mirror the backend's camelCase
//!   JSON exactly; nothing else in the workspace redefines them.
//! - **Ports, not vendors**: `TokenSource`, `SessionView`, `ProfileLookup` and
//!   `Navigator` are defined here so that producers and consumers never
//!   depend on each other directly.
//! - **Case-insensitive roles**: `RoleSet` is the only place role comparison
//!   happens.

pub mod admin;
pub mod claim;
pub mod entities;
pub mod errors;
pub mod notification;
pub mod policy;
pub mod ports;
pub mod profile;
pub mod routes;

pub use admin::*;
pub use claim::*;
pub use entities::*;
pub use errors::*;
pub use notification::*;
pub use policy::*;
pub use ports::*;
pub use profile::*;
pub use routes::*;
