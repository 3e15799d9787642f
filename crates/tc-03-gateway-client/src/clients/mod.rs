//! Typed REST clients, one per backend service. All share one
//! [`GatewayHttp`](crate::http::GatewayHttp) and so one auth pipeline.

pub mod admin;
pub mod claims;
pub mod notifications;
pub mod policy;
pub mod profile;

pub use admin::{dashboard_stats, AdminClaimClient, AdminPolicyClient};
pub use claims::ClaimClient;
pub use notifications::NotificationApi;
pub use policy::{PolicyClient, PolicyRecord};
pub use profile::UserProfileClient;
