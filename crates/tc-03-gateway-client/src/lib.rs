//! # Gateway Client (tc-03)
//!
//! Every backend call the client makes goes through one tower pipeline built
//! over `reqwest`. The auth stage attaches the session's bearer token to
//! requests bound for the gateway (or any other configured backend base) and
//! leaves everything else alone.
//!
//! ## Pipeline
//!
//! ```text
//! PolicyClient ─┐
//! ClaimClient ──┤
//! Admin*Client ─┼──→ GatewayHttp ──→ TracingLayer ──→ AuthLayer ──→ HttpTransport ──→ gateway
//! Profile ──────┤                                        │
//! Notification ─┘                              TokenSource::current_token()
//! ```
//!
//! ## Bearer Rules
//!
//! | Request URL | Token | Header |
//! |-------------|-------|--------|
//! | same origin as a protected base, path under its path | non-empty | `Authorization: Bearer <token>` |
//! | same origin, path under base | empty | none |
//! | any other origin or path | any | none |
//!
//! The auth stage never retries and never changes the response; transport
//! errors and non-success statuses surface to the caller as [`GatewayError`].
//!
//! ## Endpoints
//!
//! | Client | Paths |
//! |--------|-------|
//! | `PolicyClient` | `/policies/{kind}`, `/policies/{kind}/{id}`, `/policies/{kind}/me` |
//! | `ClaimClient` | `/claims`, `/claims/my-claims/..`, `/claims/{n}/cancel` |
//! | `AdminClaimClient` | `/admin/claims`, `/admin/claims/by-status/{s}`, `/admin/claims/{n}/{action}`, `/admin/claims/statistics` |
//! | `AdminPolicyClient` | `/policies/{kind}` (all holders), `DELETE /policies/{kind}/{id}` |
//! | `UserProfileClient` | `/profiles/me`, `/profiles`, `/profiles/{id}` |
//! | `NotificationApi` | `/api/notifications/my/..`, `/api/notifications/{id}/read`, `/api/notifications/read-all` |

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod clients;
pub mod domain;
pub mod http;
pub mod middleware;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use clients::{
    dashboard_stats, AdminClaimClient, AdminPolicyClient, ClaimClient, NotificationApi,
    PolicyClient, PolicyRecord, UserProfileClient,
};
pub use domain::{GatewayClientConfig, GatewayError, DEFAULT_GATEWAY_URL};
pub use http::{GatewayHttp, HttpTransport};
pub use middleware::{AuthConfig, AuthLayer, AuthService, TracingLayer};
