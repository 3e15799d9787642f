//! Integration flows across session, guards, gateway and notifications.

pub mod fixtures;

#[cfg(test)]
mod navigation_flow;
#[cfg(test)]
mod notification_flow;
#[cfg(test)]
mod session_flow;
