pub mod gateway;
pub mod stomp_client;

pub use stomp_client::{StompClient, StompConfig, StompEvent};
