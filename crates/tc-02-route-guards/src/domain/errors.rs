use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// Guards kept redirecting; nothing was committed.
    #[error("Too many redirects navigating to {path} (limit {limit})")]
    TooManyRedirects { path: String, limit: usize },
}
