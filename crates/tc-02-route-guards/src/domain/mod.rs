pub mod errors;
pub mod outcome;
pub mod route;

pub use errors::RouteError;
pub use outcome::{GuardKind, GuardOutcome};
pub use route::{RouteData, RouteDefinition, RouteMatch, RoutePattern, RouteTable};
