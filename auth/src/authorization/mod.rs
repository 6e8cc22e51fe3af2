pub mod errors;
pub mod guard;
pub mod table;

pub use errors::AuthorizationError;
pub use guard::DenyReason;
pub use guard::GuardDecision;
pub use guard::RouteGuard;
pub use table::AuthorizationTable;
