pub mod claims;
pub mod errors;
pub mod manager;

pub use claims::IssuedSession;
pub use claims::Session;
pub use claims::SessionPolicy;
pub use errors::SessionError;
pub use manager::Refresh;
pub use manager::SessionManager;
