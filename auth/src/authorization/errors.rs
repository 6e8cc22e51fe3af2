use thiserror::Error;

use crate::identity::Role;

/// Error type for role-route checks.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthorizationError {
    #[error("Role {role} may not access {path}")]
    Forbidden { role: Role, path: String },
}
