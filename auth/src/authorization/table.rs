use std::collections::HashMap;

use super::errors::AuthorizationError;
use crate::identity::Role;

/// Static mapping from role to the path prefixes it may navigate to.
///
/// Built once at startup and never mutated. There is no inheritance between
/// roles: the admin entry simply enumerates every area.
#[derive(Debug, Clone)]
pub struct AuthorizationTable {
    entries: HashMap<Role, Vec<String>>,
}

impl AuthorizationTable {
    /// Build a table from explicit entries. Roles without an entry are allowed nothing.
    pub fn new<I, P>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Role, Vec<P>)>,
        P: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(role, prefixes)| {
                    let prefixes = prefixes
                        .into_iter()
                        .map(|p| normalize(p.into()))
                        .collect();
                    (role, prefixes)
                })
                .collect(),
        }
    }

    /// Allowed prefixes for a role, in declaration order.
    pub fn allowed_prefixes(&self, role: Role) -> &[String] {
        self.entries.get(&role).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn permits(&self, role: Role, path: &str) -> bool {
        self.allowed_prefixes(role)
            .iter()
            .any(|prefix| matches_prefix(prefix, path))
    }

    /// Check that a role may access a path.
    ///
    /// # Errors
    /// * `Forbidden` - No allowed prefix of the role matches the path
    pub fn check(&self, role: Role, path: &str) -> Result<(), AuthorizationError> {
        if self.permits(role, path) {
            Ok(())
        } else {
            Err(AuthorizationError::Forbidden {
                role,
                path: path.to_string(),
            })
        }
    }
}

impl Default for AuthorizationTable {
    fn default() -> Self {
        Self::new([
            (Role::Admin, vec!["/admin", "/user", "/driver"]),
            (Role::Client, vec!["/user"]),
            (Role::Driver, vec!["/driver"]),
        ])
    }
}

/// Segment-aware prefix match: `/user` matches `/user` and `/user/...` but not `/username`.
pub(crate) fn matches_prefix(prefix: &str, path: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

fn normalize(prefix: String) -> String {
    match prefix.trim_end_matches('/') {
        "" => "/".to_string(),
        trimmed => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let table = AuthorizationTable::default();

        assert_eq!(
            table.allowed_prefixes(Role::Admin),
            ["/admin", "/user", "/driver"]
        );
        assert_eq!(table.allowed_prefixes(Role::Client), ["/user"]);
        assert_eq!(table.allowed_prefixes(Role::Driver), ["/driver"]);
    }

    #[test]
    fn test_admin_reaches_every_area() {
        let table = AuthorizationTable::default();
        for path in ["/admin/x", "/user/profile", "/driver/dashboard"] {
            assert!(table.permits(Role::Admin, path), "{path}");
        }
    }

    #[test]
    fn test_roles_are_confined_to_their_area() {
        let table = AuthorizationTable::default();

        assert!(table.permits(Role::Client, "/user/rides"));
        assert!(!table.permits(Role::Client, "/driver/dashboard"));
        assert!(!table.permits(Role::Client, "/admin"));
        assert!(table.permits(Role::Driver, "/driver/dashboard"));
        assert!(!table.permits(Role::Driver, "/user/rides"));
    }

    #[test]
    fn test_role_without_entry_is_denied() {
        let table = AuthorizationTable::new([(Role::Admin, vec!["/admin/"])]);

        assert!(table.allowed_prefixes(Role::Client).is_empty());
        assert_eq!(
            table.check(Role::Client, "/user/x"),
            Err(AuthorizationError::Forbidden {
                role: Role::Client,
                path: "/user/x".to_string(),
            })
        );
        assert!(table.check(Role::Admin, "/admin/x").is_ok());
    }

    #[test]
    fn test_prefix_match_respects_segments() {
        assert!(matches_prefix("/user", "/user"));
        assert!(matches_prefix("/user", "/user/x"));
        assert!(!matches_prefix("/user", "/username"));
        assert!(!matches_prefix("/user", "/"));
    }
}
