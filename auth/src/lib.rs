//! Identity and access-control library
//!
//! Provides the dual-mode authentication scheme of the platform:
//! - Session artifacts (HS256-signed, minimal claims) for page navigation
//! - Opaque bearer credentials (AES-256-GCM over the subject id) for API calls
//! - Password hashing (Argon2id)
//! - Role-to-path authorization for the Client, Driver and Admin areas
//!
//! Everything is framework-free and stateless; services adapt these
//! components to their HTTP layer.
//!
//! # Examples
//!
//! ## Bearer Credentials
//! ```
//! use auth::{AuthSecret, CredentialCodec, SubjectId};
//!
//! let secret = AuthSecret::new("secret_key_at_least_32_bytes_long!").unwrap();
//! let codec = CredentialCodec::new(&secret);
//! let subject = SubjectId::new("65f1c0d2a9e4b1f3c2d4e5f6").unwrap();
//! let token = codec.encode(&subject).unwrap();
//! assert_eq!(codec.decode(&token).unwrap(), subject);
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{
//!     ArtifactSessionSource, AuthSecret, Authenticator, AuthorizationTable, Role,
//!     SessionPolicy, SubjectId,
//! };
//!
//! let secret = AuthSecret::new("secret_key_at_least_32_bytes_long!").unwrap();
//! let auth = Authenticator::new(&secret, SessionPolicy::default());
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and issue a session artifact
//! let subject = SubjectId::new("driver-42").unwrap();
//! let issued = auth.authenticate("password123", &hash, subject, Role::Driver).unwrap();
//!
//! // Navigate: the guard checks the role against the path
//! let guard = auth.guard(AuthorizationTable::default());
//! assert!(guard.authorize("/driver/dashboard", Some(&issued.token)).is_allowed());
//!
//! // Call an API: sign with a bearer credential, resolve it server-side
//! let source = ArtifactSessionSource::new(issued.token, auth.sessions());
//! let header = auth.signer().authorization_header(&source).unwrap();
//! let bearer = header.strip_prefix("Bearer ").unwrap();
//! let resolved = auth.resolver().resolve(Some(bearer), None).unwrap();
//! assert_eq!(resolved.as_str(), "driver-42");
//! ```

pub mod authenticator;
pub mod authorization;
pub mod codec;
pub mod identity;
pub mod password;
pub mod resolver;
pub mod secret;
pub mod session;
pub mod signer;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use authorization::AuthorizationError;
pub use authorization::AuthorizationTable;
pub use authorization::DenyReason;
pub use authorization::GuardDecision;
pub use authorization::RouteGuard;
pub use codec::CredentialCodec;
pub use codec::DecodeError;
pub use codec::EncodeError;
pub use identity::Role;
pub use identity::RoleError;
pub use identity::SubjectId;
pub use identity::SubjectIdError;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use resolver::AuthError;
pub use resolver::IdentityResolver;
pub use secret::AuthSecret;
pub use secret::SecretError;
pub use session::IssuedSession;
pub use session::Refresh;
pub use session::Session;
pub use session::SessionError;
pub use session::SessionManager;
pub use session::SessionPolicy;
pub use signer::ArtifactSessionSource;
pub use signer::RequestSigner;
pub use signer::SessionSource;
pub use signer::SigningError;
