use std::sync::Arc;

use auth::RequestSigner;
use auth::SessionSource;
use auth::SigningError;
use reqwest::header::AUTHORIZATION;
use reqwest::Method;
use reqwest::RequestBuilder;

/// HTTP client for protected API routes.
///
/// Every request is signed with a bearer credential freshly derived from the
/// current session. Without a session no request is built at all.
pub struct SignedApiClient {
    http: reqwest::Client,
    base_url: String,
    signer: RequestSigner,
    session: Arc<dyn SessionSource>,
}

impl SignedApiClient {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        signer: RequestSigner,
        session: Arc<dyn SessionSource>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            signer,
            session,
        }
    }

    pub fn get(&self, path: &str) -> Result<RequestBuilder, SigningError> {
        self.request(Method::GET, path)
    }

    pub fn post(&self, path: &str) -> Result<RequestBuilder, SigningError> {
        self.request(Method::POST, path)
    }

    /// Build a request carrying `Authorization: Bearer <credential>`.
    ///
    /// # Errors
    /// * `NoSession` - The session source holds no verified session
    /// * `Encoding` - Credential encryption failed
    pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, SigningError> {
        let header = self
            .signer
            .authorization_header(self.session.as_ref())
            .map_err(|e| {
                tracing::warn!(path, error = %e, "Refusing to send unsigned request");
                e
            })?;

        tracing::debug!(method = %method, path, "Signed outbound request");

        Ok(self
            .http
            .request(method, format!("{}{}", self.base_url, path))
            .header(AUTHORIZATION, header))
    }
}

#[cfg(test)]
mod tests {
    use auth::ArtifactSessionSource;
    use auth::AuthSecret;
    use auth::Authenticator;
    use auth::Role;
    use auth::SessionPolicy;
    use auth::SubjectId;

    use super::*;

    fn authenticator() -> Authenticator {
        let secret = AuthSecret::new("test-secret-key-for-session-signing-32b").unwrap();
        Authenticator::new(&secret, SessionPolicy::default())
    }

    #[test]
    fn test_request_carries_bearer_for_session_subject() {
        let authenticator = authenticator();
        let issued = authenticator
            .issue_session(SubjectId::new("rider-1").unwrap(), Role::Client)
            .unwrap();
        let source = Arc::new(ArtifactSessionSource::new(
            issued.token,
            authenticator.sessions(),
        ));

        let client = SignedApiClient::new(
            reqwest::Client::new(),
            "http://localhost:8080/",
            authenticator.signer(),
            source,
        );

        let request = client.get("/api/me").unwrap().build().unwrap();
        assert_eq!(request.url().as_str(), "http://localhost:8080/api/me");

        let header = request.headers()[AUTHORIZATION].to_str().unwrap();
        let bearer = header.strip_prefix("Bearer ").unwrap();
        let resolved = authenticator.resolver().resolve(Some(bearer), None).unwrap();
        assert_eq!(resolved.as_str(), "rider-1");
    }

    #[test]
    fn test_no_session_builds_nothing() {
        let authenticator = authenticator();
        let source = Arc::new(ArtifactSessionSource::signed_out(authenticator.sessions()));
        let client = SignedApiClient::new(
            reqwest::Client::new(),
            "http://localhost:8080",
            authenticator.signer(),
            source,
        );

        assert!(matches!(
            client.post("/api/rides"),
            Err(SigningError::NoSession)
        ));
    }
}
