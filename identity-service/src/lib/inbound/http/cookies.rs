use axum_extra::extract::cookie::Cookie;
use axum_extra::extract::cookie::SameSite;
use axum_extra::extract::CookieJar;
use time::Duration as TimeDuration;

/// Session cookie name.
pub const SESSION_COOKIE: &str = "session-token";

/// Builds the HTTP-only cookie that transports the session artifact.
#[derive(Debug, Clone, Copy)]
pub struct SessionCookies {
    secure: bool,
    max_age_seconds: i64,
}

impl SessionCookies {
    pub fn new(secure: bool, max_age: chrono::Duration) -> Self {
        Self {
            secure,
            max_age_seconds: max_age.num_seconds(),
        }
    }

    pub fn session(&self, token: String) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, token))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .max_age(TimeDuration::seconds(self.max_age_seconds))
            .build()
    }

    pub fn removal(&self) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, ""))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .max_age(TimeDuration::ZERO)
            .build()
    }
}

/// Session artifact carried by the request, if any.
pub fn session_token(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_attributes() {
        let cookies = SessionCookies::new(true, chrono::Duration::days(90));
        let cookie = cookies.session("artifact".to_string());

        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "artifact");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(TimeDuration::days(90)));
    }

    #[test]
    fn test_removal_expires_immediately() {
        let cookie = SessionCookies::new(false, chrono::Duration::days(90)).removal();
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(TimeDuration::ZERO));
    }

    #[test]
    fn test_empty_cookie_is_no_session() {
        let jar = CookieJar::new().add(Cookie::new(SESSION_COOKIE, ""));
        assert_eq!(session_token(&jar), None);

        let jar = CookieJar::new().add(Cookie::new(SESSION_COOKIE, "abc"));
        assert_eq!(session_token(&jar), Some("abc".to_string()));
    }
}
