#![allow(dead_code)]

use std::sync::Arc;

use auth::AuthSecret;
use auth::Authenticator;
use auth::Role;
use auth::SessionPolicy;
use auth::SubjectId;
use identity_service::account::models::Account;
use identity_service::account::models::EmailAddress;
use identity_service::domain::account::service::AccountService;
use identity_service::inbound::http::router::create_router;
use identity_service::repositories::InMemoryAccountRepository;
use reqwest::header::SET_COOKIE;
use reqwest::redirect::Policy;

pub const TEST_SECRET: &str = "test-secret-key-for-session-signing-at-least-32-bytes";
pub const PASSWORD: &str = "pass_word!";

pub const RIDER_EMAIL: &str = "rider@example.com";
pub const DRIVER_EMAIL: &str = "driver@example.com";
pub const ADMIN_EMAIL: &str = "admin@example.com";
/// Account whose stored hash cannot be parsed.
pub const BROKEN_EMAIL: &str = "broken@example.com";

/// Test application that spawns a real server over an in-memory credential store
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
    pub authenticator: Arc<Authenticator>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let secret = AuthSecret::new(TEST_SECRET).expect("Test secret too short");
        let authenticator = Arc::new(Authenticator::new(&secret, SessionPolicy::default()));

        let repository = Arc::new(InMemoryAccountRepository::new(seed_accounts(
            &authenticator,
        )));
        let account_service = Arc::new(AccountService::new(
            repository,
            Arc::clone(&authenticator),
        ));

        let router = create_router(account_service, Arc::clone(&authenticator), false);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            api_client: reqwest::Client::builder()
                .cookie_store(true)
                .redirect(Policy::none())
                .build()
                .expect("Failed to create reqwest client"),
            authenticator,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Sign in through the API; the client's cookie store keeps the session.
    pub async fn login(&self, email: &str) -> reqwest::Response {
        self.post("/api/auth/login")
            .json(&serde_json::json!({
                "email": email,
                "password": PASSWORD,
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }
}

fn seed_accounts(authenticator: &Authenticator) -> Vec<Account> {
    let hash = authenticator
        .hash_password(PASSWORD)
        .expect("Failed to hash password");

    let account = |id: &str, email: &str, role: Role, hash: String| {
        Account::new(
            SubjectId::new(id).unwrap(),
            EmailAddress::new(email.to_string()).unwrap(),
            role,
            hash,
        )
    };

    vec![
        account("rider-1", RIDER_EMAIL, Role::Client, hash.clone()),
        account("driver-1", DRIVER_EMAIL, Role::Driver, hash.clone()),
        account("admin-1", ADMIN_EMAIL, Role::Admin, hash),
        account("broken-1", BROKEN_EMAIL, Role::Client, "not-a-phc-hash".to_string()),
    ]
}

/// Session artifact set by a response, if any.
pub fn session_cookie(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|value| value.strip_prefix("session-token="))
        .and_then(|rest| rest.split(';').next())
        .map(str::to_string)
}
