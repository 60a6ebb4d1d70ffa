//! Integration test harness for the customer operations portal.
//!
//! Builds the full application router (sessions, tracing, Sentry layers)
//! over an in-memory document store and drives it with
//! `tower::ServiceExt::oneshot`. No database or running server is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p customer-ops-integration-tests
//! ```

#![allow(clippy::missing_panics_doc, clippy::unwrap_used)]

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;

use customer_ops_core::{CustomerId, UserRole};
use customer_ops_portal::config::PortalConfig;
use customer_ops_portal::db::CustomerRepository;
use customer_ops_portal::middleware::{SESSION_COOKIE_NAME, create_session_layer};
use customer_ops_portal::models::{CreateCustomerInput, UserProfile};
use customer_ops_portal::seed::{SeedData, seed};
use customer_ops_portal::services::{AuthService, NewUser};
use customer_ops_portal::state::AppState;
use customer_ops_portal::store::{MemoryStore, SharedStore};

/// Password given to every test user.
pub const PASSWORD: &str = "correct-horse-battery";

/// An in-process portal with its backing store.
pub struct TestApp {
    router: Router,
    pub store: Arc<MemoryStore>,
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TestApp {
    /// A portal over an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let shared: SharedStore = store.clone();

        let config = test_config();
        let session_layer = create_session_layer(None, &config);
        let router = customer_ops_portal::app(AppState::new(config, shared), session_layer);

        Self { router, store }
    }

    /// A portal seeded with the demo catalogue and lookbook.
    pub async fn seeded() -> Self {
        let app = Self::new();
        seed(&*app.store, &SeedData::demo().unwrap())
            .await
            .unwrap();
        app
    }

    /// Create a customer account.
    pub async fn create_customer(&self, name: &str) -> CustomerId {
        CustomerRepository::new(&*self.store)
            .create(&CreateCustomerInput {
                name: name.to_owned(),
                ..Default::default()
            })
            .await
            .unwrap()
    }

    /// Register a user with [`PASSWORD`].
    pub async fn register(
        &self,
        email: &str,
        name: &str,
        role: UserRole,
        customer_id: Option<CustomerId>,
    ) -> UserProfile {
        AuthService::new(&*self.store)
            .register(NewUser {
                email,
                name,
                password: PASSWORD,
                role,
                customer_id,
            })
            .await
            .unwrap()
    }

    /// A client with no session.
    #[must_use]
    pub const fn anonymous(&self) -> TestClient<'_> {
        TestClient {
            app: self,
            cookie: None,
        }
    }

    /// Sign in through the API and return a client holding the session cookie.
    pub async fn sign_in(&self, email: &str) -> TestClient<'_> {
        let mut client = self.anonymous();
        let response = client
            .post(
                "/api/auth/login",
                serde_json::json!({ "email": email, "password": PASSWORD }),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "sign-in failed: {}", response.json);
        assert!(client.cookie.is_some(), "sign-in did not set a session cookie");
        client
    }

    /// Register a staff user and sign in as them.
    pub async fn staff(&self, email: &str, name: &str) -> TestClient<'_> {
        self.register(email, name, UserRole::Staff, None).await;
        self.sign_in(email).await
    }

    /// Register a customer user for `customer_id` and sign in as them.
    pub async fn customer(&self, email: &str, customer_id: &CustomerId) -> TestClient<'_> {
        self.register(email, email, UserRole::Customer, Some(customer_id.clone()))
            .await;
        self.sign_in(email).await
    }

    async fn send(&self, request: Request<Body>) -> axum::response::Response {
        self.router.clone().oneshot(request).await.unwrap()
    }
}

/// A client that carries the session cookie between requests.
pub struct TestClient<'a> {
    app: &'a TestApp,
    cookie: Option<String>,
}

/// A fully read response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// JSON body, or `Value::Null` for an empty or non-JSON body.
    pub json: Value,
    pub text: String,
}

impl TestClient<'_> {
    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&mut self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&mut self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&mut self, uri: &str) -> TestResponse {
        self.request(Method::DELETE, uri, None).await
    }

    /// Send a request and return the raw streaming response.
    pub async fn open(&mut self, method: Method, uri: &str) -> axum::response::Response {
        let request = self.build(method, uri, None);
        self.app.send(request).await
    }

    async fn request(&mut self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let request = self.build(method, uri, body);
        let response = self.app.send(request).await;

        let status = response.status();
        let headers = response.headers().clone();
        self.remember_cookie(&headers);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8_lossy(&bytes).into_owned();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            json,
            text,
        }
    }

    fn build(&self, method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    fn remember_cookie(&mut self, headers: &HeaderMap) {
        let prefix = format!("{SESSION_COOKIE_NAME}=");
        for value in headers.get_all(header::SET_COOKIE) {
            let Ok(value) = value.to_str() else { continue };
            let Some(pair) = value.split(';').next() else {
                continue;
            };
            if pair.starts_with(&prefix) {
                let expired = pair.len() == prefix.len() || value.contains("Max-Age=0");
                self.cookie = (!expired).then(|| pair.to_owned());
            }
        }
    }

    /// The session cookie currently held, if any.
    #[must_use]
    pub fn cookie(&self) -> Option<&str> {
        self.cookie.as_deref()
    }

    /// Replace the held session cookie.
    pub fn set_cookie(&mut self, cookie: Option<String>) {
        self.cookie = cookie;
    }
}

fn test_config() -> PortalConfig {
    PortalConfig {
        database_url: None,
        host: [127, 0, 0, 1].into(),
        port: 3002,
        base_url: "http://localhost:3002".to_owned(),
        session_secret: SecretString::from("kP9#vL2$qW8!zX4&mN7^bR1*tY6@hJ3%"),
        seed_demo: false,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.1,
    }
}
