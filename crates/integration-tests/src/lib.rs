//! Shared fixtures for the integration test binaries.
//!
//! Everything runs against the in-memory store with a deterministic clock, so
//! no external services are needed.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use domains::{Actor, Clock};
use services::{AccountService, ComplaintService, ReplyService};
use storage_adapters::{InMemoryAccountRepo, InMemoryComplaintRepo};

pub const PASSWORD: &str = "password123";

/// Clock that advances by one second on every read.
#[derive(Debug)]
pub struct StepClock {
    start: DateTime<Utc>,
    ticks: AtomicI64,
}

impl StepClock {
    pub fn new() -> Self {
        Self {
            start: Utc.with_ymd_and_hms(2024, 9, 1, 8, 0, 0).unwrap(),
            ticks: AtomicI64::new(0),
        }
    }
}

impl Default for StepClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for StepClock {
    fn now(&self) -> DateTime<Utc> {
        let tick = self.ticks.fetch_add(1, Ordering::SeqCst);
        self.start + Duration::seconds(tick)
    }
}

/// Services wired to fresh in-memory repositories.
#[derive(Clone)]
pub struct TestServices {
    pub complaints: ComplaintService,
    pub replies: ReplyService,
    pub accounts: AccountService,
    /// Direct handle on the store, for asserting on state the services hide.
    pub store: Arc<InMemoryComplaintRepo>,
}

pub fn in_memory_services() -> TestServices {
    let store = Arc::new(InMemoryComplaintRepo::new());
    let clock: Arc<dyn Clock> = Arc::new(StepClock::new());

    TestServices {
        complaints: ComplaintService::new(store.clone(), clock.clone()),
        replies: ReplyService::new(store.clone(), clock.clone()),
        accounts: AccountService::new(
            Arc::new(InMemoryAccountRepo::new()),
            Arc::new(auth_adapters::Argon2Hasher::new()),
            clock,
        ),
        store,
    }
}

impl TestServices {
    pub async fn student(&self, name: &str, email: &str) -> Actor {
        self.accounts.signup(name, email, PASSWORD).await.unwrap()
    }

    pub async fn admin(&self, name: &str, email: &str) -> Actor {
        self.accounts
            .register_admin(name, email, PASSWORD)
            .await
            .unwrap()
    }
}

#[cfg(feature = "web-axum")]
pub mod http {
    //! Router fixture and request helpers.

    use std::sync::Arc;

    use api_adapters::web::{build_app, AppState};
    use api_adapters::Metrics;
    use auth_adapters::JwtSessionIssuer;
    use axum::body::Body;
    use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
    use axum::http::{Method, Request, StatusCode};
    use axum::Router;
    use chrono::Duration;
    use domains::{Actor, SessionIssuer};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::TestServices;

    pub const TEST_SECRET: &[u8] = b"integration-test-secret";

    pub struct TestApp {
        pub router: Router,
        pub sessions: Arc<JwtSessionIssuer>,
    }

    impl TestApp {
        pub fn new(services: &TestServices) -> Self {
            let sessions = Arc::new(JwtSessionIssuer::new(TEST_SECRET, Duration::hours(1)));
            let state = AppState {
                complaints: services.complaints.clone(),
                replies: services.replies.clone(),
                accounts: services.accounts.clone(),
                sessions: sessions.clone(),
                metrics: Arc::new(Metrics::new()),
            };
            Self {
                router: build_app(state, &[]),
                sessions,
            }
        }

        pub fn token_for(&self, actor: &Actor) -> String {
            self.sessions.issue(actor).unwrap()
        }

        /// Sends one request and returns the status and the JSON body
        /// (`Value::Null` for empty bodies).
        pub async fn send(
            &self,
            method: Method,
            uri: &str,
            token: Option<&str>,
            body: Option<Value>,
        ) -> (StatusCode, Value) {
            let mut builder = Request::builder().method(method).uri(uri);
            if let Some(token) = token {
                builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
            }
            let request = match body {
                Some(json) => builder
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(json.to_string()))
                    .unwrap(),
                None => builder.body(Body::empty()).unwrap(),
            };

            let response = self.router.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            let json = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes)
                    .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
            };
            (status, json)
        }

        pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
            self.send(Method::GET, uri, token, None).await
        }

        pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
            self.send(Method::POST, uri, token, Some(body)).await
        }

        pub async fn patch(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
            self.send(Method::PATCH, uri, token, Some(body)).await
        }

        pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
            self.send(Method::DELETE, uri, token, None).await
        }
    }
}
