use std::sync::Arc;

use api_lib::config::Config;
use api_lib::web::{router, state::AppState};
use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use backoffice_core::memory::MemoryBackend;
use backoffice_core::ports::Clock;
use chrono::{DateTime, FixedOffset, TimeZone};
use serde_json::{json, Value};
use tower::ServiceExt;

pub const PASSWORD: &str = "correct horse battery staple";

// ── FixedClock ───────────────────────────────────────────────────────────────

pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

/// 2024-01-15 at the given UTC wall-clock time.
pub fn jan_15(hour: u32, minute: u32) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(2024, 1, 15, hour, minute, 0)
        .unwrap()
}

// ── TestApp ──────────────────────────────────────────────────────────────────

pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub struct TestApp {
    router: Router,
    pub backend: Arc<MemoryBackend>,
}

impl TestApp {
    pub fn at(now: DateTime<FixedOffset>) -> Self {
        let backend = Arc::new(MemoryBackend::new());
        let state = AppState::new(backend.clone(), Arc::new(Config::default()))
            .with_clock(Arc::new(FixedClock(now)));
        Self {
            router: router(Arc::new(state)),
            backend,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> Reply {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        Reply {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, cookie: &str) -> Reply {
        self.request(Method::GET, uri, Some(cookie), None).await
    }

    pub async fn post(&self, uri: &str, cookie: &str, body: Option<Value>) -> Reply {
        self.request(Method::POST, uri, Some(cookie), body).await
    }

    pub async fn signup(&self, email: &str, full_name: &str, role: &str) -> Reply {
        self.request(
            Method::POST,
            "/auth/signup",
            None,
            Some(json!({
                "email": email,
                "password": PASSWORD,
                "full_name": full_name,
                "role": role,
            })),
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> Reply {
        self.request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "email": email, "password": password })),
        )
        .await
    }

    /// Signs a new user up and in, returning the `Cookie` header value to send back.
    pub async fn signed_in(&self, email: &str, full_name: &str) -> String {
        let reply = self.signup(email, full_name, "employee").await;
        assert_eq!(reply.status, StatusCode::CREATED, "{:?}", reply.body);
        let reply = self.login(email, PASSWORD).await;
        assert_eq!(reply.status, StatusCode::OK, "{:?}", reply.body);
        session_cookie(&reply.headers)
    }
}

/// Turns a `Set-Cookie` header into the `name=value` pair a browser would send.
pub fn session_cookie(headers: &HeaderMap) -> String {
    headers
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .unwrap()
        .to_string()
}
