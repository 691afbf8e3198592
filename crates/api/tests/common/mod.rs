#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use jsonwebtoken::{encode, EncodingKey, Header};
use tokio::sync::mpsc;
use tower::ServiceExt;

use warden_api::auth::jwt::{Claims, JwtConfig};
use warden_api::auth::password::hash_password;
use warden_api::config::ServerConfig;
use warden_api::router::build_app_router;
use warden_api::state::AppState;
use warden_core::types::DbId;
use warden_db::models::user::{CreateUser, User};
use warden_db::{CredentialStore, MemoryCredentialStore};
use warden_events::{NotifyError, PasswordResetNotice, ResetNotifier};

/// Build a test `ServerConfig` with safe defaults and a known signing secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        secure_cookies: false,
        reset_url_base: "http://localhost:3000/reset-password".to_string(),
        jwt: JwtConfig::from_secret("integration-test-secret-long-enough-for-hmac"),
    }
}

/// Notifier that hands every notice to the test instead of sending it.
pub struct RecordingNotifier {
    tx: mpsc::UnboundedSender<PasswordResetNotice>,
}

#[async_trait]
impl ResetNotifier for RecordingNotifier {
    async fn send_password_reset(&self, notice: &PasswordResetNotice) -> Result<(), NotifyError> {
        let _ = self.tx.send(notice.clone());
        Ok(())
    }
}

/// The full router over an in-memory store, plus handles to inspect it.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryCredentialStore>,
    pub config: ServerConfig,
    notices: mpsc::UnboundedReceiver<PasswordResetNotice>,
}

impl TestApp {
    /// Build the same router and middleware stack `main.rs` serves.
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    /// Same as [`TestApp::new`] with a caller-supplied configuration.
    pub fn with_config(config: ServerConfig) -> Self {
        let store = Arc::new(MemoryCredentialStore::new());
        let (tx, notices) = mpsc::unbounded_channel();

        let state = AppState {
            store: store.clone(),
            notifier: Arc::new(RecordingNotifier { tx }),
            config: Arc::new(config.clone()),
        };

        Self {
            router: build_app_router(state, &config),
            store,
            config,
            notices,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    pub async fn post_json(&self, uri: &str, body: serde_json::Value) -> Response<Body> {
        let request = Request::post(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    /// GET with `Cookie: token=<token>`.
    pub async fn get_with_cookie(&self, uri: &str, token: &str) -> Response<Body> {
        let request = Request::get(uri)
            .header(COOKIE, format!("token={token}"))
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// GET with `Authorization: Bearer <token>`.
    pub async fn get_with_bearer(&self, uri: &str, token: &str) -> Response<Body> {
        let request = Request::get(uri)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    pub async fn signup(&self, email: &str, password: &str, name: &str) -> Response<Body> {
        self.post_json(
            "/api/v1/auth/signup",
            serde_json::json!({ "email": email, "password": password, "name": name }),
        )
        .await
    }

    pub async fn signin(&self, email: &str, password: &str) -> Response<Body> {
        self.post_json(
            "/api/v1/auth/signin",
            serde_json::json!({ "email": email, "password": password }),
        )
        .await
    }

    /// Sign in and return the session token from the response body.
    pub async fn session_token(&self, email: &str, password: &str) -> String {
        let response = self.signin(email, password).await;
        assert_eq!(response.status(), 200, "signin should succeed");
        let json = body_json(response).await;
        json["data"].as_str().expect("token in body").to_string()
    }

    /// Insert a user directly into the store with the given role.
    pub async fn seed_user(&self, email: &str, password: &str, role: &str) -> User {
        self.store
            .create_user(&CreateUser {
                email: email.to_string(),
                name: "Seeded".to_string(),
                password_hash: hash_password(password).expect("hashing should succeed"),
                role: role.to_string(),
            })
            .await
            .expect("seeding should succeed")
    }

    /// Wait for the next reset notice delivered by the notifier.
    pub async fn next_notice(&mut self) -> PasswordResetNotice {
        tokio::time::timeout(Duration::from_secs(5), self.notices.recv())
            .await
            .expect("a reset notice should be delivered")
            .expect("notifier channel open")
    }

    /// `true` if no notice arrives within a short grace period.
    pub async fn no_notice(&mut self) -> bool {
        tokio::time::timeout(Duration::from_millis(200), self.notices.recv())
            .await
            .is_err()
    }
}

/// Collect the response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("response body should be JSON")
}

/// Collect the raw response body.
pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

/// The `Set-Cookie` header value, if any.
pub fn set_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Sign arbitrary claims with an arbitrary key.
pub fn forge_token(secret: &str, claims: &Claims) -> String {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("encoding should succeed")
}

/// Claims for `user_id` with the given purpose and window relative to now.
pub fn claims_for(user_id: DbId, purpose: &str, iat_offset: i64, exp_offset: i64) -> Claims {
    let now = chrono::Utc::now().timestamp();
    Claims {
        sub: user_id,
        email: "forged@test.com".to_string(),
        purpose: purpose.to_string(),
        exp: now + exp_offset,
        iat: now + iat_offset,
        jti: uuid::Uuid::new_v4().to_string(),
    }
}
