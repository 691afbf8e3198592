//! Cookie policy as configured from the environment.
//!
//! Kept in its own test binary because it mutates process environment
//! variables.

mod common;

use axum::http::header::CACHE_CONTROL;
use axum::http::StatusCode;
use common::{set_cookie, TestApp};
use warden_api::config::ServerConfig;

#[tokio::test]
async fn test_production_env_sets_secure_cookies() {
    std::env::set_var("JWT_SECRET", "production-cookie-test-secret-long-enough");
    std::env::remove_var("JWT_RESET_SECRET");

    std::env::set_var("APP_ENV", "development");
    assert!(!ServerConfig::from_env().secure_cookies);

    std::env::set_var("APP_ENV", "Production");
    let config = ServerConfig::from_env();
    assert!(config.secure_cookies);

    let app = TestApp::with_config(config);
    app.signup("a@b.com", "secret1", "A").await;

    let response = app.signin("a@b.com", "secret1").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CACHE_CONTROL], "no-store");

    let cookie = set_cookie(&response).expect("signin must set the session cookie");
    assert!(cookie.contains("Secure"), "{cookie}");
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Strict"));

    let response = app
        .post_json("/api/v1/auth/logout", serde_json::json!({}))
        .await;
    let cleared = set_cookie(&response).expect("logout must clear the cookie");
    assert!(cleared.contains("Secure"), "{cleared}");
    assert!(cleared.contains("Max-Age=0"));
}
