//! The session cookie on the wire.
//!
//! Signin sets `token=<jwt>` as `HttpOnly; SameSite=Strict; Path=/` with a
//! `Max-Age` matching the token lifetime. `Secure` is only set in production
//! so local HTTP development keeps working.

use axum::http::header::COOKIE;
use axum::http::HeaderMap;
use cookie::time::Duration;
use cookie::{Cookie, SameSite};

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "token";

/// Build the `Set-Cookie` value carrying a freshly issued session token.
pub fn session_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    base_cookie(token.to_string(), secure)
        .max_age(Duration::seconds(max_age_secs))
        .build()
        .to_string()
}

/// Build the `Set-Cookie` value that removes the session cookie.
pub fn clear_session_cookie(secure: bool) -> String {
    let mut cookie = base_cookie(String::new(), secure).build();
    cookie.make_removal();
    cookie.to_string()
}

/// Find the session token among the request's `Cookie` headers.
pub fn session_token_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|c| c.name() == SESSION_COOKIE && !c.value().is_empty())
        .map(|c| c.value().to_string())
}

fn base_cookie(value: String, secure: bool) -> cookie::CookieBuilder<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(secure)
}
